//! Detection of the leading inheritance directive.
//!
//! A template inherits from a parent when its very first line is
//!
//! ```text
//! {{ extends "parent.html" }}
//! ```
//!
//! The directive is recognised only at byte offset 0. Horizontal whitespace (spaces and
//! tabs) is allowed after `{{`, must separate `extends` from the quoted name, and is
//! allowed before `}}` and between `}}` and the line terminator. The terminator is
//! `\n` or `\r\n` and is required. The parent name is everything between the quotes and
//! cannot itself contain a quote.
//!
//! The same text anywhere else in a template is ordinary content.

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";
const KEYWORD: &[u8] = b"extends";

/// A recognised inheritance directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendsDirective<'a> {
    /// Name of the parent template.
    pub parent: &'a str,
    /// The content with the directive line and its terminator removed.
    pub body: &'a str,
}

/// Parse the leading inheritance directive of `content`, if any.
///
/// # Examples
///
/// ```
/// use tessera::templating::extends::parse_extends;
///
/// let directive = parse_extends("{{ extends \"base.html\" }}\n<p>child</p>").unwrap();
/// assert_eq!(directive.parent, "base.html");
/// assert_eq!(directive.body, "<p>child</p>");
///
/// assert!(parse_extends("<p>{{ extends \"base.html\" }}</p>\n").is_none());
/// ```
pub fn parse_extends(content: &str) -> Option<ExtendsDirective<'_>> {
    let bytes = content.as_bytes();
    let mut scanner = Scanner {
        bytes,
        pos: 0,
    };

    scanner.literal(OPEN)?;
    scanner.blanks();
    scanner.literal(KEYWORD)?;
    if scanner.blanks() == 0 {
        return None;
    }

    scanner.literal(b"\"")?;
    let name_start = scanner.pos;
    let name_len = bytes[name_start..].iter().position(|&b| b == b'"' || b == b'\n')?;
    scanner.pos += name_len;
    let name_end = scanner.pos;
    scanner.literal(b"\"")?;

    scanner.blanks();
    scanner.literal(CLOSE)?;
    scanner.blanks();
    scanner.line_end()?;

    // Every delimiter above is ASCII, so these offsets sit on char boundaries.
    Some(ExtendsDirective {
        parent: &content[name_start..name_end],
        body: &content[scanner.pos..],
    })
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn literal(&mut self, expected: &[u8]) -> Option<()> {
        if self.bytes[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            Some(())
        } else {
            None
        }
    }

    /// Skip spaces and tabs, returning how many were skipped.
    fn blanks(&mut self) -> usize {
        let skipped =
            self.bytes[self.pos..].iter().take_while(|&&b| b == b' ' || b == b'\t').count();
        self.pos += skipped;
        skipped
    }

    fn line_end(&mut self) -> Option<()> {
        self.literal(b"\n").or_else(|| self.literal(b"\r\n"))
    }
}
