//! Integration test suite for tessera
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **caching**: open counts under each cache policy, cache isolation
//! - **inheritance**: directive placement, deep chains, cycles, errors through `Dir`
//! - **concurrency**: parallel compilation and policy swaps while rendering
//! - **functions**: function table binding across cached parents
//! - **cli**: the `tessera` binary

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod functions;
mod inheritance;
