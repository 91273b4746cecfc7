//! Common utilities for the Sapling HTML parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Source positions** - line/column/offset tracking for tokens and errors
//! - **Warning System** - de-duplicated diagnostics routed through `log`

pub mod position;
pub mod warning;

pub use position::Position;
