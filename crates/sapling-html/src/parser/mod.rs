//! Tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from the
//! tokenization stage. The tree construction stage is associated with a DOM
//! Document object when a parser is created. The "output" of this stage
//! consists of dynamically modifying or extending that document's DOM tree."

/// Parser state, the dispatcher and stack helpers.
mod core;
/// Element category tables and scopes.
mod elements;
/// The list of active formatting elements and the adoption agency algorithm.
mod formatting;
/// Foreign content (SVG and MathML).
pub mod foreign_content;
/// Creating and inserting nodes.
mod insertion;
/// The insertion mode handlers.
mod modes;
/// DOCTYPE conformance and quirks mode selection.
mod quirks;

pub use self::core::{HTMLParser, InsertionMode};
