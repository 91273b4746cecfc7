//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Character reference states per § 13.2.5.72 - § 13.2.5.80.
mod character_reference;
/// The state machine: states, driver, text and tag states.
mod core;
/// Helper methods for tokenizer state transitions and emission.
mod helpers;
/// Comment, DOCTYPE and CDATA states.
mod markup;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// Script data states.
mod script_data;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{HTMLTokenizer, StandaloneContext, TokenizerState, TreeContext};
pub use self::token::{Attribute, PositionedToken, Token};
