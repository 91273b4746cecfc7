//! WHATWG HTML tokenizer and tree constructor.
//!
//! # Scope
//!
//! This crate implements the parsing half of the HTML Living Standard:
//! - **Input stream preprocessing** ([§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream))
//!   - newline normalization, line/column tracking, control character and
//!     noncharacter reporting
//!
//! - **Tokenizer** ([§ 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - every state of the state machine, including script data escapes and
//!     CDATA sections
//!   - named and numeric character references
//!
//! - **Tree construction** ([§ 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - all 23 insertion modes, foreign content, foster parenting
//!   - the adoption agency algorithm and active formatting reconstruction
//!   - quirks mode from the DOCTYPE
//!
//! Every parse error is recorded with its position; none stops parsing.
//!
//! # Not implemented
//!
//! - Fragment parsing (`innerHTML`)
//! - Script execution and `document.write`
//! - Encoding sniffing; input is already a `&str`
//!
//! # Example
//! ```
//! use sapling_html::{ParseErrorKind, parse_document};
//!
//! let output = parse_document("<p>Hi");
//! let kinds: Vec<_> = output.errors.iter().map(|e| e.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [ParseErrorKind::MissingDoctype, ParseErrorKind::EofWithOpenElements]
//! );
//! ```

/// Output renderings in the html5lib fixture formats.
pub mod dump;
/// Parse errors and the error log.
pub mod error;
/// The preprocessed input stream.
pub mod input;
/// Tree construction.
pub mod parser;
/// Driving the tokenizer and tree constructor together.
pub mod session;
/// html5lib fixture loaders and runners.
pub mod testing;
/// The tokenizer.
pub mod tokenizer;

pub use error::{ErrorCategory, ErrorLog, ParseError, ParseErrorKind, SessionError};
pub use parser::{HTMLParser, InsertionMode};
pub use session::{ParseOutput, ParseSession, ParserOptions, parse_document, parse_document_with};
pub use tokenizer::{
    Attribute, HTMLTokenizer, PositionedToken, StandaloneContext, Token, TokenizerState, TreeContext,
};
