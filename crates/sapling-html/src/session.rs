//! Driving the tokenizer and the tree constructor together.
//!
//! [§ 13.2.1 Overview of the parsing model](https://html.spec.whatwg.org/multipage/parsing.html#overview-of-the-parsing-model)
//!
//! "The input to the HTML parsing process consists of a stream of code
//! points, which is passed through a tokenization stage followed by a tree
//! construction stage. The output is a Document object."
//!
//! A [`ParseSession`] pulls one token at a time from the tokenizer and hands
//! it to the tree constructor. Between tokens it applies the tokenizer state
//! switches the tree constructor requested, so `<title>`, `<script>` and
//! friends see their contents in the right state.

use log::trace;
use sapling_dom::{DomTree, QuirksMode};
use serde::Deserialize;

use crate::error::{ErrorLog, ParseError, SessionError};
use crate::parser::{HTMLParser, InsertionMode};
use crate::tokenizer::{HTMLTokenizer, TokenizerState};

/// Options for a parse.
///
/// Deserialisable so fixture files and host configuration can carry them
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Scripts are never run; the flag only changes how `<noscript>` parses.
    pub scripting: bool,

    /// Whether the document is an `iframe srcdoc` document, which never
    /// enters quirks mode and does not require a DOCTYPE.
    pub iframe_srcdoc: bool,

    /// The state the tokenizer starts in. Defaults to the data state.
    pub initial_state: Option<TokenizerState>,

    /// The last start tag the tokenizer should assume was emitted.
    pub last_start_tag: Option<String>,
}

impl ParserOptions {
    /// Options with every flag off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scripting: false,
            iframe_srcdoc: false,
            initial_state: None,
            last_start_tag: None,
        }
    }

    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Mark the document as an `iframe srcdoc` document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, iframe_srcdoc: bool) -> Self {
        self.iframe_srcdoc = iframe_srcdoc;
        self
    }

    /// Start the tokenizer in `state`.
    #[must_use]
    pub const fn with_initial_state(mut self, state: TokenizerState) -> Self {
        self.initial_state = Some(state);
        self
    }
}

/// The result of parsing a whole document.
#[derive(Debug)]
pub struct ParseOutput {
    /// The document.
    pub tree: DomTree,
    /// Every parse error, tokenizer and tree construction interleaved in
    /// the order they were detected.
    pub errors: Vec<ParseError>,
    /// The document's mode, decided by the DOCTYPE.
    pub quirks_mode: QuirksMode,
}

/// A tokenizer and a tree constructor working on one input.
///
/// The session can be stepped one token at a time with
/// [`ParseSession::step`] and abandoned between tokens; the partial tree and
/// the errors so far stay available through [`ParseSession::parser`].
#[derive(Debug)]
pub struct ParseSession {
    tokenizer: HTMLTokenizer,
    parser: HTMLParser,
}

impl ParseSession {
    /// Start a session over `input` with default options.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self::with_options(input, &ParserOptions::default())
    }

    /// Start a session over `input`.
    #[must_use]
    pub fn with_options(input: &str, options: &ParserOptions) -> Self {
        let mut tokenizer = HTMLTokenizer::new(input);
        if let Some(state) = options.initial_state {
            tokenizer.set_state(state);
        }
        if options.last_start_tag.is_some() {
            tokenizer.set_last_start_tag(options.last_start_tag.as_deref());
        }
        Self {
            tokenizer,
            parser: HTMLParser::with_options(options),
        }
    }

    /// Move one token from the tokenizer to the tree constructor.
    ///
    /// Returns `Ok(true)` while more input remains and `Ok(false)` once the
    /// end-of-file token has been processed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyFinished`] when called again after
    /// `Ok(false)`.
    pub fn step(&mut self) -> Result<bool, SessionError> {
        if self.parser.is_stopped() {
            return Err(SessionError::AlreadyFinished);
        }

        let token = self.tokenizer.next_token(&self.parser);

        // Tokenizer errors for this token precede whatever the tree
        // constructor reports about it.
        let mut tokenizer_errors = self.tokenizer.take_errors();
        self.parser.absorb_errors(&mut tokenizer_errors);

        self.parser.process_token(token)?;

        if let Some(state) = self.parser.take_tokenizer_state_request() {
            trace!(target: "sapling::tree_builder", "tokenizer switched to {state}");
            self.tokenizer.set_state(state);
        }

        Ok(!self.parser.is_stopped())
    }

    /// Run the session to the end of the input.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyFinished`] if the session had already
    /// finished before this call.
    pub fn run(&mut self) -> Result<(), SessionError> {
        while self.step()? {}
        Ok(())
    }

    /// The tree constructor, for inspecting the tree and errors so far.
    #[must_use]
    pub const fn parser(&self) -> &HTMLParser {
        &self.parser
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.parser.insertion_mode()
    }

    /// Finish the session and collect its output.
    #[must_use]
    pub fn finish(self) -> ParseOutput {
        let (tree, errors) = self.parser.into_parts();
        ParseOutput {
            quirks_mode: tree.quirks_mode(),
            tree,
            errors: errors.into_vec(),
        }
    }

    /// Errors recorded by the tree constructor so far, including the
    /// tokenizer errors already handed over.
    #[must_use]
    pub const fn errors(&self) -> &ErrorLog {
        self.parser.errors()
    }
}

/// Parse a complete document with default options.
///
/// # Example
/// ```
/// use sapling_html::parse_document;
///
/// let output = parse_document("<!DOCTYPE html><p>Hello");
/// assert_eq!(output.tree.text_content(output.tree.root()), "Hello");
/// ```
#[must_use]
pub fn parse_document(input: &str) -> ParseOutput {
    parse_document_with(input, &ParserOptions::default())
}

/// Parse a complete document.
#[must_use]
pub fn parse_document_with(input: &str, options: &ParserOptions) -> ParseOutput {
    let mut session = ParseSession::with_options(input, options);
    // A fresh session cannot already be finished.
    let _ = session.run();
    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParserOptions =
            serde_json::from_str(r#"{"scripting": true}"#).expect("valid options");
        assert_eq!(options, ParserOptions::new().with_scripting(true));
    }

    #[test]
    fn step_reports_completion_then_refuses() {
        let mut session = ParseSession::new("x");
        while session.step().expect("running") {}
        assert_eq!(session.step(), Err(SessionError::AlreadyFinished));
    }

    #[test]
    fn title_contents_are_rcdata() {
        let output = parse_document("<title><b>x</b></title>");
        let tree = &output.tree;
        let head = tree.head().expect("head");
        let title = tree.first_child(head).expect("title");
        assert_eq!(tree.children(title).len(), 1);
        assert_eq!(tree.text_content(title), "<b>x</b>");
    }

    #[test]
    fn tokenizer_errors_are_merged_in_order() {
        let output = parse_document("<a x=1 x=2>");
        let kinds: Vec<_> = output.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParseErrorKind::DuplicateAttribute,
                ParseErrorKind::MissingDoctype,
                ParseErrorKind::EofWithOpenElements,
            ]
        );
    }
}
