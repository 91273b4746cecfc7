use log::{debug, trace};
use sapling_common::Position;
use sapling_dom::{DomTree, ElementData, Namespace, NodeId};
use strum_macros::{Display, IntoStaticStr};

use super::elements::{IMPLIED_END_TAGS, IMPLIED_END_TAGS_THOROUGH, Scope};
use crate::error::{ErrorLog, ParseErrorKind, SessionError};
use crate::session::ParserOptions;
use crate::tokenizer::{PositionedToken, Token, TokenizerState, TreeContext};

/// Log target for tree construction diagnostics.
pub(super) const LOG_TARGET: &str = "sapling::tree_builder";

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// The list contains entries that are either elements or markers.
#[derive(Debug, Clone)]
pub(super) enum ActiveFormattingElement {
    /// A formatting element entry.
    Element {
        /// The element in the DOM tree.
        node_id: NodeId,
        /// The start tag the element was created for, kept to recreate the
        /// element during reconstruction and the adoption agency algorithm.
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and
    /// caption.
    Marker,
}

impl ActiveFormattingElement {
    pub(super) const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { node_id, .. } => Some(*node_id),
            Self::Marker => None,
        }
    }
}

/// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
/// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from tokens fed one at a time.
///
/// The parser never fails on malformed markup: every parse error is recorded
/// in its [`ErrorLog`] and recovered from. Once an end-of-file token has been
/// processed the parser is stopped and rejects further tokens.
#[derive(Debug)]
pub struct HTMLParser {
    /// The document being built. `NodeId::ROOT` is the Document node.
    pub(super) tree: DomTree,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// Mode to return to after the "text" and "in table text" modes.
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// The first entry is the `html` element; the last is the current node.
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#form-element-pointer)
    pub(super) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    pub(super) pending_table_character_tokens: Vec<char>,

    /// Set after `pre`, `listing` and `textarea` start tags: a directly
    /// following U+000A LINE FEED token is dropped.
    pub(super) skip_next_newline: bool,

    /// Set while a start tag with the self-closing flag is processed and
    /// cleared when the flag is acknowledged.
    pub(super) self_closing_flag_unacknowledged: bool,

    /// [§ 13.2.4.5](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    pub(super) scripting: bool,

    /// Whether the document is an `iframe srcdoc` document.
    pub(super) iframe_srcdoc: bool,

    /// Set once parsing has stopped.
    pub(super) stopped: bool,

    /// Tokenizer state change requested by the last processed token.
    pub(super) tokenizer_state_request: Option<TokenizerState>,

    /// Position of the token being processed, used for error reporting.
    pub(super) current_position: Position,

    /// Parse errors reported so far.
    pub(super) errors: ErrorLog,
}

impl TreeContext for HTMLParser {
    /// [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace"
    fn adjusted_current_node_is_foreign(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|id| self.tree.as_element(id))
            .is_some_and(|element| element.namespace != Namespace::Html)
    }
}

impl Default for HTMLParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HTMLParser {
    /// Create a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&ParserOptions::default())
    }

    /// Create a parser configured by `options`.
    #[must_use]
    pub fn with_options(options: &ParserOptions) -> Self {
        Self {
            tree: DomTree::new(),
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: Vec::new(),
            skip_next_newline: false,
            self_closing_flag_unacknowledged: false,
            scripting: options.scripting,
            iframe_srcdoc: options.iframe_srcdoc,
            stopped: false,
            tokenizer_state_request: None,
            current_position: Position::START,
            errors: ErrorLog::new(),
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher"
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyFinished`] if parsing has already
    /// stopped.
    pub fn process_token(&mut self, token: PositionedToken) -> Result<(), SessionError> {
        if self.stopped {
            return Err(SessionError::AlreadyFinished);
        }

        self.current_position = token.position;
        let token = token.token;

        // "If the next token is a U+000A LINE FEED (LF) character token, then
        //  ignore that token and move on to the next one."
        if std::mem::take(&mut self.skip_next_newline)
            && matches!(token, Token::Character { data: '\n' })
        {
            return Ok(());
        }

        self.self_closing_flag_unacknowledged =
            matches!(token, Token::StartTag { self_closing: true, .. });

        self.dispatch(&token);

        // [§ 13.2.5.40](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
        // "When a start tag token is emitted with its self-closing flag set, if
        //  the flag is not acknowledged when it is processed by the tree
        //  construction stage, that is a parse error."
        if std::mem::take(&mut self.self_closing_flag_unacknowledged) {
            self.parse_error(ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }

        Ok(())
    }

    /// Whether an end-of-file token has been processed.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// The document built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Parse errors reported so far.
    #[must_use]
    pub const fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// The stack of open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[NodeId] {
        &self.stack_of_open_elements
    }

    /// Move errors reported elsewhere (the tokenizer) into this parser's log
    /// so the combined log stays in input order.
    pub fn absorb_errors(&mut self, other: &mut ErrorLog) {
        self.errors.append(other);
    }

    /// Take the tokenizer state change requested by the last token, if any.
    pub const fn take_tokenizer_state_request(&mut self) -> Option<TokenizerState> {
        self.tokenizer_state_request.take()
    }

    /// Consume the parser, returning the document and the error log.
    #[must_use]
    pub fn into_parts(self) -> (DomTree, ErrorLog) {
        (self.tree, self.errors)
    }

    /// The tree construction dispatcher: route the token either to the
    /// current insertion mode or to the rules for foreign content.
    pub(super) fn dispatch(&mut self, token: &Token) {
        if self.should_use_insertion_mode_rules(token) {
            self.process_using_rules_for(self.insertion_mode, token);
        } else {
            self.handle_foreign_content(token);
        }
    }

    /// "Reprocess the token"
    pub(super) fn reprocess_token(&mut self, token: &Token) {
        self.dispatch(token);
    }

    /// "Process the token using the rules for the `mode` insertion mode"
    pub(super) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Switch the insertion mode.
    pub(super) fn switch_to(&mut self, mode: InsertionMode) {
        trace!(target: LOG_TARGET, "insertion mode {} -> {mode}", self.insertion_mode);
        self.insertion_mode = mode;
    }

    /// Record a parse error at the position of the current token.
    pub(super) fn parse_error(&mut self, kind: ParseErrorKind) {
        debug!(
            target: LOG_TARGET,
            "parse error {kind} at {} in {}", self.current_position, self.insertion_mode
        );
        self.errors.push(kind, self.current_position);
    }

    /// Ask the session to switch the tokenizer to `state` before the next
    /// token.
    pub(super) const fn request_tokenizer_state(&mut self, state: TokenizerState) {
        self.tokenizer_state_request = Some(state);
    }

    /// [§ 13.2.5.40](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
    pub(super) const fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_flag_unacknowledged = false;
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        trace!(target: LOG_TARGET, "stop parsing in {}", self.insertion_mode);
        self.stack_of_open_elements.clear();
        self.active_formatting_elements.clear();
        self.template_insertion_modes.clear();
        self.stopped = true;
    }

    // ===== Stack of open elements =====

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open
    /// elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// Without fragment parsing the adjusted current node is the current
    /// node.
    pub(super) fn adjusted_current_node(&self) -> Option<NodeId> {
        self.current_node()
    }

    /// Element data of the current node.
    pub(super) fn current_element(&self) -> Option<&ElementData> {
        self.current_node().and_then(|id| self.tree.as_element(id))
    }

    /// Whether `id` is an HTML element named `name`.
    pub(super) fn is_html_element(&self, id: NodeId, name: &str) -> bool {
        self.tree.as_element(id).is_some_and(|e| e.is_html(name))
    }

    /// Whether `id` is an HTML element whose name is in `names`.
    pub(super) fn is_html_element_in(&self, id: NodeId, names: &[&str]) -> bool {
        self.tree.as_element(id).is_some_and(|e| {
            e.namespace == Namespace::Html && names.contains(&e.tag_name.as_str())
        })
    }

    /// Whether the current node is an HTML element named `name`.
    pub(super) fn current_node_is(&self, name: &str) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element(id, name))
    }

    /// Whether the current node is an HTML element whose name is in `names`.
    pub(super) fn current_node_is_one_of(&self, names: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|id| self.is_html_element_in(id, names))
    }

    /// Whether an HTML element named `name` is anywhere on the stack.
    pub(super) fn stack_contains(&self, name: &str) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| self.is_html_element(id, name))
    }

    pub(super) fn pop_current_node(&mut self) -> Option<NodeId> {
        self.stack_of_open_elements.pop()
    }

    /// Pop elements until an HTML element named `name` has been popped.
    pub(super) fn pop_until(&mut self, name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element(id, name) {
                break;
            }
        }
    }

    /// Pop elements until an HTML element whose name is in `names` has been
    /// popped.
    pub(super) fn pop_until_one_of(&mut self, names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.is_html_element_in(id, names) {
                break;
            }
        }
    }

    /// Pop elements until `node` has been popped.
    pub(super) fn pop_until_node(&mut self, node: NodeId) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if id == node {
                break;
            }
        }
    }

    /// Remove `node` from the stack wherever it is.
    pub(super) fn remove_from_stack(&mut self, node: NodeId) {
        self.stack_of_open_elements.retain(|&id| id != node);
    }

    /// Index of `node` in the stack of open elements.
    pub(super) fn stack_position(&self, node: NodeId) -> Option<usize> {
        self.stack_of_open_elements.iter().position(|&id| id == node)
    }

    // ===== Scopes =====

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// STEP 1: "Initialize node to be the current node"
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of open
    ///          elements and return to step 2."
    fn has_in_scope_where(
        &self,
        scope: Scope,
        mut is_target: impl FnMut(NodeId, &ElementData) -> bool,
    ) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let Some(element) = self.tree.as_element(id) else {
                continue;
            };
            if is_target(id, element) {
                return true;
            }
            if scope.is_boundary(element) {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element named `name` is in `scope`.
    pub(super) fn has_element_in(&self, scope: Scope, name: &str) -> bool {
        self.has_in_scope_where(scope, |_, element| element.is_html(name))
    }

    /// "has an element in scope"
    pub(super) fn has_element_in_scope(&self, name: &str) -> bool {
        self.has_element_in(Scope::Default, name)
    }

    /// "has an element in button scope"
    pub(super) fn has_element_in_button_scope(&self, name: &str) -> bool {
        self.has_element_in(Scope::Button, name)
    }

    /// "has an element in table scope"
    pub(super) fn has_element_in_table_scope(&self, name: &str) -> bool {
        self.has_element_in(Scope::Table, name)
    }

    /// Whether any HTML element named in `names` is in `scope`.
    pub(super) fn has_any_element_in(&self, scope: Scope, names: &[&str]) -> bool {
        self.has_in_scope_where(scope, |_, element| {
            element.namespace == Namespace::Html && names.contains(&element.tag_name.as_str())
        })
    }

    /// Whether the specific node `node` is in the default scope.
    pub(super) fn has_node_in_scope(&self, node: NodeId) -> bool {
        self.has_in_scope_where(Scope::Default, |id, _| id == node)
    }

    // ===== Implied end tags =====

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the user agent must pop
    /// the current node off the stack of open elements."
    pub(super) fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub(super) fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        while let Some(element) = self.current_element()
            && element.namespace == Namespace::Html
            && IMPLIED_END_TAGS.contains(&element.tag_name.as_str())
            && exclude != Some(element.tag_name.as_str())
        {
            let _ = self.pop_current_node();
        }
    }

    /// "generate all implied end tags thoroughly"
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_node_is_one_of(IMPLIED_END_TAGS_THOROUGH) {
            let _ = self.pop_current_node();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(ParseErrorKind::UnclosedElements);
        }
        self.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// Generate implied end tags, report an error if the current node is not
    /// `name`, then pop until `name` has been popped. Shared by the many end
    /// tag rules that spell out exactly these steps.
    pub(super) fn close_element_with_implied_end_tags(&mut self, name: &str) {
        self.generate_implied_end_tags();
        if !self.current_node_is(name) {
            self.parse_error(ParseErrorKind::UnclosedElements);
        }
        self.pop_until(name);
    }

    // ===== Table contexts =====

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }

    fn clear_stack_back_to(&mut self, names: &[&str]) {
        while let Some(current) = self.current_node()
            && !self.is_html_element_in(current, names)
        {
            let _ = self.pop_current_node();
        }
    }

    // ===== Insertion mode reset =====

    /// The current template insertion mode, if the stack of template
    /// insertion modes is not empty.
    pub(super) fn current_template_insertion_mode(&self) -> Option<InsertionMode> {
        self.template_insertion_modes.last().copied()
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_to(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for (index, &node) in self.stack_of_open_elements.iter().enumerate().rev() {
            // STEP 3: "Loop: If node is the first node in the stack of open
            //          elements, then set last to true"
            let last = index == 0;

            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match element.tag_name.as_str() {
                // STEP 4: "If node is a select element, run these substeps"
                "select" => {
                    if !last {
                        for &ancestor in self.stack_of_open_elements[..index].iter().rev() {
                            if self.is_html_element(ancestor, "template") {
                                break;
                            }
                            if self.is_html_element(ancestor, "table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false"
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                // STEP 12: "If node is a template element, then switch the
                //           insertion mode to the current template insertion
                //           mode and return."
                "template" => {
                    return self
                        .current_template_insertion_mode()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                // STEP 16: "If node is an html element, run these substeps:
                //           If the head element pointer is null, switch the
                //           insertion mode to "before head" and return.
                //           Otherwise, the head element pointer is not null,
                //           switch the insertion mode to "after head" and return."
                "html" => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ => {}
            }

            // STEP 17: "If last is true, then switch the insertion mode to
            //           "in body" and return."
            if last {
                return InsertionMode::InBody;
            }
        }
        InsertionMode::InBody
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Attribute;

    fn feed(parser: &mut HTMLParser, token: Token) {
        parser
            .process_token(PositionedToken {
                token,
                position: Position::START,
            })
            .expect("parser should accept the token");
    }

    fn start_tag(name: &str) -> Token {
        Token::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn test_new_parser_starts_in_initial_mode() {
        let parser = HTMLParser::new();
        assert_eq!(parser.insertion_mode(), InsertionMode::Initial);
        assert!(!parser.is_stopped());
        assert!(parser.open_elements().is_empty());
    }

    #[test]
    fn test_rejects_tokens_after_eof() {
        let mut parser = HTMLParser::new();
        feed(&mut parser, Token::EndOfFile);
        assert!(parser.is_stopped());

        let result = parser.process_token(PositionedToken {
            token: Token::new_character('x'),
            position: Position::START,
        });
        assert_eq!(result, Err(SessionError::AlreadyFinished));
    }

    #[test]
    fn test_textarea_requests_rcdata_state() {
        let mut parser = HTMLParser::new();
        feed(&mut parser, start_tag("textarea"));
        assert_eq!(
            parser.take_tokenizer_state_request(),
            Some(TokenizerState::RCDATA)
        );
        assert_eq!(parser.take_tokenizer_state_request(), None);
        assert_eq!(parser.insertion_mode(), InsertionMode::Text);
    }

    #[test]
    fn test_unacknowledged_self_closing_flag_is_reported() {
        let mut parser = HTMLParser::new();
        feed(
            &mut parser,
            Token::StartTag {
                name: "div".to_string(),
                self_closing: true,
                attributes: vec![Attribute::new("id".to_string(), "x".to_string())],
            },
        );
        assert!(
            parser
                .errors()
                .contains(ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus)
        );

        let mut parser = HTMLParser::new();
        feed(
            &mut parser,
            Token::StartTag {
                name: "br".to_string(),
                self_closing: true,
                attributes: Vec::new(),
            },
        );
        assert!(
            !parser
                .errors()
                .contains(ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus)
        );
    }

    #[test]
    fn test_foreign_adjusted_current_node() {
        let mut parser = HTMLParser::new();
        assert!(!parser.adjusted_current_node_is_foreign());
        feed(&mut parser, start_tag("svg"));
        assert!(parser.adjusted_current_node_is_foreign());
    }
}
