use crate::error::ParseErrorKind;
use crate::parser::core::{HTMLParser, InsertionMode, is_whitespace};
use crate::parser::elements::{Scope, TABLE_SECTIONS};
use crate::tokenizer::Token;

/// Start tags that close a caption, cell or row and are then reprocessed.
const TABLE_STRUCTURE_START_TAGS: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// End tags ignored by the caption and cell modes.
const IGNORED_IN_CELL_END_TAGS: &[&str] = &["body", "caption", "col", "colgroup", "html"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody,
            //  template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            //  tokens. Let the original insertion mode be the current insertion
            //  mode. Switch the insertion mode to "in table text" and reprocess
            //  the token."
            Token::Character { .. }
                if self.current_node_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.switch_to(InsertionMode::InTableText);
                self.reprocess_token(token);
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context. Insert a marker at
                //  the end of the list of active formatting elements. Insert an
                //  HTML element for the token, then switch the insertion mode
                //  to "in caption"."
                "caption" => {
                    self.clear_stack_back_to_table_context();
                    self.insert_marker();
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InCaption);
                }

                // "A start tag whose tag name is "colgroup""
                "colgroup" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InColumnGroup);
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context. Insert an HTML
                //  element for a "colgroup" start tag token with no attributes,
                //  then switch the insertion mode to "in column group".
                //  Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("colgroup");
                    self.switch_to(InsertionMode::InColumnGroup);
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot",
                //  "thead""
                _ if TABLE_SECTIONS.contains(&name.as_str()) => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token);
                    self.switch_to(InsertionMode::InTableBody);
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context. Insert an HTML
                //  element for a "tbody" start tag token with no attributes,
                //  then switch the insertion mode to "in table body". Reprocess
                //  the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("tbody");
                    self.switch_to(InsertionMode::InTableBody);
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    // "Parse error. If the stack of open elements does not have
                    //  a table element in table scope, ignore the token.
                    //  Otherwise: Pop elements from this stack until a table
                    //  element has been popped from the stack. Reset the
                    //  insertion mode appropriately. Reprocess the token."
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    if !self.has_element_in_table_scope("table") {
                        return;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "style", "script",
                //  "template""
                "style" | "script" | "template" => self.handle_in_head_mode(token),

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name
                //  "type", or if it does, but that attribute's value is not an
                //  ASCII case-insensitive match for the string "hidden", then:
                //  act as described in the "anything else" entry below.
                //  Otherwise: Parse error. Insert an HTML element for the
                //  token. Pop that input element off the stack of open
                //  elements. Acknowledge the token's self-closing flag, if it
                //  is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|value| value.eq_ignore_ascii_case("hidden")) =>
                {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    self.insert_void_element(token);
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    // "Parse error. If there is a template element on the stack
                    //  of open elements, or if the form element pointer is not
                    //  null, ignore the token. Otherwise: Insert an HTML element
                    //  for the token, and set the form element pointer to point
                    //  to the element created. Pop that form element off the
                    //  stack of open elements."
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    if self.stack_contains("template") || self.form_element_pointer.is_some() {
                        return;
                    }
                    self.form_element_pointer = self.insert_html_element(token);
                    let _ = self.pop_current_node();
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    if !self.has_element_in_table_scope("table") {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag);
                        return;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption",
                //  "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                //  "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                }

                "template" => self.handle_in_head_mode(token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::EndOfFile => self.handle_in_body_mode(token),

            Token::Character { .. } => {
                self.parse_error(ParseErrorKind::UnexpectedText);
                self.in_table_anything_else(token);
            }
        }
    }

    /// "Anything else" in "in table".
    ///
    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) {
        if !matches!(token, Token::Character { .. }) {
            self.parse_error(match token {
                Token::EndTag { .. } => ParseErrorKind::UnexpectedEndTag,
                _ => ParseErrorKind::UnexpectedStartTag,
            });
        }
        self.foster_parenting = true;
        self.handle_in_body_mode(token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
            }

            // "Any other character token"
            // "Append the character token to the pending table character
            //  tokens list."
            Token::Character { data } => self.pending_table_character_tokens.push(*data),

            // "Anything else"
            _ => {
                self.flush_pending_table_characters();
                // "Switch the insertion mode to the original insertion mode
                //  and reprocess the token."
                self.return_to_original_insertion_mode();
                self.reprocess_token(token);
            }
        }
    }

    /// "If any of the tokens in the pending table character tokens list are
    /// character tokens that are not ASCII whitespace, then this is a parse
    /// error: reprocess the character tokens in the pending table character
    /// tokens list using the rules given in the "anything else" entry in the
    /// "in table" insertion mode. Otherwise, insert the characters given by
    /// the pending table character tokens list."
    fn flush_pending_table_characters(&mut self) {
        let pending = std::mem::take(&mut self.pending_table_character_tokens);
        if pending.iter().all(|&c| is_whitespace(c)) {
            for c in pending {
                self.insert_character(c);
            }
            return;
        }

        self.parse_error(ParseErrorKind::UnexpectedText);
        for c in pending {
            self.in_table_anything_else(&Token::Character { data: c });
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption();
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a caption element in
            //  table scope, this is a parse error; ignore the token.
            //  Otherwise: ... act as above, then reprocess the token."
            Token::StartTag { name, .. } if TABLE_STRUCTURE_START_TAGS.contains(&name.as_str()) => {
                if self.close_caption() {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_caption() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            //  "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if IGNORED_IN_CELL_END_TAGS.contains(&name.as_str())
                    || matches!(name.as_str(), "tbody" | "td" | "tfoot" | "th" | "thead" | "tr") =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            // "Anything else"
            _ => self.handle_in_body_mode(token),
        }
    }

    /// Close the caption element. Returns `false` when no caption is in
    /// table scope and the token was ignored.
    fn close_caption(&mut self) -> bool {
        // "If the stack of open elements does not have a caption element in
        //  table scope, this is a parse error; ignore the token."
        if !self.has_element_in_table_scope("caption") {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
            return false;
        }

        // "Generate implied end tags. Now, if the current node is not a caption
        //  element, then this is a parse error. Pop elements from this stack
        //  until a caption element has been popped from the stack. Clear the
        //  list of active formatting elements up to the last marker. Switch
        //  the insertion mode to "in table"."
        self.close_element_with_implied_end_tags("caption");
        self.clear_active_formatting_elements_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements. Acknowledge the
            //  token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => self.insert_void_element(token),

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            //  parse error; ignore the token. Otherwise, pop the current node
            //  from the stack of open elements. Switch the insertion mode to
            //  "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                let _ = self.pop_current_node();
                self.switch_to(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "col""
            Token::EndTag { name, .. } if name == "col" => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }

            Token::EndOfFile => self.handle_in_body_mode(token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            //  parse error; ignore the token. Otherwise, pop the current node
            //  from the stack of open elements. Switch the insertion mode to
            //  "in table". Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorKind::UnexpectedText);
                    return;
                }
                let _ = self.pop_current_node();
                self.switch_to(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context. Insert an HTML
            //  element for the token, then switch the insertion mode to "in
            //  row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error. Clear the stack back to a table body context.
            //  Insert an HTML element for a "tr" start tag token with no
            //  attributes, then switch the insertion mode to "in row".
            //  Reprocess the current token."
            Token::StartTag { name, .. } if name == "th" || name == "td" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element_named("tr");
                self.switch_to(InsertionMode::InRow);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in
                //  table scope that is an HTML element with the same tag name
                //  as the token, this is a parse error; ignore the token.
                //  Otherwise: Clear the stack back to a table body context. Pop
                //  the current node from the stack of open elements. Switch the
                //  insertion mode to "in table"."
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.clear_stack_back_to_table_body_context();
                let _ = self.pop_current_node();
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.leave_table_body(token);
            }
            Token::EndTag { name, .. } if name == "table" => self.leave_table_body(token),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion
            //  mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion mode
    /// to "in table". Reprocess the token."
    fn leave_table_body(&mut self, token: &Token) {
        if !self.has_any_element_in(Scope::Table, TABLE_SECTIONS) {
            self.parse_error(match token {
                Token::EndTag { .. } => ParseErrorKind::UnexpectedEndTag,
                _ => ParseErrorKind::UnexpectedStartTag,
            });
            return;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.pop_current_node();
        self.switch_to(InsertionMode::InTable);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context. Insert an HTML
            //  element for the token, then switch the insertion mode to "in
            //  cell". Insert a marker at the end of the list of active
            //  formatting elements."
            Token::StartTag { name, .. } if name == "th" || name == "td" => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InCell);
                self.insert_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name, .. } if name == "tr" => {
                let _ = self.close_row(token);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a tr element in
            //  table scope, this is a parse error; ignore the token.
            //  Otherwise: ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if self.close_row(token) {
                    self.reprocess_token(token);
                }
            }
            Token::EndTag { name, .. } if name == "table" => {
                if self.close_row(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            // "If the stack of open elements does not have an element in table
            //  scope that is an HTML element with the same tag name as the
            //  token, this is a parse error; ignore the token. If the stack of
            //  open elements does not have a tr element in table scope, ignore
            //  the token. Otherwise: ... Reprocess the token."
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                if self.close_row(token) {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html", "td", "th""
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            _ => self.handle_in_table_mode(token),
        }
    }

    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token. Otherwise: Clear the
    /// stack back to a table row context. Pop the current node (which will be
    /// a tr element) from the stack of open elements. Switch the insertion
    /// mode to "in table body"."
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.has_element_in_table_scope("tr") {
            self.parse_error(match token {
                Token::StartTag { .. } => ParseErrorKind::UnexpectedStartTag,
                _ => ParseErrorKind::UnexpectedEndTag,
            });
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.pop_current_node();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if name == "td" || name == "th" => {
                // "If the stack of open elements does not have an element in
                //  table scope that is an HTML element with the same tag name
                //  as that of the token, then this is a parse error; ignore
                //  the token."
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                // "Otherwise: Generate implied end tags. Now, if the current
                //  node is not an HTML element with the same tag name as the
                //  token, then this is a parse error. Pop elements from the
                //  stack of open elements stack until an HTML element with the
                //  same tag name as the token has been popped from the stack.
                //  Clear the list of active formatting elements up to the last
                //  marker. Switch the insertion mode to "in row"."
                self.close_element_with_implied_end_tags(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.switch_to(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            //  table scope. Close the cell (see below) and reprocess the
            //  token."
            Token::StartTag { name, .. } if TABLE_STRUCTURE_START_TAGS.contains(&name.as_str()) => {
                if !self.has_any_element_in(Scope::Table, &["td", "th"])
                {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    return;
                }
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if IGNORED_IN_CELL_END_TAGS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            //  "thead", "tr""
            // "If the stack of open elements does not have an element in table
            //  scope that is an HTML element with the same tag name as that of
            //  the token, then this is a parse error; ignore the token.
            //  Otherwise, close the cell (see below) and reprocess the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.has_element_in_table_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_the_cell();
                self.reprocess_token(token);
            }

            _ => self.handle_in_body_mode(token),
        }
    }

    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm:"
    fn close_the_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags();

        // STEP 2: "If the current node is not now a td element or a th element,
        //          then this is a parse error."
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(ParseErrorKind::UnclosedElements);
        }

        // STEP 3: "Pop elements from the stack of open elements stack until a
        //          td element or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);

        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.clear_active_formatting_elements_to_last_marker();

        // STEP 5: "Switch the insertion mode to "in row"."
        self.switch_to(InsertionMode::InRow);
    }
}
