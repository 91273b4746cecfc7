use sapling_dom::{DoctypeData, Namespace, NodeData, NodeId, QuirksMode};

use crate::error::ParseErrorKind;
use crate::parser::core::{HTMLParser, InsertionMode, is_whitespace};
use crate::parser::elements::HEAD_CONTENT_START_TAGS;
use crate::parser::quirks::DoctypeFields;
use crate::tokenizer::{Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_as_last_child_of(NodeId::ROOT, data);
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let fields = DoctypeFields {
                    name: name.as_deref(),
                    public_id: public_identifier.as_deref(),
                    system_id: system_identifier.as_deref(),
                    force_quirks: *force_quirks,
                };

                // "If the DOCTYPE token's name is not "html", or the token's
                //  public identifier is not missing, or the token's system
                //  identifier is neither missing nor "about:legacy-compat",
                //  then there is a parse error."
                if !fields.is_conforming() {
                    self.parse_error(ParseErrorKind::NonConformingDoctype);
                }

                // "Append a DocumentType node to the Document node, with its
                //  name set to the name given in the DOCTYPE token, or the
                //  empty string if the name was missing; its public ID set to
                //  the public identifier given in the DOCTYPE token, or the
                //  empty string if the public identifier was missing; and its
                //  system ID set to the system identifier given in the DOCTYPE
                //  token, or the empty string if the system identifier was
                //  missing."
                let doctype = self.tree.alloc(NodeData::Doctype(DoctypeData {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                }));
                self.tree.append_child(NodeId::ROOT, doctype);

                // "Then, if the document is not an iframe srcdoc document, and
                //  the parser cannot change the mode flag is false, and the
                //  DOCTYPE token matches one of the conditions in the following
                //  list, then set the Document to quirks mode"
                if !self.iframe_srcdoc {
                    self.tree.set_quirks_mode(fields.quirks_mode());
                }

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a
            //  parse error; if the parser cannot change the mode flag is false,
            //  set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            //  reprocess the token."
            _ => {
                if !self.iframe_srcdoc {
                    self.parse_error(ParseErrorKind::MissingDoctype);
                    self.tree.set_quirks_mode(QuirksMode::Quirks);
                }
                self.switch_to(InsertionMode::BeforeHtml);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_as_last_child_of(NodeId::ROOT, data);
            }

            Token::Character { data } if is_whitespace(*data) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            //  Document as the intended parent. Append it to the Document
            //  object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element_for_token(name, attributes, Namespace::Html);
                self.tree.append_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.switch_to(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.handle_before_html_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag),

            _ => self.handle_before_html_anything_else(token),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess
    /// the token."
    fn handle_before_html_anything_else(&mut self, token: &Token) {
        let html = self.create_element_for_token("html", &[], Namespace::Html);
        self.tree.append_child(NodeId::ROOT, html);
        self.stack_of_open_elements.push(html);
        self.switch_to(InsertionMode::BeforeHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if is_whitespace(*data) => {}

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element
            //  pointer to the newly created head element. Switch the insertion
            //  mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                self.head_element_pointer = self.insert_html_element(token);
                self.switch_to(InsertionMode::InHead);
            }

            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.handle_before_head_anything_else(token);
            }

            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag),

            _ => self.handle_before_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no
    /// attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn handle_before_head_anything_else(&mut self, token: &Token) {
        self.head_element_pointer = Some(self.insert_html_element_named("head"));
        self.switch_to(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements. Acknowledge the
            //  token's self-closing flag, if it is set."
            //
            // "A start tag whose tag name is "meta""
            // Same steps; character encoding changes are not applied.
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta"
                ) =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.pop_current_node();
                self.acknowledge_self_closing_flag();
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => self.parse_rcdata_element(token),

            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. }
                if (name == "noscript" && self.scripting)
                    || matches!(name.as_str(), "noframes" | "style") =>
            {
                self.parse_raw_text_element(token);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is disabled"
            // "Insert an HTML element for the token. Switch the insertion mode
            //  to "in head noscript"."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InHeadNoscript);
            }

            // "A start tag whose tag name is "script""
            Token::StartTag {
                name, attributes, ..
            } if name == "script" => {
                // STEP 1: "Let the adjusted insertion location be the
                //          appropriate place for inserting a node."
                let location = self.appropriate_place_for_inserting(None);

                // STEP 2: "Create an element for the token in the HTML
                //          namespace, with the intended parent being the
                //          element in which the adjusted insertion location
                //          finds itself."
                let script = self.create_element_for_token(name, attributes, Namespace::Html);

                // STEP 6-7: "Insert the newly created element at the adjusted
                //            insertion location. Push the element onto the
                //            stack of open elements so that it is the new
                //            current node."
                self.insert_at(location, script);
                self.stack_of_open_elements.push(script);

                // STEP 8-10: "Switch the tokenizer to the script data state.
                //             Let the original insertion mode be the current
                //             insertion mode. Switch the insertion mode to
                //             "text"."
                self.request_tokenizer_state(TokenizerState::ScriptData);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.switch_to(InsertionMode::Text);
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            //  stack of open elements. Switch the insertion mode to "after
            //  head"."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.pop_current_node();
                self.switch_to(InsertionMode::AfterHead);
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.handle_in_head_anything_else(token);
            }

            // "A start tag whose tag name is "template""
            Token::StartTag { name, .. } if name == "template" => {
                // "Insert an HTML element for the token. Insert a marker at the
                //  end of the list of active formatting elements. Set the
                //  frameset-ok flag to "not ok". Switch the insertion mode to
                //  "in template". Push "in template" onto the stack of template
                //  insertion modes so that it is the new current template
                //  insertion mode."
                let _ = self.insert_html_element(token);
                self.insert_marker();
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTemplate);
                self.template_insertion_modes
                    .push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => {
                // "If there is no template element on the stack of open
                //  elements, then this is a parse error; ignore the token."
                if !self.stack_contains("template") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }

                // "Generate all implied end tags thoroughly. If the current
                //  node is not a template element, then this is a parse error.
                //  Pop elements from the stack of open elements until a
                //  template element has been popped from the stack. Clear the
                //  list of active formatting elements up to the last marker.
                //  Pop the current template insertion mode off the stack of
                //  template insertion modes. Reset the insertion mode
                //  appropriately."
                self.generate_all_implied_end_tags_thoroughly();
                if !self.current_node_is("template") {
                    self.parse_error(ParseErrorKind::UnclosedElements);
                }
                self.pop_until("template");
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag),

            _ => self.handle_in_head_anything_else(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack
    /// of open elements. Switch the insertion mode to "after head". Reprocess
    /// the token."
    fn handle_in_head_anything_else(&mut self, token: &Token) {
        let _ = self.pop_current_node();
        self.switch_to(InsertionMode::AfterHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            //  stack of open elements; the new current node will be a head
            //  element. Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.pop_current_node();
                self.switch_to(InsertionMode::InHead);
            }

            // "Process the token using the rules for the "in head" insertion
            //  mode."
            Token::Character { data } if is_whitespace(*data) => self.handle_in_head_mode(token),
            Token::Comment { .. } => self.handle_in_head_mode(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.handle_in_head_mode(token);
            }

            Token::EndTag { name, .. } if name == "br" => {
                self.handle_in_head_noscript_anything_else(token);
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag),

            _ => self.handle_in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn handle_in_head_noscript_anything_else(&mut self, token: &Token) {
        self.parse_error(if matches!(token, Token::StartTag { .. }) {
            ParseErrorKind::UnexpectedStartTag
        } else {
            ParseErrorKind::UnexpectedText
        });
        let _ = self.pop_current_node();
        self.switch_to(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token. Set the frameset-ok flag
            //  to "not ok". Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token. Switch the insertion mode
            //  to "in frameset"."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title""
            // "Parse error. Push the node pointed to by the head element
            //  pointer onto the stack of open elements. Process the token using
            //  the rules for the "in head" insertion mode. Remove the node
            //  pointed to by the head element pointer from the stack of open
            //  elements. (It might not be the current node at this point.)"
            Token::StartTag { name, .. }
                if HEAD_CONTENT_START_TAGS.contains(&name.as_str()) =>
            {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                let Some(head) = self.head_element_pointer else {
                    self.handle_in_head_mode(token);
                    return;
                };
                self.stack_of_open_elements.push(head);
                self.handle_in_head_mode(token);
                self.remove_from_stack(head);
            }

            Token::EndTag { name, .. } if name == "template" => self.handle_in_head_mode(token),

            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.handle_after_head_anything_else(token);
            }

            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag),

            _ => self.handle_after_head_anything_else(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn handle_after_head_anything_else(&mut self, token: &Token) {
        let _ = self.insert_html_element_named("body");
        self.switch_to(InsertionMode::InBody);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            // "An end-of-file token"
            // "Parse error. If the current node is a script element, then set
            //  its already started to true. Pop the current node off the stack
            //  of open elements. Switch the insertion mode to the original
            //  insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error(ParseErrorKind::EofWithOpenElements);
                let _ = self.pop_current_node();
                self.return_to_original_insertion_mode();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            //  insertion mode to the original insertion mode."
            //
            // Scripts are never executed, so both entries do the same thing.
            Token::EndTag { .. } => {
                let _ = self.pop_current_node();
                self.return_to_original_insertion_mode();
            }

            // The tokenizer only produces text and end tags in the raw text
            // states this mode pairs with.
            Token::StartTag { .. } | Token::Comment { .. } | Token::Doctype { .. } => {}
        }
    }

    /// "Switch the insertion mode to the original insertion mode"
    pub(in crate::parser) fn return_to_original_insertion_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_to(mode);
    }
}
