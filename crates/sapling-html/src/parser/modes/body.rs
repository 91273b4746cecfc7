use sapling_dom::{Namespace, QuirksMode};

use crate::error::ParseErrorKind;
use crate::parser::core::{HTMLParser, InsertionMode, is_whitespace};
use crate::parser::elements::{
    ALLOWED_OPEN_AT_BODY_END, BLOCK_END_TAGS, BLOCK_START_TAGS, FORMATTING, HEAD_CONTENT_START_TAGS,
    HEADINGS, Scope, is_special,
};
use crate::parser::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
};
use crate::parser::formatting::AdoptionOutcome;
use crate::tokenizer::{Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.handle_in_body_text_like(token);
            }
            Token::StartTag { name, .. } => self.handle_in_body_start_tag(name, token),
            Token::EndTag { name, .. } => self.handle_in_body_end_tag(name, token),
            Token::EndOfFile => self.handle_in_body_eof(token),
        }
    }

    fn handle_in_body_text_like(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any. Insert the
            //  token's character."
            Token::Character { data } if is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any. Insert the
            //  token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            Token::Comment { data } => self.insert_comment(data),

            _ => self.parse_error(ParseErrorKind::UnexpectedDoctype),
        }
    }

    /// "An end-of-file token"
    fn handle_in_body_eof(&mut self, token: &Token) {
        // "If the stack of template insertion modes is not empty, then process
        //  the token using the rules for the "in template" insertion mode."
        if !self.template_insertion_modes.is_empty() {
            self.handle_in_template_mode(token);
            return;
        }

        // "Otherwise, follow these steps: If there is a node in the stack of
        //  open elements that is not either a dd element, a dt element, an li
        //  element, ... the body element, or the html element, then this is
        //  a parse error."
        //
        // Any element still open besides html and body is reported, so an
        // unclosed paragraph counts as well.
        if self.has_unclosed_content_elements(&["body", "html"]) {
            self.parse_error(ParseErrorKind::EofWithOpenElements);
        }

        // "Stop parsing."
        self.stop_parsing();
    }

    /// Whether the stack holds an element other than those named in
    /// `allowed`.
    fn has_unclosed_content_elements(&self, allowed: &[&str]) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| !self.is_html_element_in(id, allowed))
    }

    /// The check run when the body is closed: "If there is a node in the
    /// stack of open elements that is not either a dd element, ... then this
    /// is a parse error."
    fn check_body_end_open_elements(&mut self) {
        if self.has_unclosed_content_elements(ALLOWED_OPEN_AT_BODY_END) {
            self.parse_error(ParseErrorKind::UnclosedElements);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_in_body_start_tag(&mut self, name: &str, token: &Token) {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error. If there is a template element on the stack of
                //  open elements, then ignore the token. Otherwise, for each
                //  attribute on the token, check to see if the attribute is
                //  already present on the top element of the stack of open
                //  elements. If it is not, add the attribute and its
                //  corresponding value to that element."
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                if self.stack_contains("template") {
                    return;
                }
                if let (Some(&html), Token::StartTag { attributes, .. }) =
                    (self.stack_of_open_elements.first(), token)
                {
                    self.merge_attributes_into(html, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title""
            // "Process the token using the rules for the "in head" insertion
            //  mode."
            _ if HEAD_CONTENT_START_TAGS.contains(&name) => self.handle_in_head_mode(token),

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error. If the stack of open elements has only one node
                //  on it, or if the second element on the stack of open
                //  elements is not a body element, or if there is a template
                //  element on the stack of open elements, then ignore the
                //  token. (fragment case or there is a template element on the
                //  stack) Otherwise, set the frameset-ok flag to "not ok"; then,
                //  for each attribute on the token, check to see if the
                //  attribute is already present on the body element (the second
                //  element) on the stack of open elements, and if it is not,
                //  add the attribute and its corresponding value to that
                //  element."
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return;
                };
                if !self.is_html_element(body, "body") || self.stack_contains("template") {
                    return;
                }
                self.frameset_ok = false;
                if let Token::StartTag { attributes, .. } = token {
                    self.merge_attributes_into(body, attributes);
                }
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);

                // "If the stack of open elements has only one node on it, or if
                //  the second element on the stack of open elements is not a
                //  body element, then ignore the token."
                let Some(&body) = self.stack_of_open_elements.get(1) else {
                    return;
                };
                if !self.is_html_element(body, "body") {
                    return;
                }

                // "If the frameset-ok flag is set to "not ok", ignore the token."
                if !self.frameset_ok {
                    return;
                }

                // "Otherwise, run the following steps:
                //  1. Remove the second element on the stack of open elements
                //     from its parent node, if it has one.
                //  2. Pop all the nodes from the bottom of the stack of open
                //     elements, from the current node up to, but not including,
                //     the root html element.
                //  3. Insert an HTML element for the token.
                //  4. Switch the insertion mode to "in frameset"."
                self.tree.detach(body);
                self.stack_of_open_elements.truncate(1);
                let _ = self.insert_html_element(token);
                self.switch_to(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "address", "article",
            //  "aside", "blockquote", "center", "details", "dialog", "dir",
            //  "div", "dl", "fieldset", "figcaption", "figure", "footer",
            //  "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            //  "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            //  then close a p element. Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                //  of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
                //  parse error; pop the current node off the stack of open
                //  elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    let _ = self.pop_current_node();
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            //  then close a p element. Insert an HTML element for the token. If
            //  the next token is a U+000A LINE FEED (LF) character token, then
            //  ignore that token and move on to the next one. Set the
            //  frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                // "If the form element pointer is not null, and there is no
                //  template element on the stack of open elements, then this
                //  is a parse error; ignore the token."
                let has_template = self.stack_contains("template");
                if self.form_element_pointer.is_some() && !has_template {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    return;
                }
                // "Otherwise: If the stack of open elements has a p element in
                //  button scope, then close a p element. Insert an HTML element
                //  for the token, and, if there is no template element on the
                //  stack of open elements, set the form element pointer to
                //  point to the element created."
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(token);
                if !has_template {
                    self.form_element_pointer = form;
                }
            }

            // "A start tag whose tag name is "li""
            // "A start tag whose tag name is one of: "dd", "dt""
            "li" | "dd" | "dt" => self.handle_list_item_start_tag(name, token),

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            //  then close a p element. Insert an HTML element for the token.
            //  Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(token);
                self.request_tokenizer_state(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "If the stack of open elements has a button element in scope,
                //  then run these substeps: Parse error. Generate implied end
                //  tags. Pop elements from the stack of open elements until a
                //  button element has been popped from the stack."
                if self.has_element_in_scope("button") {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    self.generate_implied_end_tags();
                    self.pop_until("button");
                }
                // "Reconstruct the active formatting elements, if any. Insert
                //  an HTML element for the token. Set the frameset-ok flag to
                //  "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                //  element between the end of the list and the last marker on
                //  the list (or the start of the list if there is no marker on
                //  the list), then this is a parse error; run the adoption
                //  agency algorithm for the token, then remove that element
                //  from the list of active formatting elements and the stack of
                //  open elements if the adoption agency algorithm didn't
                //  already remove it (it might not have if the element is not
                //  in table scope)."
                if let Some(existing) = self.formatting_element_after_last_marker("a") {
                    self.parse_error(ParseErrorKind::MisnestedFormattingElement);
                    let _ = self.run_adoption_agency("a");
                    self.remove_from_formatting_list(existing);
                    self.remove_from_stack(existing);
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                // "Reconstruct the active formatting elements, if any. If the
                //  stack of open elements has a nobr element in scope, then
                //  this is a parse error; run the adoption agency algorithm for
                //  the token, then once again reconstruct the active formatting
                //  elements, if any."
                self.reconstruct_active_formatting_elements();
                if self.has_element_in_scope("nobr") {
                    self.parse_error(ParseErrorKind::MisnestedFormattingElement);
                    let _ = self.run_adoption_agency("nobr");
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            //  "font", "i", "s", "small", "strike", "strong", "tt", "u""
            // "Reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token. Push onto the list of active
            //  formatting elements that element."
            _ if FORMATTING.contains(&name) => self.insert_formatting_element(token),

            // "A start tag whose tag name is one of: "applet", "marquee",
            //  "object""
            // "Reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token. Insert a marker at the end of the
            //  list of active formatting elements. Set the frameset-ok flag to
            //  "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.insert_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            //  elements has a p element in button scope, then close a p
            //  element. Insert an HTML element for the token. Set the
            //  frameset-ok flag to "not ok". Switch the insertion mode to "in
            //  table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            //  "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token. Immediately pop the current node off
            //  the stack of open elements. Acknowledge the token's self-closing
            //  flag, if it is set. Set the frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(token);
                // "If the token does not have an attribute with the name
                //  "type", or if it does, but that attribute's value is not an
                //  ASCII case-insensitive match for the string "hidden", then:
                //  set the frameset-ok flag to "not ok"."
                if !token
                    .attribute("type")
                    .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
                {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            //  node off the stack of open elements. Acknowledge the token's
            //  self-closing flag, if it is set."
            "param" | "source" | "track" => self.insert_void_element(token),

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_element_in_button_scope();
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            //  it. (Don't ask.)"
            "image" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                if let Token::StartTag {
                    self_closing,
                    attributes,
                    ..
                } = token
                {
                    let img = Token::StartTag {
                        name: "img".to_string(),
                        self_closing: *self_closing,
                        attributes: attributes.clone(),
                    };
                    self.reprocess_token(&img);
                }
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // "Insert an HTML element for the token. If the next token is a
                //  U+000A LINE FEED (LF) character token, then ignore that token
                //  and move on to the next one. Switch the tokenizer to the
                //  RCDATA state. Let the original insertion mode be the current
                //  insertion mode. Set the frameset-ok flag to "not ok". Switch
                //  the insertion mode to "text"."
                self.parse_rcdata_element(token);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_raw_text_element(token);
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                self.parse_raw_text_element(token);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_raw_text_element(token),
            "noscript" if self.scripting => self.parse_raw_text_element(token),

            // "A start tag whose tag name is "select""
            "select" => {
                // "Reconstruct the active formatting elements, if any. Insert an
                //  HTML element for the token. Set the frameset-ok flag to "not
                //  ok". If the insertion mode is one of "in table", "in
                //  caption", "in table body", "in row", or "in cell", then
                //  switch the insertion mode to "in select in table".
                //  Otherwise, switch the insertion mode to "in select"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                let next = if matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                ) {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
                self.switch_to(next);
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            //  node off the stack of open elements. Reconstruct the active
            //  formatting elements, if any. Insert an HTML element for the
            //  token."
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.pop_current_node();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            //  generate implied end tags. If the current node is not now a ruby
            //  element, this is a parse error. Insert an HTML element for the
            //  token."
            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags();
                    if !self.current_node_is("ruby") {
                        self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            //  generate implied end tags, except for rtc elements. If the
            //  current node is not now a rtc element or a ruby element, this is
            //  a parse error. Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            "math" | "svg" => self.insert_foreign_root(name, token),

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            //  "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot"
            | "th" | "thead" | "tr" => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an
            //  HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
    }

    /// "A start tag whose tag name is "li"" and "A start tag whose tag name is
    /// one of: "dd", "dt"".
    fn handle_list_item_start_tag(&mut self, name: &str, token: &Token) {
        // STEP 1: "Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // The element types closed by this start tag.
        let closes: &[&str] = if name == "li" { &["li"] } else { &["dd", "dt"] };

        // STEP 2-3: "Initialize node to be the current node (the bottommost
        //            node of the stack). Loop:"
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };

            // "If node is an li (dd, dt) element, then run these substeps:
            //  Generate implied end tags, except for li elements. If the
            //  current node is not an li element, then this is a parse error.
            //  Pop elements from the stack of open elements until an li
            //  element has been popped from the stack. Jump to the step
            //  labeled done below."
            if element.namespace == Namespace::Html && closes.contains(&element.tag_name.as_str())
            {
                let node_name = element.tag_name.clone();
                self.generate_implied_end_tags_excluding(Some(&node_name));
                if !self.current_node_is(&node_name) {
                    self.parse_error(ParseErrorKind::UnclosedElements);
                }
                self.pop_until(&node_name);
                break;
            }

            // "If node is in the special category, but is not an address,
            //  div, or p element, then jump to the step labeled done below."
            if is_special(element)
                && !(element.namespace == Namespace::Html
                    && matches!(element.tag_name.as_str(), "address" | "div" | "p"))
            {
                break;
            }

            // "Otherwise, set node to the previous entry in the stack of open
            //  elements and return to the step labeled loop."
        }

        // STEP 4: "Done: If the stack of open elements has a p element in
        //          button scope, then close a p element."
        self.close_p_element_in_button_scope();

        // STEP 5: "Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(token);
    }

    /// Reconstruct, insert, and push onto the list of active formatting
    /// elements.
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        if let Some(element) = self.insert_html_element(token) {
            self.push_active_formatting_element(element, token);
        }
    }

    /// Insert an element that never has children and acknowledge the
    /// self-closing flag.
    pub(in crate::parser) fn insert_void_element(&mut self, token: &Token) {
        let _ = self.insert_html_element(token);
        let _ = self.pop_current_node();
        self.acknowledge_self_closing_flag();
    }

    /// "A start tag whose tag name is "math"" / "svg"
    ///
    /// "Reconstruct the active formatting elements, if any. Adjust MathML
    /// (SVG) attributes for the token. Adjust foreign attributes for the
    /// token. Insert a foreign element for the token, with MathML (SVG)
    /// namespace and false. If the token has its self-closing flag set, pop
    /// the current node off the stack of open elements and acknowledge the
    /// token's self-closing flag."
    fn insert_foreign_root(&mut self, name: &str, token: &Token) {
        let Token::StartTag {
            attributes,
            self_closing,
            ..
        } = token
        else {
            return;
        };

        self.reconstruct_active_formatting_elements();

        let mut attributes = attributes.clone();
        let namespace = if name == "math" {
            adjust_mathml_attributes(&mut attributes);
            Namespace::MathMl
        } else {
            adjust_svg_attributes(&mut attributes);
            Namespace::Svg
        };
        adjust_foreign_attributes(&mut attributes);

        let _ = self.insert_foreign_element(name, &attributes, namespace);
        if *self_closing {
            let _ = self.pop_current_node();
            self.acknowledge_self_closing_flag();
        }
    }

    #[allow(clippy::too_many_lines)]
    fn handle_in_body_end_tag(&mut self, name: &str, token: &Token) {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion
            //  mode."
            "template" => self.handle_in_head_mode(token),

            // "An end tag whose tag name is "body""
            "body" => {
                // "If the stack of open elements does not have a body element
                //  in scope, this is a parse error; ignore the token."
                if !self.has_element_in_scope("body") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.check_body_end_open_elements();
                // "Switch the insertion mode to "after body"."
                self.switch_to(InsertionMode::AfterBody);
            }

            // "An end tag whose tag name is "html""
            "html" => {
                if !self.has_element_in_scope("body") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.check_body_end_open_elements();
                // "Switch the insertion mode to "after body". Reprocess the
                //  token."
                self.switch_to(InsertionMode::AfterBody);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "address", "article", ...
            //  "ul""
            // "If the stack of open elements does not have an element in scope
            //  that is an HTML element with the same tag name as that of the
            //  token, then this is a parse error; ignore the token. Otherwise,
            //  run these steps: Generate implied end tags. If the current node
            //  is not an HTML element with the same tag name as that of the
            //  token, then this is a parse error. Pop elements from the stack
            //  of open elements until an HTML element with the same tag name as
            //  the token has been popped from the stack."
            _ if BLOCK_END_TAGS.contains(&name) => {
                if !self.has_element_in_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element_with_implied_end_tags(name);
            }

            // "An end tag whose tag name is "form""
            "form" => self.handle_form_end_tag(),

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in
            //  button scope, then this is a parse error; insert an HTML element
            //  for a "p" start tag token with no attributes. Close a p
            //  element."
            "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    let _ = self.insert_html_element_named("p");
                }
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in
            //  list item scope, then this is a parse error; ignore the token."
            "li" => {
                if !self.has_element_in(Scope::ListItem, "li") {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element_excluding_itself(name);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.has_element_in_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element_excluding_itself(name);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element and whose tag name is one of
                //  "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                //  error; ignore the token."
                if !self.has_any_element_in(Scope::Default, HEADINGS) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.generate_implied_end_tags();
                if !self.current_node_is(name) {
                    self.parse_error(ParseErrorKind::UnclosedElements);
                }
                self.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            //  "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            //  "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if FORMATTING.contains(&name) => {
                if self.run_adoption_agency(name) == AdoptionOutcome::AnyOtherEndTag {
                    self.handle_any_other_end_tag(name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            //  "object""
            "applet" | "marquee" | "object" => {
                if !self.has_element_in_scope(name) {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                self.close_element_with_implied_end_tags(name);
                // "Clear the list of active formatting elements up to the last
                //  marker."
                self.clear_active_formatting_elements_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            //  described in the next entry; i.e. act as if this was a "br"
            //  start tag token with no attributes, rather than the end tag
            //  token that it actually is."
            "br" => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element_named("br");
                let _ = self.pop_current_node();
                self.frameset_ok = false;
            }

            _ => self.handle_any_other_end_tag(name),
        }
    }

    /// Generate implied end tags except for `name`, report an error if the
    /// current node is not `name`, then pop until `name` has been popped.
    fn close_element_excluding_itself(&mut self, name: &str) {
        self.generate_implied_end_tags_excluding(Some(name));
        if !self.current_node_is(name) {
            self.parse_error(ParseErrorKind::UnclosedElements);
        }
        self.pop_until(name);
    }

    /// "An end tag whose tag name is "form""
    fn handle_form_end_tag(&mut self) {
        // "If there is no template element on the stack of open elements,
        //  then run these substeps:"
        if !self.stack_contains("template") {
            // "Let node be the element that the form element pointer is set
            //  to, or null if it is not set to an element. Set the form element
            //  pointer to null."
            let node = self.form_element_pointer.take();

            // "If node is null or if the stack of open elements does not have
            //  node in scope, then this is a parse error; return and ignore the
            //  token."
            let Some(node) = node.filter(|&node| self.has_node_in_scope(node)) else {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
                return;
            };

            // "Generate implied end tags. If the current node is not node, then
            //  this is a parse error. Remove node from the stack of open
            //  elements."
            self.generate_implied_end_tags();
            if self.current_node() != Some(node) {
                self.parse_error(ParseErrorKind::UnclosedElements);
            }
            self.remove_from_stack(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        //  run these substeps instead: If the stack of open elements does not
        //  have a form element in scope, then this is a parse error; return
        //  and ignore the token. Generate implied end tags. If the current node
        //  is not a form element, then this is a parse error. Pop elements from
        //  the stack of open elements until a form element has been popped
        //  from the stack."
        if !self.has_element_in_scope("form") {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
            return;
        }
        self.close_element_with_implied_end_tags("form");
    }

    /// "Any other end tag" in "in body".
    pub(in crate::parser) fn handle_any_other_end_tag(&mut self, name: &str) {
        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];

            // STEP 2: "Loop: If node is an HTML element with the same tag name
            //          as the token, then: Generate implied end tags, except
            //          for HTML elements with the same tag name as the token.
            //          If node is not the current node, then this is a parse
            //          error. Pop all the nodes from the current node up to
            //          node, including node, then stop these steps."
            if self.is_html_element(node, name) {
                self.generate_implied_end_tags_excluding(Some(name));
                if self.current_node() != Some(node) {
                    self.parse_error(ParseErrorKind::UnclosedElements);
                }
                self.pop_until_node(node);
                return;
            }

            // STEP 3: "Otherwise, if node is in the special category, then this
            //          is a parse error; ignore the token, and return."
            if self.tree.as_element(node).is_some_and(is_special) {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
                return;
            }

            // STEP 4: "Set node to the previous entry in the stack of open
            //          elements. Return to the step labeled loop."
        }
    }
}
