use crate::error::ParseErrorKind;
use crate::parser::core::HTMLParser;
use crate::parser::elements::Scope;
use crate::tokenizer::Token;

/// Table tags that close a select nested in a table.
const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
            }
            Token::Character { data } => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from
                //  the stack of open elements. Insert an HTML element for the
                //  token."
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current_node();
                    }
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "optgroup""
                "optgroup" => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current_node();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.pop_current_node();
                    }
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "hr""
                "hr" => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current_node();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.pop_current_node();
                    }
                    self.insert_void_element(token);
                }

                // "A start tag whose tag name is "select""
                // "Parse error. If the stack of open elements does not have a
                //  select element in select scope, ignore the token. Otherwise:
                //  Pop elements from the stack of open elements until a select
                //  element has been popped from the stack. Reset the insertion
                //  mode appropriately."
                "select" => {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    if self.has_element_in(Scope::Select, "select") {
                        self.pop_until("select");
                        self.reset_insertion_mode_appropriately();
                    }
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                //  "textarea""
                // "Parse error. If the stack of open elements does not have a
                //  select element in select scope, ignore the token. Otherwise:
                //  Pop elements from the stack of open elements until a select
                //  element has been popped from the stack. Reset the insertion
                //  mode appropriately. Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag);
                    if !self.has_element_in(Scope::Select, "select") {
                        return;
                    }
                    self.pop_until("select");
                    self.reset_insertion_mode_appropriately();
                    self.reprocess_token(token);
                }

                "script" | "template" => self.handle_in_head_mode(token),

                _ => self.parse_error(ParseErrorKind::UnexpectedStartTag),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the
                    //  node immediately before it in the stack of open elements
                    //  is an optgroup element, then pop the current node from
                    //  the stack of open elements."
                    let len = self.stack_of_open_elements.len();
                    if self.current_node_is("option")
                        && len >= 2
                        && self.is_html_element(self.stack_of_open_elements[len - 2], "optgroup")
                    {
                        let _ = self.pop_current_node();
                    }
                    // "If the current node is an optgroup element, then pop
                    //  that node from the stack of open elements. Otherwise,
                    //  this is a parse error; ignore the token."
                    if self.current_node_is("optgroup") {
                        let _ = self.pop_current_node();
                    } else {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    }
                }

                // "An end tag whose tag name is "option""
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current_node();
                    } else {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    }
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    if !self.has_element_in(Scope::Select, "select") {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag);
                        return;
                    }
                    self.pop_until("select");
                    self.reset_insertion_mode_appropriately();
                }

                "template" => self.handle_in_head_mode(token),

                _ => self.parse_error(ParseErrorKind::UnexpectedEndTag),
            },

            Token::EndOfFile => self.handle_in_body_mode(token),
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until
            //  a select element has been popped from the stack. Reset the
            //  insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag);
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. If the stack of open elements does not have an
            //  element in table scope that is an HTML element with the same
            //  tag name as that of the token, then ignore the token. Otherwise:
            //  Pop elements from the stack of open elements until a select
            //  element has been popped from the stack. Reset the insertion mode
            //  appropriately. Reprocess the token."
            Token::EndTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag);
                if !self.has_element_in_table_scope(name) {
                    return;
                }
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }

            _ => self.handle_in_select_mode(token),
        }
    }
}
