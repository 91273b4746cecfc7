use sapling_dom::NodeId;

use crate::error::ParseErrorKind;
use crate::parser::core::{HTMLParser, InsertionMode, is_whitespace};
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.handle_in_body_mode(token),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            //  stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_as_last_child_of(html, data);
            }

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            //  algorithm, this is a parse error; ignore the token. (fragment
            //  case) Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_to(InsertionMode::AfterAfterBody);
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            //  reprocess the token."
            _ => {
                self.parse_error(unexpected_kind(token));
                self.switch_to(InsertionMode::InBody);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),
                "frameset" => {
                    let _ = self.insert_html_element(token);
                }
                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements. Acknowledge the
                //  token's self-closing flag, if it is set."
                "frame" => self.insert_void_element(token),
                "noframes" => self.handle_in_head_mode(token),
                _ => self.parse_error(ParseErrorKind::UnexpectedStartTag),
            },

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name, .. } if name == "frameset" => {
                // "If the current node is the root html element, then this is
                //  a parse error; ignore the token. (fragment case)"
                if self.stack_of_open_elements.len() <= 1 {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag);
                    return;
                }
                // "Otherwise, pop the current node from the stack of open
                //  elements. If the parser was not created as part of the HTML
                //  fragment parsing algorithm (fragment case), and the current
                //  node is no longer a frameset element, then switch the
                //  insertion mode to "after frameset"."
                let _ = self.pop_current_node();
                if !self.current_node_is("frameset") {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            //  parse error. Note: The current node can only be the root html
            //  element in the fragment case. Stop parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.parse_error(ParseErrorKind::EofWithOpenElements);
                }
                self.stop_parsing();
            }

            _ => self.parse_error(unexpected_kind(token)),
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_to(InsertionMode::AfterAfterFrameset);
            }
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            Token::EndOfFile => self.stop_parsing(),
            _ => self.parse_error(unexpected_kind(token)),
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_as_last_child_of(NodeId::ROOT, data),

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion
            //  mode."
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if is_whitespace(*data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            //  reprocess the token."
            _ => {
                self.parse_error(unexpected_kind(token));
                self.switch_to(InsertionMode::InBody);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => self.insert_comment_as_last_child_of(NodeId::ROOT, data),
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if is_whitespace(*data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndOfFile => self.stop_parsing(),
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            _ => self.parse_error(unexpected_kind(token)),
        }
    }
}

/// The error kind reported for a token no rule accepts.
const fn unexpected_kind(token: &Token) -> ParseErrorKind {
    match token {
        Token::StartTag { .. } => ParseErrorKind::UnexpectedStartTag,
        Token::EndTag { .. } => ParseErrorKind::UnexpectedEndTag,
        Token::Doctype { .. } => ParseErrorKind::UnexpectedDoctype,
        Token::Character { .. } | Token::Comment { .. } | Token::EndOfFile => {
            ParseErrorKind::UnexpectedText
        }
    }
}
