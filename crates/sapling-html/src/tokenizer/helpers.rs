//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - End tag helpers for RCDATA, RAWTEXT and script data
//! - Attribute helpers for duplicate detection
//! - Parse error reporting

use log::trace;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::{PositionedToken, Token};
use crate::error::ParseErrorKind;

const TARGET: &str = "sapling::tokenizer";

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next iteration of the
    /// main loop.
    pub(super) fn switch_to(&mut self, new_state: TokenizerState) {
        if self.state != new_state {
            trace!(target: TARGET, "{} -> {}", self.state, new_state);
        }
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// Pushes the current input character back so the new state consumes
    /// it again.
    pub(super) fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.input.reconsume();
        self.switch_to(new_state);
    }

    /// Switch to the return state, which the character reference states
    /// always have set.
    pub(super) fn switch_to_return_state(&mut self) {
        let return_state = self.take_return_state();
        self.switch_to(return_state);
    }

    /// Reconsume in the return state.
    pub(super) fn reconsume_in_return_state(&mut self) {
        let return_state = self.take_return_state();
        self.reconsume_in(return_state);
    }

    fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    ///
    /// Characters seen for the first time are checked for the input stream
    /// errors of [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream).
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input.advance();
        if let Some(c) = c
            && self.input.last_was_fresh()
        {
            if is_noncharacter(u32::from(c)) {
                self.log_parse_error(ParseErrorKind::NoncharacterInInputStream);
            } else if is_control(u32::from(c)) && !Self::is_whitespace_char(c) && c != '\0' {
                self.log_parse_error(ParseErrorKind::ControlCharacterInInputStream);
            }
        }
        c
    }

    /// Remember where the token that starts with the current `<` begins.
    pub(super) fn mark_token_start(&mut self) {
        self.token_start = self.input.position();
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// The tokenizer never sees U+000D CR, which preprocessing removes.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        // "U+0009 CHARACTER TABULATION (tab)"
        // "U+000A LINE FEED (LF)"
        // "U+000C FORM FEED (FF)"
        // "U+0020 SPACE"
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

/// [Infra: noncharacter](https://infra.spec.whatwg.org/#noncharacter)
pub(super) const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || ((code & 0xFFFE) == 0xFFFE && code <= 0x10_FFFF)
}

/// [Infra: control](https://infra.spec.whatwg.org/#control)
///
/// "A C0 control or a code point in the range U+007F DELETE to U+009F
/// APPLICATION PROGRAM COMMAND, inclusive."
pub(super) const fn is_control(code: u32) -> bool {
    code <= 0x1F || matches!(code, 0x7F..=0x9F)
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// Start tags update the last start tag name. End tags carrying
    /// attributes or a self-closing flag are parse errors; both are dropped
    /// from the emitted token.
    pub(super) fn emit_token(&mut self) {
        self.discard_duplicate_attribute();
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        match &mut token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.clone());
            }
            Token::EndTag {
                attributes,
                self_closing,
                ..
            } => {
                // "When an end tag token is emitted with attributes, that is an
                // end-tag-with-attributes parse error."
                if !attributes.is_empty() {
                    self.log_parse_error(ParseErrorKind::EndTagWithAttributes);
                }
                // "When an end tag token is emitted with its self-closing flag
                // set, that is an end-tag-with-trailing-solidus parse error."
                if *self_closing {
                    self.log_parse_error(ParseErrorKind::EndTagWithTrailingSolidus);
                }
                // End tags carry only a name past this point.
                attributes.clear();
                *self_closing = false;
            }
            _ => {}
        }
        trace!(target: TARGET, "emit {token} at {}", self.token_start);
        self.pending.push_back(PositionedToken {
            token,
            position: self.token_start,
        });
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending.push_back(PositionedToken {
            token: Token::new_character(c),
            position: self.input.position(),
        });
    }

    /// Emit every character of `s` as a character token.
    pub(super) fn emit_character_tokens(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_character_token(c);
        }
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.emitted_eof = true;
        self.pending.push_back(PositionedToken {
            token: Token::new_eof(),
            position: self.input.position(),
        });
    }

    /// The DOCTYPE states all handle EOF the same way:
    /// "Set the current DOCTYPE token's force-quirks flag to on. Emit the
    /// current DOCTYPE token. Emit an end-of-file token."
    pub(super) fn emit_doctype_at_eof(&mut self) {
        self.log_parse_error(ParseErrorKind::EofInDoctype);
        self.current_doctype_mut().set_force_quirks();
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// Current Token Accessors
// =============================================================================

impl HTMLTokenizer {
    /// The DOCTYPE token under construction, created on demand.
    pub(super) fn current_doctype_mut(&mut self) -> &mut Token {
        if !matches!(self.current_token, Some(Token::Doctype { .. })) {
            self.current_token = Some(Token::new_doctype());
        }
        self.current_token.get_or_insert_with(Token::new_doctype)
    }

    /// Apply `f` to the token under construction, if any.
    pub(super) fn with_current_token(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }
}

// =============================================================================
// RCDATA/RAWTEXT/Script Data Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// The "anything else" branch shared by the RCDATA, RAWTEXT, script
    /// data and script data escaped end tag name states:
    ///
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
    /// character token, and a character token for each of the characters in
    /// the temporary buffer (in the order they were added to the buffer).
    /// Reconsume in the X state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        // STEP 1: "Emit a U+003C LESS-THAN SIGN character token"
        self.emit_character_token('<');
        // STEP 2: "Emit a U+002F SOLIDUS character token"
        self.emit_character_token('/');
        // STEP 3: "a character token for each of the characters in the temporary buffer"
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_character_tokens(&buffer);
        self.temporary_buffer = buffer;
        // STEP 4: The end tag token under construction is abandoned.
        self.current_token = None;
        // STEP 5: "Reconsume in the X state"
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token." A pending duplicate
    /// is dropped first so the new attribute never inherits its value.
    pub(super) fn start_new_attribute(&mut self) {
        self.discard_duplicate_attribute();
        self.with_current_token(Token::start_new_attribute);
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's name
    /// must be compared to the other attributes on the same token; if there is
    /// already an attribute on the token with the exact same name, then this is
    /// a duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    ///
    /// The attribute stays on the token until its value has been consumed,
    /// so the value cannot land on the earlier attribute.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);

        if is_duplicate {
            self.log_parse_error(ParseErrorKind::DuplicateAttribute);
            self.current_attribute_is_duplicate = true;
        }
    }

    fn discard_duplicate_attribute(&mut self) {
        if self.current_attribute_is_duplicate {
            self.current_attribute_is_duplicate = false;
            self.with_current_token(Token::remove_current_attribute);
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors are recorded with the current input position and never
    /// change what the tokenizer does next.
    pub(super) fn log_parse_error(&mut self, kind: ParseErrorKind) {
        let position = self.input.position();
        trace!(target: TARGET, "parse error {kind} at {position} in {}", self.state);
        self.errors.push(kind, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noncharacters() {
        assert!(is_noncharacter(0xFDD0));
        assert!(is_noncharacter(0xFFFE));
        assert!(is_noncharacter(0x10_FFFF));
        assert!(is_noncharacter(0x2_FFFF));
        assert!(!is_noncharacter(0xFFFD));
        assert!(!is_noncharacter(0x41));
    }

    #[test]
    fn controls() {
        assert!(is_control(0x01));
        assert!(is_control(0x7F));
        assert!(is_control(0x9F));
        assert!(!is_control(0xA0));
        assert!(!is_control(u32::from('a')));
    }
}
