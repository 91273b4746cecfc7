//! Parse errors and the error log.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "Certain points in the parsing algorithm are said to be parse errors.
//! The error handling for parse errors is well-defined."
//!
//! Parse errors never change control flow. The tokenizer and the tree
//! constructor append to an [`ErrorLog`] that callers inspect afterwards.

use sapling_common::Position;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Coarse grouping of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorCategory {
    /// A `&...` reference that is unknown, unterminated or out of range.
    MalformedCharacterReference,
    /// A character the current state does not allow.
    UnexpectedCharacter,
    /// An end tag with no matching open element, or a malformed end tag.
    UnexpectedEndTag,
    /// A start tag the current insertion mode does not allow.
    UnexpectedStartTag,
    /// The same attribute name twice on one tag.
    DuplicateAttribute,
    /// A missing or malformed DOCTYPE.
    Doctype,
    /// End of input inside a construct or with elements still open.
    PrematureEof,
    /// Mis-nested formatting elements handled by the adoption agency.
    MisnestedFormatting,
}

/// The kind of a parse error.
///
/// Tokenizer kinds use the WHATWG error codes (their `Display` form is the
/// kebab-case code, e.g. `duplicate-attribute`). Tree construction errors
/// have no standard codes; their names describe the situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorKind {
    // ----- tokenizer: character references -----
    /// `&#;` or `&#x;` with no digits.
    AbsenceOfDigitsInNumericCharacterReference,
    /// A numeric reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// A numeric reference to a control character.
    ControlCharacterReference,
    /// A named or numeric reference not followed by `;`.
    MissingSemicolonAfterCharacterReference,
    /// A numeric reference to a noncharacter.
    NoncharacterCharacterReference,
    /// `&#0;`.
    NullCharacterReference,
    /// A numeric reference to a surrogate.
    SurrogateCharacterReference,
    /// `&name;` that matches no named reference.
    UnknownNamedCharacterReference,

    // ----- tokenizer: input stream -----
    /// A control character in the input.
    ControlCharacterInInputStream,
    /// A noncharacter in the input.
    NoncharacterInInputStream,
    /// U+0000 where it is not allowed.
    UnexpectedNullCharacter,

    // ----- tokenizer: tags and attributes -----
    /// An attribute name already present on the tag.
    DuplicateAttribute,
    /// An end tag carrying attributes.
    EndTagWithAttributes,
    /// An end tag with a self-closing flag.
    EndTagWithTrailingSolidus,
    /// `<` immediately followed by EOF.
    EofBeforeTagName,
    /// `<` followed by a character that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `name=` followed by `>`.
    MissingAttributeValue,
    /// `</>`.
    MissingEndTagName,
    /// Two attributes with no whitespace between them.
    MissingWhitespaceBetweenAttributes,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `=` where an attribute name should start.
    UnexpectedEqualsSignBeforeAttributeName,
    /// `<?`.
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag not followed by `>`.
    UnexpectedSolidusInTag,
    /// End of input inside a tag.
    EofInTag,

    // ----- tokenizer: comments and CDATA -----
    /// `<!-->` or `<!--->`.
    AbruptClosingOfEmptyComment,
    /// `<![CDATA[` outside foreign content.
    CdataInHtmlContent,
    /// End of input inside a CDATA section.
    EofInCdata,
    /// End of input inside a comment.
    EofInComment,
    /// End of input inside `<!--` in script data.
    EofInScriptHtmlCommentLikeText,
    /// `--!>`.
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`.
    IncorrectlyOpenedComment,
    /// `<!--` inside a comment.
    NestedComment,

    // ----- tokenizer: DOCTYPE -----
    /// `>` inside a quoted public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a quoted system identifier.
    AbruptDoctypeSystemIdentifier,
    /// End of input inside a DOCTYPE.
    EofInDoctype,
    /// Garbage after the DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<!DOCTYPE>`.
    MissingDoctypeName,
    /// `PUBLIC` with no identifier.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` with no identifier.
    MissingDoctypeSystemIdentifier,
    /// Unquoted public identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// Unquoted system identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// `PUBLIC"`.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"`.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`.
    MissingWhitespaceBeforeDoctypeName,
    /// `"public""system"`.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// Garbage after the system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,

    // ----- tree construction -----
    /// No DOCTYPE before the first element.
    MissingDoctype,
    /// A DOCTYPE that is not `<!DOCTYPE html>` or an allowed legacy form.
    NonConformingDoctype,
    /// A DOCTYPE after the initial insertion mode.
    UnexpectedDoctype,
    /// A start tag the insertion mode does not allow.
    UnexpectedStartTag,
    /// An end tag the insertion mode does not allow.
    UnexpectedEndTag,
    /// Non-whitespace text where only whitespace is allowed.
    UnexpectedText,
    /// An end tag that closes elements other than the one it names.
    UnclosedElements,
    /// `<br/>`-style self-closing syntax on a non-void HTML element.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// End of input while elements are still open.
    EofWithOpenElements,
    /// A formatting end tag that does not close the current node.
    MisnestedFormattingElement,
    /// A formatting end tag whose element is open but not in scope.
    FormattingElementNotInScope,
    /// A formatting end tag whose element is no longer open.
    FormattingElementNotOpen,
}

impl ParseErrorKind {
    /// The WHATWG-style error code, e.g. `"eof-in-tag"`.
    #[must_use]
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Map this kind onto the coarse error taxonomy.
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::AbsenceOfDigitsInNumericCharacterReference
            | Self::CharacterReferenceOutsideUnicodeRange
            | Self::ControlCharacterReference
            | Self::MissingSemicolonAfterCharacterReference
            | Self::NoncharacterCharacterReference
            | Self::NullCharacterReference
            | Self::SurrogateCharacterReference
            | Self::UnknownNamedCharacterReference => ErrorCategory::MalformedCharacterReference,

            Self::DuplicateAttribute => ErrorCategory::DuplicateAttribute,

            Self::EndTagWithAttributes
            | Self::EndTagWithTrailingSolidus
            | Self::MissingEndTagName
            | Self::UnexpectedEndTag
            | Self::UnclosedElements => ErrorCategory::UnexpectedEndTag,

            Self::UnexpectedStartTag | Self::NonVoidHtmlElementStartTagWithTrailingSolidus => {
                ErrorCategory::UnexpectedStartTag
            }

            Self::AbruptDoctypePublicIdentifier
            | Self::AbruptDoctypeSystemIdentifier
            | Self::InvalidCharacterSequenceAfterDoctypeName
            | Self::MissingDoctypeName
            | Self::MissingDoctypePublicIdentifier
            | Self::MissingDoctypeSystemIdentifier
            | Self::MissingQuoteBeforeDoctypePublicIdentifier
            | Self::MissingQuoteBeforeDoctypeSystemIdentifier
            | Self::MissingWhitespaceAfterDoctypePublicKeyword
            | Self::MissingWhitespaceAfterDoctypeSystemKeyword
            | Self::MissingWhitespaceBeforeDoctypeName
            | Self::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers
            | Self::UnexpectedCharacterAfterDoctypeSystemIdentifier
            | Self::MissingDoctype
            | Self::NonConformingDoctype
            | Self::UnexpectedDoctype => ErrorCategory::Doctype,

            Self::EofBeforeTagName
            | Self::EofInTag
            | Self::EofInCdata
            | Self::EofInComment
            | Self::EofInScriptHtmlCommentLikeText
            | Self::EofInDoctype
            | Self::EofWithOpenElements => ErrorCategory::PrematureEof,

            Self::MisnestedFormattingElement
            | Self::FormattingElementNotInScope
            | Self::FormattingElementNotOpen => ErrorCategory::MisnestedFormatting,

            Self::ControlCharacterInInputStream
            | Self::NoncharacterInInputStream
            | Self::UnexpectedNullCharacter
            | Self::InvalidFirstCharacterOfTagName
            | Self::MissingAttributeValue
            | Self::MissingWhitespaceBetweenAttributes
            | Self::UnexpectedCharacterInAttributeName
            | Self::UnexpectedCharacterInUnquotedAttributeValue
            | Self::UnexpectedEqualsSignBeforeAttributeName
            | Self::UnexpectedQuestionMarkInsteadOfTagName
            | Self::UnexpectedSolidusInTag
            | Self::AbruptClosingOfEmptyComment
            | Self::CdataInHtmlContent
            | Self::IncorrectlyClosedComment
            | Self::IncorrectlyOpenedComment
            | Self::NestedComment
            | Self::UnexpectedText => ErrorCategory::UnexpectedCharacter,
        }
    }
}

/// A parse error: what went wrong and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where in the input it was detected.
    pub position: Position,
}

/// Append-only list of parse errors, in the order they were detected.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    errors: Vec<ParseError>,
}

impl ErrorLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error.
    pub fn push(&mut self, kind: ParseErrorKind, position: Position) {
        self.errors.push(ParseError { kind, position });
    }

    /// Move every error out of `other` onto the end of this log.
    pub fn append(&mut self, other: &mut Self) {
        self.errors.append(&mut other.errors);
    }

    /// All errors so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Number of errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no error has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether an error of `kind` has been recorded.
    #[must_use]
    pub fn contains(&self, kind: ParseErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Consume the log.
    #[must_use]
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

/// Misuse of a parse session by its host.
///
/// Unlike [`ParseError`], these are programming errors, not properties of
/// the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A token was fed to a session that already processed end of file.
    #[error("parse session already finished; create a new session for new input")]
    AlreadyFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_kebab_case() {
        assert_eq!(ParseErrorKind::DuplicateAttribute.code(), "duplicate-attribute");
        assert_eq!(ParseErrorKind::EofInCdata.code(), "eof-in-cdata");
        assert_eq!(
            ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus.code(),
            "non-void-html-element-start-tag-with-trailing-solidus"
        );
        assert_eq!(
            ParseErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers.to_string(),
            "missing-whitespace-between-doctype-public-and-system-identifiers"
        );
    }

    #[test]
    fn categories_cover_taxonomy() {
        assert_eq!(
            ParseErrorKind::UnknownNamedCharacterReference.category(),
            ErrorCategory::MalformedCharacterReference
        );
        assert_eq!(ParseErrorKind::EofWithOpenElements.category(), ErrorCategory::PrematureEof);
        assert_eq!(
            ParseErrorKind::MisnestedFormattingElement.category(),
            ErrorCategory::MisnestedFormatting
        );
        assert_eq!(ParseErrorKind::MissingDoctype.category(), ErrorCategory::Doctype);
    }

    #[test]
    fn log_is_append_only_and_ordered() {
        let mut log = ErrorLog::new();
        log.push(ParseErrorKind::EofInTag, Position::new(1, 3, 2));
        let mut other = ErrorLog::new();
        other.push(ParseErrorKind::MissingDoctype, Position::new(1, 4, 3));
        log.append(&mut other);

        assert!(other.is_empty());
        assert_eq!(log.len(), 2);
        assert_eq!(log.errors()[1].kind, ParseErrorKind::MissingDoctype);
        assert!(log.contains(ParseErrorKind::EofInTag));
    }

    #[test]
    fn parse_error_displays_code_and_position() {
        let error = ParseError {
            kind: ParseErrorKind::EofInTag,
            position: Position::new(2, 5, 9),
        };
        assert_eq!(error.to_string(), "eof-in-tag at 2:5");
    }
}
