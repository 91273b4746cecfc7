//! Integration tests for the HTML tokenizer.

use pretty_assertions::assert_eq;
use sapling_html::{
    Attribute, HTMLTokenizer, ParseErrorKind, StandaloneContext, Token, TokenizerState,
};

/// Tokenize `input` without a tree constructor, returning the tokens and
/// the error kinds.
fn tokenize(input: &str) -> (Vec<Token>, Vec<ParseErrorKind>) {
    let mut tokenizer = HTMLTokenizer::new(input);
    let tokens = tokenizer.run();
    let errors = tokenizer
        .take_errors()
        .into_vec()
        .into_iter()
        .map(|e| e.kind)
        .collect();
    (tokens, errors)
}

fn chars(text: &str) -> Vec<Token> {
    text.chars().map(|data| Token::Character { data }).collect()
}

fn start_tag(name: &str, attributes: &[(&str, &str)], self_closing: bool) -> Token {
    Token::StartTag {
        name: name.to_string(),
        self_closing,
        attributes: attributes
            .iter()
            .map(|(n, v)| Attribute::new((*n).to_string(), (*v).to_string()))
            .collect(),
    }
}

fn end_tag(name: &str) -> Token {
    Token::EndTag {
        name: name.to_string(),
        self_closing: false,
        attributes: Vec::new(),
    }
}

#[test]
fn test_plain_text() {
    let (tokens, errors) = tokenize("Hello");
    let mut expected = chars("Hello");
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
    assert!(errors.is_empty());
}

#[test]
fn test_doctype() {
    let (tokens, errors) = tokenize("<!DOCTYPE html>");
    assert_eq!(
        tokens,
        vec![
            Token::Doctype {
                name: Some("html".to_string()),
                public_identifier: None,
                system_identifier: None,
                force_quirks: false,
            },
            Token::EndOfFile,
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_doctype_identifiers() {
    let (tokens, _) = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    assert_eq!(
        tokens[0],
        Token::Doctype {
            name: Some("html".to_string()),
            public_identifier: Some("-//W3C//DTD HTML 4.01//EN".to_string()),
            system_identifier: Some("http://www.w3.org/TR/html4/strict.dtd".to_string()),
            force_quirks: false,
        }
    );
}

#[test]
fn test_tag_names_are_lowercased() {
    let (tokens, _) = tokenize("<DIV Class=A></DIV>");
    assert_eq!(
        tokens,
        vec![
            start_tag("div", &[("class", "A")], false),
            end_tag("div"),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_attribute_quoting_styles() {
    let (tokens, errors) = tokenize(r#"<input a="1" b='2' c=3 d>"#);
    assert_eq!(
        tokens[0],
        start_tag("input", &[("a", "1"), ("b", "2"), ("c", "3"), ("d", "")], false)
    );
    assert!(errors.is_empty());
}

#[test]
fn test_duplicate_attribute_keeps_first_value() {
    let (tokens, errors) = tokenize(r#"<a x="1" x="2">"#);
    assert_eq!(tokens[0], start_tag("a", &[("x", "1")], false));
    assert_eq!(errors, vec![ParseErrorKind::DuplicateAttribute]);
}

#[test]
fn test_self_closing_flag() {
    let (tokens, errors) = tokenize("<br/>");
    assert_eq!(tokens[0], start_tag("br", &[], true));
    assert!(errors.is_empty());
}

#[test]
fn test_end_tag_with_attributes_is_reported() {
    let (tokens, errors) = tokenize("</p class=x>");
    assert_eq!(tokens[0], end_tag("p"));
    assert_eq!(errors, vec![ParseErrorKind::EndTagWithAttributes]);
}

#[test]
fn test_end_tag_self_closing_flag_is_dropped() {
    let (tokens, errors) = tokenize("</p/>");
    assert_eq!(tokens[0], end_tag("p"));
    assert_eq!(errors, vec![ParseErrorKind::EndTagWithTrailingSolidus]);
}

#[test]
fn test_comment() {
    let (tokens, errors) = tokenize("<!-- hi -->");
    assert_eq!(
        tokens,
        vec![
            Token::Comment {
                data: " hi ".to_string()
            },
            Token::EndOfFile
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_abrupt_empty_comment() {
    let (tokens, errors) = tokenize("<!-->");
    assert_eq!(tokens[0], Token::Comment { data: String::new() });
    assert_eq!(errors, vec![ParseErrorKind::AbruptClosingOfEmptyComment]);
}

#[test]
fn test_eof_in_tag() {
    let (tokens, errors) = tokenize("<div");
    assert_eq!(tokens, vec![Token::EndOfFile]);
    assert_eq!(errors, vec![ParseErrorKind::EofInTag]);
}

#[test]
fn test_lone_less_than_is_text() {
    let (tokens, errors) = tokenize("a < b");
    let mut expected = chars("a < b");
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
    assert_eq!(errors, vec![ParseErrorKind::InvalidFirstCharacterOfTagName]);
}

#[test]
fn test_named_reference() {
    let (tokens, errors) = tokenize("&amp;");
    assert_eq!(tokens, vec![Token::Character { data: '&' }, Token::EndOfFile]);
    assert!(errors.is_empty());
}

#[test]
fn test_named_reference_without_semicolon() {
    let (tokens, errors) = tokenize("&notit;");
    let mut expected = chars("\u{AC}it;");
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
    assert_eq!(
        errors,
        vec![ParseErrorKind::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_numeric_references() {
    let (tokens, errors) = tokenize("&#65;&#x42;");
    assert_eq!(
        tokens,
        vec![
            Token::Character { data: 'A' },
            Token::Character { data: 'B' },
            Token::EndOfFile
        ]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_null_numeric_reference() {
    let (tokens, errors) = tokenize("&#0;");
    assert_eq!(tokens[0], Token::Character { data: '\u{FFFD}' });
    assert_eq!(errors, vec![ParseErrorKind::NullCharacterReference]);
}

#[test]
fn test_windows_1252_numeric_reference() {
    let (tokens, errors) = tokenize("&#x80;");
    assert_eq!(tokens[0], Token::Character { data: '\u{20AC}' });
    assert_eq!(errors, vec![ParseErrorKind::ControlCharacterReference]);
}

#[test]
fn test_reference_in_attribute_is_not_decoded_before_alphanumeric() {
    let (tokens, _) = tokenize(r#"<a href="?x=1&copy=2">"#);
    assert_eq!(tokens[0], start_tag("a", &[("href", "?x=1&copy=2")], false));
}

#[test]
fn test_carriage_returns_are_normalized() {
    let (tokens, _) = tokenize("a\r\nb\rc");
    let mut expected = chars("a\nb\nc");
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
}

#[test]
fn test_rcdata_state_only_ends_at_appropriate_end_tag() {
    let mut tokenizer = HTMLTokenizer::new("<b></x></title>");
    tokenizer.set_state(TokenizerState::RCDATA);
    tokenizer.set_last_start_tag(Some("title"));
    let tokens = tokenizer.run();

    let mut expected = chars("<b></x>");
    expected.push(end_tag("title"));
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
}

#[test]
fn test_plaintext_state_never_ends() {
    let mut tokenizer = HTMLTokenizer::new("</plaintext>");
    tokenizer.set_state(TokenizerState::PLAINTEXT);
    let tokens = tokenizer.run();

    let mut expected = chars("</plaintext>");
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
}

#[test]
fn test_cdata_outside_foreign_content_is_a_bogus_comment() {
    let (tokens, errors) = tokenize("<![CDATA[x]]>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "[CDATA[x]]".to_string()
        }
    );
    assert_eq!(errors, vec![ParseErrorKind::CdataInHtmlContent]);
}

#[test]
fn test_eof_repeats_after_end() {
    let mut tokenizer = HTMLTokenizer::new("");
    assert!(tokenizer.next_token(&StandaloneContext).token.is_eof());
    assert!(tokenizer.next_token(&StandaloneContext).token.is_eof());
}

#[test]
fn test_token_positions() {
    let mut tokenizer = HTMLTokenizer::new("a\n<p>");
    let first = tokenizer.next_token(&StandaloneContext);
    assert_eq!((first.position.line, first.position.column), (1, 1));
    let newline = tokenizer.next_token(&StandaloneContext);
    assert_eq!(newline.token, Token::Character { data: '\n' });
    let tag = tokenizer.next_token(&StandaloneContext);
    assert_eq!(tag.token, start_tag("p", &[], false));
    assert_eq!((tag.position.line, tag.position.column), (2, 1));
}

#[test]
fn test_script_data_escape_still_ends_at_script_end_tag() {
    let mut tokenizer = HTMLTokenizer::new("a<!--x</script>");
    tokenizer.set_state(TokenizerState::ScriptData);
    tokenizer.set_last_start_tag(Some("script"));
    let tokens = tokenizer.run();

    let mut expected = chars("a<!--x");
    expected.push(end_tag("script"));
    expected.push(Token::EndOfFile);
    assert_eq!(tokens, expected);
    assert!(tokenizer.take_errors().is_empty());
}
