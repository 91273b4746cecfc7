//! Integration tests for tree construction.
//!
//! Trees are compared through [`dump_tree`], the html5lib fixture format,
//! so a failure shows the whole document diff.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use sapling_dom::{DomTree, NodeId, QuirksMode};
use sapling_html::dump::dump_tree;
use sapling_html::{
    HTMLParser, ParseErrorKind, ParseOutput, ParserOptions, PositionedToken, SessionError, Token,
    parse_document, parse_document_with,
};

fn kinds(output: &ParseOutput) -> Vec<ParseErrorKind> {
    output.errors.iter().map(|e| e.kind).collect()
}

/// Build the expected dump from lines without the `| ` prefix.
fn document(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("| {line}\n")).collect()
}

#[test]
fn test_unclosed_paragraph() {
    let output = parse_document("<p>Hi");
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<html>", "  <head>", "  <body>", "    <p>", "      \"Hi\""])
    );
    assert!(kinds(&output).contains(&ParseErrorKind::EofWithOpenElements));
}

#[test]
fn test_misnested_formatting_elements() {
    let output = parse_document("<b><i>X</b></i>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <b>",
            "      <i>",
            "        \"X\"",
        ])
    );
    assert_eq!(
        kinds(&output),
        vec![
            ParseErrorKind::MissingDoctype,
            ParseErrorKind::MisnestedFormattingElement,
            ParseErrorKind::FormattingElementNotOpen,
        ]
    );
}

#[test]
fn test_adoption_agency_moves_block_out_of_formatting_element() {
    let output = parse_document("<a><p>X</a>Y");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <a>",
            "    <p>",
            "      <a>",
            "        \"X\"",
            "      \"Y\"",
        ])
    );
    assert!(kinds(&output).contains(&ParseErrorKind::MisnestedFormattingElement));
}

#[test]
fn test_adoption_agency_drops_far_formatting_elements() {
    // The fourth element above the furthest block leaves the formatting list
    // and is not cloned.
    let output = parse_document("<a><b><i><u><s><div>x</a>y");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <a>",
            "      <b>",
            "        <i>",
            "          <u>",
            "            <s>",
            "    <i>",
            "      <u>",
            "        <s>",
            "          <div>",
            "            <a>",
            "              \"x\"",
            "            \"y\"",
        ])
    );
}

/// Every node is reached once from the root and agrees with its parent link.
fn assert_single_parent_tree(tree: &DomTree) {
    let mut seen = HashSet::new();
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        assert!(seen.insert(id), "{id:?} reached twice");
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
            stack.push(child);
        }
    }
}

#[test]
fn test_long_formatting_run_terminates() {
    let input = format!("{}<div>x{}", "<b>".repeat(50), "</b>".repeat(50));
    let output = parse_document(&input);
    assert_single_parent_tree(&output.tree);
    assert_eq!(output.tree.text_content(NodeId::ROOT), "x");
    assert!(kinds(&output).contains(&ParseErrorKind::MisnestedFormattingElement));
}

#[test]
fn test_deeply_nested_document_dumps() {
    let depth = 6_000;
    let output = parse_document(&"<div>".repeat(depth));
    let dump = dump_tree(&output.tree);

    assert_eq!(dump.lines().count(), 3 + depth);
    let deepest = format!("| {}<div>", "  ".repeat(depth + 1));
    assert_eq!(dump.lines().last(), Some(deepest.as_str()));
}

#[test]
fn test_formatting_elements_are_reconstructed() {
    let output = parse_document("<p><b>x<p>y");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <p>",
            "      <b>",
            "        \"x\"",
            "    <p>",
            "      <b>",
            "        \"y\"",
        ])
    );
}

#[test]
fn test_character_reference_in_text() {
    let output = parse_document("<!DOCTYPE html>&amp;");
    assert_eq!(output.tree.text_content(NodeId::ROOT), "&");
    assert!(output.errors.is_empty());
}

#[test]
fn test_complete_document_has_no_errors() {
    let output = parse_document("<!DOCTYPE html><html><head></head><body></body></html>");
    assert_eq!(output.quirks_mode, QuirksMode::NoQuirks);
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<!DOCTYPE html>", "<html>", "  <head>", "  <body>"])
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let output = parse_document(r#"<a x="1" x="2">"#);
    let tree = &output.tree;
    let body = tree.body().expect("body");
    let a = tree.first_child(body).expect("a");
    assert_eq!(tree.as_element(a).and_then(|e| e.get_attribute("x")), Some("1"));
    assert!(kinds(&output).contains(&ParseErrorKind::DuplicateAttribute));
}

#[test]
fn test_missing_doctype_is_quirks() {
    let output = parse_document("<p>x</p>");
    assert_eq!(output.quirks_mode, QuirksMode::Quirks);
    assert_eq!(kinds(&output), vec![ParseErrorKind::MissingDoctype]);
}

#[test]
fn test_legacy_doctypes_select_quirks_modes() {
    let transitional = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#;
    assert_eq!(parse_document(transitional).quirks_mode, QuirksMode::Quirks);

    let with_system = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#;
    assert_eq!(
        parse_document(with_system).quirks_mode,
        QuirksMode::LimitedQuirks
    );

    let output = parse_document(r#"<!DOCTYPE html SYSTEM "about:legacy-compat">"#);
    assert_eq!(output.quirks_mode, QuirksMode::NoQuirks);
    assert!(!kinds(&output).contains(&ParseErrorKind::NonConformingDoctype));
}

#[test]
fn test_iframe_srcdoc_never_quirks() {
    let options = ParserOptions::new().with_iframe_srcdoc(true);
    let output = parse_document_with("<p>x", &options);
    assert_eq!(output.quirks_mode, QuirksMode::NoQuirks);
    assert!(!kinds(&output).contains(&ParseErrorKind::MissingDoctype));
}

#[test]
fn test_text_is_foster_parented_out_of_tables() {
    let output = parse_document("<table>X</table>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<html>", "  <head>", "  <body>", "    \"X\"", "    <table>"])
    );
    assert!(kinds(&output).contains(&ParseErrorKind::UnexpectedText));
}

#[test]
fn test_table_sections_are_implied() {
    let output = parse_document("<table><tr><td>1</td></tr></table>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <table>",
            "      <tbody>",
            "        <tr>",
            "          <td>",
            "            \"1\"",
        ])
    );
}

#[test]
fn test_list_items_close_each_other() {
    let output = parse_document("<ul><li>a<li>b</ul>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <ul>",
            "      <li>",
            "        \"a\"",
            "      <li>",
            "        \"b\"",
        ])
    );
}

#[test]
fn test_select_options() {
    let output = parse_document("<select><option>a<option>b</select>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <select>",
            "      <option>",
            "        \"a\"",
            "      <option>",
            "        \"b\"",
        ])
    );
}

#[test]
fn test_textarea_drops_leading_newline() {
    let output = parse_document("<textarea>\nfoo</textarea>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<html>", "  <head>", "  <body>", "    <textarea>", "      \"foo\""])
    );
}

#[test]
fn test_pre_drops_only_first_newline() {
    let output = parse_document("<pre>\n\nx</pre>");
    let tree = &output.tree;
    let pre = tree.first_child(tree.body().expect("body")).expect("pre");
    assert_eq!(tree.text_content(pre), "\nx");
}

#[test]
fn test_template_contents() {
    let output = parse_document("<template><p>x</p></template>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "    <template>",
            "      content",
            "        <p>",
            "          \"x\"",
            "  <body>",
        ])
    );
}

#[test]
fn test_svg_names_are_adjusted() {
    let output = parse_document(r#"<svg viewbox="0 0 1 1"><foreignobject></foreignobject></svg>"#);
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <svg svg>",
            "      viewBox=\"0 0 1 1\"",
            "      <svg foreignObject>",
        ])
    );
}

#[test]
fn test_cdata_in_svg_is_text() {
    let output = parse_document("<svg><![CDATA[x<y]]></svg>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<html>", "  <head>", "  <body>", "    <svg svg>", "      \"x<y\""])
    );
}

#[test]
fn test_html_breaks_out_of_foreign_content() {
    let output = parse_document("<svg><p>x");
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "  <body>",
            "    <svg svg>",
            "    <p>",
            "      \"x\"",
        ])
    );
}

#[test]
fn test_noscript_with_scripting_is_raw_text() {
    let options = ParserOptions::new().with_scripting(true);
    let output = parse_document_with("<noscript><p>x</p></noscript>", &options);
    assert_eq!(
        dump_tree(&output.tree),
        document(&[
            "<html>",
            "  <head>",
            "    <noscript>",
            "      \"<p>x</p>\"",
            "  <body>",
        ])
    );
}

#[test]
fn test_frameset_document() {
    let output = parse_document("<frameset><frame></frameset>");
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<html>", "  <head>", "  <frameset>", "    <frame>"])
    );
}

#[test]
fn test_comment_after_html_goes_to_document() {
    let output = parse_document("<!DOCTYPE html><html></html><!--x-->");
    assert_eq!(
        dump_tree(&output.tree),
        document(&["<!DOCTYPE html>", "<html>", "  <head>", "  <body>", "<!-- x -->"])
    );
}

#[test]
fn test_repeated_html_tag_merges_attributes() {
    let output = parse_document(r#"<html a="1"><body><html a="2" b="3">"#);
    let tree = &output.tree;
    let html = tree.document_element().expect("html");
    let element = tree.as_element(html).expect("element");
    assert_eq!(element.get_attribute("a"), Some("1"));
    assert_eq!(element.get_attribute("b"), Some("3"));
}

#[test]
fn test_self_closing_non_void_element_is_reported() {
    let output = parse_document("<!DOCTYPE html><div/><br/>");
    assert_eq!(
        kinds(&output),
        vec![
            ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus,
            ParseErrorKind::EofWithOpenElements,
        ]
    );
}

#[test]
fn test_stray_end_tag_is_ignored() {
    let output = parse_document("<!DOCTYPE html><div></span></div>");
    assert_eq!(kinds(&output), vec![ParseErrorKind::UnexpectedEndTag]);
}

#[test]
fn test_parser_refuses_tokens_after_end() {
    let mut parser = HTMLParser::new();
    let eof = PositionedToken {
        token: Token::EndOfFile,
        position: sapling_common::Position::START,
    };
    assert_eq!(parser.process_token(eof.clone()), Ok(()));
    assert!(parser.is_stopped());
    assert_eq!(parser.process_token(eof), Err(SessionError::AlreadyFinished));
}
