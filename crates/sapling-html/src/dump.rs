//! Text renderings of parser output for tests and debugging.
//!
//! [`dump_tree`] prints a document in the indented format used by the
//! html5lib tree-construction fixtures. [`tokens_to_json`] renders a token
//! stream in the html5lib tokenizer fixture format.

use std::fmt::Write as _;

use sapling_dom::{DomTree, Namespace, NodeData, NodeId};
use serde_json::{Map, Value, json};

use crate::parser::foreign_content::foreign_attribute_parts;
use crate::tokenizer::Token;

/// Render the children of the Document node, one node per line.
///
/// Each line starts with `| ` followed by two spaces per level of depth.
/// Attributes follow their element one level deeper, sorted by name.
/// Template contents appear under a `content` line.
///
/// # Example
/// ```
/// use sapling_html::{dump::dump_tree, parse_document};
///
/// let output = parse_document("<!DOCTYPE html><p class=x>Hi");
/// assert_eq!(
///     dump_tree(&output.tree),
///     "| <!DOCTYPE html>\n\
///      | <html>\n\
///      |   <head>\n\
///      |   <body>\n\
///      |     <p>\n\
///      |       class=\"x\"\n\
///      |       \"Hi\"\n"
/// );
/// ```
#[must_use]
pub fn dump_tree(tree: &DomTree) -> String {
    let mut out = String::new();

    // Iterative walk; entries are pushed in reverse to pop in document order.
    let mut stack: Vec<(NodeId, usize)> = tree
        .children(tree.root())
        .iter()
        .rev()
        .map(|&child| (child, 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        dump_node(tree, id, depth, &mut out);

        stack.extend(tree.children(id).iter().rev().map(|&child| (child, depth + 1)));

        // Template contents print before the template's own children.
        if let Some(contents) = tree.template_contents(id) {
            stack.extend(tree.children(contents).iter().rev().map(|&child| (child, depth + 2)));
        }
    }
    out
}

fn push_line(out: &mut String, depth: usize, content: &str) {
    let _ = writeln!(out, "| {}{content}", "  ".repeat(depth));
}

/// Print the lines for `id` itself: its own line, attributes and the
/// `content` marker of a template. Children are left to the caller.
fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document(_) | NodeData::DocumentFragment => {}
        NodeData::Doctype(doctype) => {
            if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                push_line(out, depth, &format!("<!DOCTYPE {}>", doctype.name));
            } else {
                push_line(
                    out,
                    depth,
                    &format!(
                        "<!DOCTYPE {} \"{}\" \"{}\">",
                        doctype.name, doctype.public_id, doctype.system_id
                    ),
                );
            }
        }
        NodeData::Text(text) => push_line(out, depth, &format!("\"{text}\"")),
        NodeData::Comment(data) => push_line(out, depth, &format!("<!-- {data} -->")),
        NodeData::Element(element) => {
            let name = match element.namespace {
                Namespace::Html => element.tag_name.clone(),
                Namespace::Svg => format!("svg {}", element.tag_name),
                Namespace::MathMl => format!("math {}", element.tag_name),
            };
            push_line(out, depth, &format!("<{name}>"));

            let mut attributes: Vec<(String, &str)> = element
                .attrs()
                .iter()
                .map(|(name, value)| (display_attribute_name(element.namespace, name), value.as_str()))
                .collect();
            attributes.sort_unstable();
            for (name, value) in attributes {
                push_line(out, depth + 1, &format!("{name}=\"{value}\""));
            }

            if element.template_contents.is_some() {
                push_line(out, depth + 1, "content");
            }
        }
    }
}

/// Foreign attributes print as `prefix local`, e.g. `xlink href`.
fn display_attribute_name(namespace: Namespace, name: &str) -> String {
    if namespace == Namespace::Html {
        return name.to_string();
    }
    foreign_attribute_parts(name)
        .map_or_else(|| name.to_string(), |(prefix, local)| format!("{prefix} {local}"))
}

/// Render tokens in the html5lib tokenizer fixture format.
///
/// Adjacent character tokens are joined into one `["Character", data]`
/// entry and the end-of-file token is omitted.
#[must_use]
pub fn tokens_to_json(tokens: &[Token]) -> Value {
    let mut output = Vec::new();
    let mut pending_text = String::new();

    for token in tokens {
        if let Token::Character { data } = token {
            pending_text.push(*data);
            continue;
        }
        if !pending_text.is_empty() {
            output.push(json!(["Character", std::mem::take(&mut pending_text)]));
        }

        match token {
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => output.push(json!([
                "DOCTYPE",
                name,
                public_identifier,
                system_identifier,
                !force_quirks
            ])),
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                let attrs: Map<String, Value> = attributes
                    .iter()
                    .map(|a| (a.name.clone(), Value::String(a.value.clone())))
                    .collect();
                if *self_closing {
                    output.push(json!(["StartTag", name, attrs, true]));
                } else {
                    output.push(json!(["StartTag", name, attrs]));
                }
            }
            Token::EndTag { name, .. } => output.push(json!(["EndTag", name])),
            Token::Comment { data } => output.push(json!(["Comment", data])),
            Token::Character { .. } | Token::EndOfFile => {}
        }
    }

    if !pending_text.is_empty() {
        output.push(json!(["Character", pending_text]));
    }
    Value::Array(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Attribute;

    #[test]
    fn characters_are_coalesced() {
        let tokens = vec![
            Token::Character { data: 'a' },
            Token::Character { data: 'b' },
            Token::Comment {
                data: "c".to_string(),
            },
            Token::Character { data: 'd' },
            Token::EndOfFile,
        ];
        assert_eq!(
            tokens_to_json(&tokens),
            json!([["Character", "ab"], ["Comment", "c"], ["Character", "d"]])
        );
    }

    #[test]
    fn self_closing_start_tag_has_trailing_flag() {
        let tokens = vec![Token::StartTag {
            name: "br".to_string(),
            self_closing: true,
            attributes: vec![Attribute::new("id".to_string(), "x".to_string())],
        }];
        assert_eq!(tokens_to_json(&tokens), json!([["StartTag", "br", {"id": "x"}, true]]));
    }

    #[test]
    fn missing_doctype_fields_are_null() {
        let tokens = vec![Token::Doctype {
            name: Some("html".to_string()),
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }];
        assert_eq!(tokens_to_json(&tokens), json!([["DOCTYPE", "html", null, null, true]]));
    }
}
