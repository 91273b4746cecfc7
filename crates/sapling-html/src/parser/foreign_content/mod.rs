//! Foreign content (SVG and MathML) support.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use sapling_dom::{ElementData, Namespace};

use super::core::{HTMLParser, is_whitespace};
use crate::error::ParseErrorKind;
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Format: (`attribute_name`, prefix, `local_name`)
///
/// Adjusted attributes are stored under their qualified name, so this table
/// is consulted again when printing a tree.
const FOREIGN_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str, &str)] = &[
    ("xlink:actuate", "xlink", "actuate"),
    ("xlink:arcrole", "xlink", "arcrole"),
    ("xlink:href", "xlink", "href"),
    ("xlink:role", "xlink", "role"),
    ("xlink:show", "xlink", "show"),
    ("xlink:title", "xlink", "title"),
    ("xlink:type", "xlink", "type"),
    ("xml:lang", "xml", "lang"),
    ("xml:space", "xml", "space"),
    ("xmlns", "", "xmlns"),
    ("xmlns:xlink", "xmlns", "xlink"),
];

/// Start tags that break out of foreign content back into HTML.
const BREAKOUT_START_TAGS: &[&str] = &[
    "b",
    "big",
    "blockquote",
    "body",
    "br",
    "center",
    "code",
    "dd",
    "div",
    "dl",
    "dt",
    "em",
    "embed",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "i",
    "img",
    "li",
    "listing",
    "menu",
    "meta",
    "nobr",
    "ol",
    "p",
    "pre",
    "ruby",
    "s",
    "small",
    "span",
    "strong",
    "strike",
    "sub",
    "sup",
    "table",
    "tt",
    "u",
    "ul",
    "var",
];

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Namespaced attributes keep their qualified name (`xlink:href`); the
/// bare `xmlns` attribute keeps its local name.
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut() {
        if let Some(&(_, prefix, local_name)) = FOREIGN_ATTRIBUTE_ADJUSTMENTS
            .iter()
            .find(|&&(from, _, _)| from == attr.name)
        {
            attr.name = if prefix.is_empty() {
                local_name.to_string()
            } else {
                format!("{prefix}:{local_name}")
            };
        }
    }
}

/// The `(prefix, local name)` pair of an adjusted foreign attribute, or
/// `None` when `name` is not namespaced.
#[must_use]
pub fn foreign_attribute_parts(name: &str) -> Option<(&'static str, &'static str)> {
    FOREIGN_ATTRIBUTE_ADJUSTMENTS
        .iter()
        .find(|&&(from, prefix, _)| from == name && !prefix.is_empty())
        .map(|&(_, prefix, local_name)| (prefix, local_name))
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, A MathML mn element,
/// A MathML ms element, A MathML mtext element"
pub(super) fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl
        && matches!(element.tag_name.as_str(), "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
pub(super) fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        // "A MathML annotation-xml element whose start tag token had an
        //  attribute with the name "encoding" whose value was an ASCII
        //  case-insensitive match for the string "text/html" / "application/xhtml+xml""
        Namespace::MathMl => {
            element.tag_name == "annotation-xml"
                && element.get_attribute("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
        }
        // "An SVG foreignObject element, An SVG desc element, An SVG title element"
        Namespace::Svg => matches!(element.tag_name.as_str(), "foreignObject" | "desc" | "title"),
        Namespace::Html => false,
    }
}

impl HTMLParser {
    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Whether the token goes to the current insertion mode rather than to
    /// the rules for parsing tokens in foreign content.
    pub(super) fn should_use_insertion_mode_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        let Some(element) = self.tree.as_element(node) else {
            return true;
        };

        // "If the adjusted current node is an element in the HTML namespace"
        if element.namespace == Namespace::Html {
            return true;
        }

        match token {
            // "If the adjusted current node is a MathML text integration point
            //  and the token is a start tag whose tag name is neither "mglyph"
            //  nor "malignmark""
            Token::StartTag { name, .. }
                if is_mathml_text_integration_point(element)
                    && name != "mglyph"
                    && name != "malignmark" =>
            {
                true
            }
            // "If the adjusted current node is a MathML annotation-xml element
            //  and the token is a start tag whose tag name is "svg""
            Token::StartTag { name, .. }
                if element.namespace == Namespace::MathMl
                    && element.tag_name == "annotation-xml"
                    && name == "svg" =>
            {
                true
            }
            // "If the adjusted current node is an HTML integration point and
            //  the token is a start tag / character token"
            Token::StartTag { .. } | Token::Character { .. }
                if is_html_integration_point(element) =>
            {
                true
            }
            // "If the adjusted current node is a MathML text integration point
            //  and the token is a character token"
            Token::Character { .. } => is_mathml_text_integration_point(element),
            // "If the token is an end-of-file token"
            Token::EndOfFile => true,
            _ => false,
        }
    }

    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(super) fn handle_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedNullCharacter);
                self.insert_character('\u{FFFD}');
            }

            Token::Character { data } if is_whitespace(*data) => {
                self.insert_character(*data);
            }

            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data);
                self.frameset_ok = false;
            }

            Token::Comment { data } => {
                self.insert_comment(data);
            }

            Token::Doctype { .. } => {
                self.parse_error(ParseErrorKind::UnexpectedDoctype);
            }

            // "A start tag whose tag name is one of ... / A start tag whose tag
            //  name is "font", if the token has any attributes named "color",
            //  "face", or "size" / An end tag whose tag name is "br", "p""
            Token::StartTag { name, .. }
                if BREAKOUT_START_TAGS.contains(&name.as_str())
                    || (name == "font"
                        && ["color", "face", "size"]
                            .iter()
                            .any(|attr| token.attribute(attr).is_some())) =>
            {
                self.break_out_of_foreign_content(token);
            }
            Token::EndTag { name, .. } if name == "br" || name == "p" => {
                self.break_out_of_foreign_content(token);
            }

            // "Any other start tag"
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                let namespace = self
                    .adjusted_current_node()
                    .and_then(|id| self.tree.as_element(id))
                    .map_or(Namespace::Html, |element| element.namespace);

                let mut attributes = attributes.clone();
                let tag_name = match namespace {
                    // "If the adjusted current node is an element in the MathML
                    //  namespace, adjust MathML attributes for the token."
                    Namespace::MathMl => {
                        adjust_mathml_attributes(&mut attributes);
                        name.as_str()
                    }
                    // "If the adjusted current node is an element in the SVG
                    //  namespace, and the token's tag name is one of the ones in
                    //  the first column of the following table, change the tag
                    //  name ... adjust SVG attributes for the token."
                    Namespace::Svg => {
                        adjust_svg_attributes(&mut attributes);
                        adjust_svg_tag_name(name)
                    }
                    Namespace::Html => name.as_str(),
                };
                // "Adjust foreign attributes for the token."
                adjust_foreign_attributes(&mut attributes);

                // "Insert a foreign element for the token, with adjusted
                //  current node's namespace and false."
                let _ = self.insert_foreign_element(tag_name, &attributes, namespace);

                // "If the token has its self-closing flag set, then ...
                //  pop the current node off the stack of open elements and
                //  acknowledge the token's self-closing flag."
                if *self_closing {
                    let _ = self.pop_current_node();
                    self.acknowledge_self_closing_flag();
                }
            }

            // "An end tag whose tag name is "script", if the current node is an
            //  SVG script element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name, .. }
                if name == "script"
                    && self.current_element().is_some_and(|element| {
                        element.namespace == Namespace::Svg && element.tag_name == "script"
                    }) =>
            {
                let _ = self.pop_current_node();
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => {
                self.handle_foreign_end_tag(name, token);
            }

            // The dispatcher always routes end-of-file to the insertion mode.
            Token::EndOfFile => {
                self.process_using_rules_for(self.insertion_mode, token);
            }
        }
    }

    /// "Parse error. While the current node is not a MathML text integration
    /// point, an HTML integration point, or an element in the HTML namespace,
    /// pop elements from the stack of open elements. Reprocess the token
    /// according to the rules given in the section corresponding to the
    /// current insertion mode in HTML content."
    fn break_out_of_foreign_content(&mut self, token: &Token) {
        self.parse_error(if matches!(token, Token::EndTag { .. }) {
            ParseErrorKind::UnexpectedEndTag
        } else {
            ParseErrorKind::UnexpectedStartTag
        });

        while let Some(element) = self.current_element() {
            if element.namespace == Namespace::Html
                || is_mathml_text_integration_point(element)
                || is_html_integration_point(element)
            {
                break;
            }
            let _ = self.pop_current_node();
        }

        self.process_using_rules_for(self.insertion_mode, token);
    }

    /// "Any other end tag" in foreign content.
    fn handle_foreign_end_tag(&mut self, name: &str, token: &Token) {
        // STEP 1: "Initialize node to be the current node (the bottommost
        //          node of the stack)."
        let Some(mut index) = self.stack_of_open_elements.len().checked_sub(1) else {
            return;
        };

        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not
        //          the same as the tag name of the token, then this is a parse
        //          error."
        if !self.tag_name_matches_lowercase(self.stack_of_open_elements[index], name) {
            self.parse_error(ParseErrorKind::UnexpectedEndTag);
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of
            //          open elements, then return. (fragment case)"
            if index == 0 {
                return;
            }

            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the
            //          same as the tag name of the token, pop elements from the
            //          stack of open elements until node has been popped from
            //          the stack, and then return."
            let node = self.stack_of_open_elements[index];
            if self.tag_name_matches_lowercase(node, name) {
                self.stack_of_open_elements.truncate(index);
                return;
            }

            // STEP 5: "Set node to the previous entry in the stack of open
            //          elements."
            index -= 1;
            let node = self.stack_of_open_elements[index];

            // STEP 6: "If node is not an element in the HTML namespace, return
            //          to the step labeled loop."
            // STEP 7: "Otherwise, process the token according to the rules
            //          given in the section corresponding to the current
            //          insertion mode in HTML content."
            if self
                .tree
                .as_element(node)
                .is_some_and(|element| element.namespace == Namespace::Html)
            {
                self.process_using_rules_for(self.insertion_mode, token);
                return;
            }
        }
    }

    fn tag_name_matches_lowercase(&self, node: sapling_dom::NodeId, name: &str) -> bool {
        self.tree
            .as_element(node)
            .is_some_and(|element| element.tag_name.to_ascii_lowercase() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_attributes_keep_qualified_names() {
        let mut attributes = vec![
            Attribute::new("xlink:href".to_string(), "#a".to_string()),
            Attribute::new("xmlns".to_string(), "ns".to_string()),
            Attribute::new("href".to_string(), "b".to_string()),
        ];
        adjust_foreign_attributes(&mut attributes);
        assert_eq!(attributes[0].name, "xlink:href");
        assert_eq!(attributes[1].name, "xmlns");
        assert_eq!(attributes[2].name, "href");
    }

    #[test]
    fn test_foreign_attribute_parts() {
        assert_eq!(foreign_attribute_parts("xlink:href"), Some(("xlink", "href")));
        assert_eq!(foreign_attribute_parts("xml:lang"), Some(("xml", "lang")));
        assert_eq!(foreign_attribute_parts("xmlns"), None);
        assert_eq!(foreign_attribute_parts("data-x"), None);
    }

    #[test]
    fn test_integration_points() {
        let mut annotation = ElementData::new(
            "annotation-xml",
            Namespace::MathMl,
            sapling_dom::AttributesMap::new(),
        );
        assert!(!is_html_integration_point(&annotation));
        annotation.set_attribute("encoding", "Text/HTML");
        assert!(is_html_integration_point(&annotation));

        let foreign_object = ElementData::new(
            "foreignObject",
            Namespace::Svg,
            sapling_dom::AttributesMap::new(),
        );
        assert!(is_html_integration_point(&foreign_object));

        let mi = ElementData::new("mi", Namespace::MathMl, sapling_dom::AttributesMap::new());
        assert!(is_mathml_text_integration_point(&mi));
        assert!(!is_mathml_text_integration_point(&ElementData::html("mi")));
    }
}
