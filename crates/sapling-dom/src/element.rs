//! Element data: namespaces, attributes and the class list.

use std::collections::HashMap;

use crate::NodeId;

/// Map of attribute names to values for an element.
///
/// Attributes adjusted for foreign content keep their qualified name
/// (for example `xlink:href`).
pub type AttributesMap = HashMap<String, String>;

/// [§ 2.1.8 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// The namespaces an element produced by the HTML parser can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    /// "The HTML namespace is `http://www.w3.org/1999/xhtml`."
    #[default]
    Html,
    /// "The SVG namespace is `http://www.w3.org/2000/svg`."
    Svg,
    /// "The MathML namespace is `http://www.w3.org/1998/Math/MathML`."
    MathMl,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

/// [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes)
///
/// "The class attribute, if specified, must have a value that is a set of
/// space-separated tokens representing the various classes that the element
/// belongs to."
///
/// The list is derived from the `class` attribute and rebuilt every time
/// that attribute changes through [`ElementData::set_attribute`] or
/// [`ElementData::remove_attribute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementClass {
    names: Vec<String>,
}

impl ElementClass {
    /// [§ 2.3.8 Ordered sets](https://infra.spec.whatwg.org/#ordered-set-parser)
    ///
    /// "split on ASCII whitespace", dropping duplicates while keeping the
    /// first occurrence.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in value.split(|c: char| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')) {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Self { names }
    }

    /// Whether the element has class `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of distinct class names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the element has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the class names in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name,
/// custom element state, custom element definition, is value."
///
/// The parser only needs the namespace and local name; prefixes are never
/// produced by HTML parsing.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element's namespace"
    pub namespace: Namespace,
    /// "An element has an associated attribute list"
    attrs: AttributesMap,
    /// Tokenized view of the `class` attribute.
    class_list: ElementClass,
    /// [§ 4.12.3 The template element](https://html.spec.whatwg.org/multipage/scripting.html#template-contents)
    ///
    /// "Each template element has an associated DocumentFragment object that
    /// is its template contents."
    pub template_contents: Option<NodeId>,
}

impl ElementData {
    /// Create element data, deriving the class list from `attrs`.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, namespace: Namespace, attrs: AttributesMap) -> Self {
        let class_list = attrs
            .get("class")
            .map_or_else(ElementClass::default, |value| ElementClass::parse(value));
        Self {
            tag_name: tag_name.into(),
            namespace,
            attrs,
            class_list,
            template_contents: None,
        }
    }

    /// Create an HTML element with no attributes.
    #[must_use]
    pub fn html(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Namespace::Html, AttributesMap::new())
    }

    /// Whether this is an HTML element with the given local name.
    #[must_use]
    pub fn is_html(&self, tag_name: &str) -> bool {
        self.namespace == Namespace::Html && self.tag_name == tag_name
    }

    /// All attributes.
    #[must_use]
    pub const fn attrs(&self) -> &AttributesMap {
        &self.attrs
    }

    /// Value of attribute `name`, if present.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether attribute `name` is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Set (or replace) an attribute, keeping the class list in sync.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.class_list = ElementClass::parse(value);
        }
        let _ = self.attrs.insert(name.to_string(), value.to_string());
    }

    /// Remove an attribute, keeping the class list in sync.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        if name == "class" {
            self.class_list = ElementClass::default();
        }
        self.attrs.remove(name)
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// The element's class list.
    #[must_use]
    pub const fn classes(&self) -> &ElementClass {
        &self.class_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_list_splits_on_ascii_whitespace() {
        let classes = ElementClass::parse("  one\ttwo\none  three ");
        assert_eq!(classes.iter().collect::<Vec<_>>(), ["one", "two", "three"]);
        assert_eq!(classes.len(), 3);
    }

    #[test]
    fn class_list_follows_attribute_changes() {
        let mut attrs = AttributesMap::new();
        let _ = attrs.insert("class".to_string(), "a b".to_string());
        let mut element = ElementData::new("div", Namespace::Html, attrs);
        assert!(element.classes().contains("a"));

        element.set_attribute("class", "c");
        assert!(!element.classes().contains("a"));
        assert!(element.classes().contains("c"));

        let _ = element.remove_attribute("class");
        assert!(element.classes().is_empty());
    }

    #[test]
    fn unrelated_attributes_leave_classes_alone() {
        let mut element = ElementData::html("p");
        element.set_attribute("class", "x");
        element.set_attribute("id", "main");
        assert_eq!(element.id(), Some("main"));
        assert!(element.classes().contains("x"));
    }
}
