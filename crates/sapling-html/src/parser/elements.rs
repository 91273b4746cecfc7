//! Element category tables used by tree construction.
//!
//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use sapling_dom::{ElementData, Namespace};

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
/// (HTML namespace part of the special category).
const SPECIAL_HTML: &[&str] = &[
    "address",
    "applet",
    "area",
    "article",
    "aside",
    "base",
    "basefont",
    "bgsound",
    "blockquote",
    "body",
    "br",
    "button",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dir",
    "div",
    "dl",
    "dt",
    "embed",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hgroup",
    "hr",
    "html",
    "iframe",
    "img",
    "input",
    "keygen",
    "li",
    "link",
    "listing",
    "main",
    "marquee",
    "menu",
    "meta",
    "nav",
    "noembed",
    "noframes",
    "noscript",
    "object",
    "ol",
    "p",
    "param",
    "plaintext",
    "pre",
    "script",
    "search",
    "section",
    "select",
    "source",
    "style",
    "summary",
    "table",
    "tbody",
    "td",
    "template",
    "textarea",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
    "wbr",
    "xmp",
];

/// MathML elements that act as scope boundaries and belong to the special
/// category.
const MATHML_SCOPE: &[&str] = &["mi", "mo", "mn", "ms", "mtext", "annotation-xml"];

/// SVG elements that act as scope boundaries and belong to the special
/// category.
const SVG_SCOPE: &[&str] = &["foreignObject", "desc", "title"];

/// "The following HTML elements are those that end up in the list of active
/// formatting elements"
pub(super) const FORMATTING: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u",
];

/// Heading elements, treated as one group by the "in body" rules.
pub(super) const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
pub(super) const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
///
/// "generate all implied end tags thoroughly"
pub(super) const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Elements that may legitimately remain open when the body is closed or
/// the input ends without an error being reported by the standard.
pub(super) const ALLOWED_OPEN_AT_BODY_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

/// Start tags in "in body" that close an open `p` and insert a plain block.
pub(super) const BLOCK_START_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

/// End tags in "in body" closed by "generate implied end tags, then pop
/// until the matching element".
pub(super) const BLOCK_END_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "main",
    "menu",
    "nav",
    "ol",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

/// Start tags that "in head" handles even when seen in later modes.
pub(super) const HEAD_CONTENT_START_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Table section elements.
pub(super) const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// Whether an element belongs to the special category.
pub(super) fn is_special(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::Html => SPECIAL_HTML.contains(&element.tag_name.as_str()),
        Namespace::MathMl => MATHML_SCOPE.contains(&element.tag_name.as_str()),
        Namespace::Svg => SVG_SCOPE.contains(&element.tag_name.as_str()),
    }
}

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// The element types that terminate a scope check in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope"
    ListItem,
    /// "has an element in button scope"
    Button,
    /// "has an element in table scope"
    Table,
    /// "has an element in select scope"
    Select,
}

impl Scope {
    /// Whether `element` is one of the element types that bound this scope.
    pub(super) fn is_boundary(self, element: &ElementData) -> bool {
        let name = element.tag_name.as_str();
        match self {
            Self::Default => Self::is_default_boundary(element),
            Self::ListItem => {
                Self::is_default_boundary(element)
                    || (element.namespace == Namespace::Html && matches!(name, "ol" | "ul"))
            }
            Self::Button => Self::is_default_boundary(element) || element.is_html("button"),
            Self::Table => {
                element.namespace == Namespace::Html
                    && matches!(name, "html" | "table" | "template")
            }
            // "all element types except the following: optgroup in the HTML
            //  namespace, option in the HTML namespace"
            Self::Select => !(element.is_html("optgroup") || element.is_html("option")),
        }
    }

    fn is_default_boundary(element: &ElementData) -> bool {
        let name = element.tag_name.as_str();
        match element.namespace {
            Namespace::Html => matches!(
                name,
                "applet"
                    | "caption"
                    | "html"
                    | "table"
                    | "td"
                    | "th"
                    | "marquee"
                    | "object"
                    | "template"
            ),
            Namespace::MathMl => MATHML_SCOPE.contains(&name),
            Namespace::Svg => SVG_SCOPE.contains(&name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, namespace: Namespace) -> ElementData {
        ElementData::new(name, namespace, sapling_dom::AttributesMap::new())
    }

    #[test]
    fn test_special_category_respects_namespace() {
        assert!(is_special(&ElementData::html("div")));
        assert!(!is_special(&ElementData::html("span")));
        assert!(is_special(&element("foreignObject", Namespace::Svg)));
        assert!(!is_special(&element("div", Namespace::Svg)));
        assert!(is_special(&element("mtext", Namespace::MathMl)));
    }

    #[test]
    fn test_scope_boundaries() {
        let table = ElementData::html("table");
        let button = ElementData::html("button");
        let option = ElementData::html("option");

        assert!(Scope::Default.is_boundary(&table));
        assert!(!Scope::Default.is_boundary(&button));
        assert!(Scope::Button.is_boundary(&button));
        assert!(Scope::ListItem.is_boundary(&ElementData::html("ul")));
        assert!(Scope::Table.is_boundary(&table));
        assert!(!Scope::Table.is_boundary(&ElementData::html("td")));
        assert!(!Scope::Select.is_boundary(&option));
        assert!(Scope::Select.is_boundary(&ElementData::html("div")));
    }
}
