//! Named character reference table lookups.

use pretty_assertions::assert_eq;
use sapling_html::tokenizer::named_character_references::{
    any_entity_has_prefix, longest_match, lookup_entity,
};

#[test]
fn test_semicolon_forms() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{A0}"));
    assert_eq!(lookup_entity("hearts;"), Some("\u{2665}"));
}

#[test]
fn test_legacy_names_resolve_without_semicolon() {
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("copy"), Some("\u{A9}"));
    // Only the legacy set has a semicolon-less entry.
    assert_eq!(lookup_entity("hearts"), None);
}

#[test]
fn test_unknown_names() {
    assert_eq!(lookup_entity("bogus;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_queries_stop_at_dead_ends() {
    assert!(any_entity_has_prefix("a"));
    assert!(any_entity_has_prefix("amp;"));
    assert!(!any_entity_has_prefix("ampx"));
}

#[test]
fn test_longest_match_consumes_as_much_as_possible() {
    assert_eq!(longest_match("amp;rest"), Some(("amp;", "&")));
    assert_eq!(longest_match("ampfoo"), Some(("amp", "&")));
    assert_eq!(longest_match("nope"), None);
}
