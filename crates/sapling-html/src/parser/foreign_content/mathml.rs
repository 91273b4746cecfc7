//! MathML attribute case fixups.

use crate::tokenizer::Attribute;

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "if the token has an attribute named definitionurl, change its name to
/// definitionURL (note the case difference)."
pub fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut().filter(|a| a.name == "definitionurl") {
        "definitionURL".clone_into(&mut attr.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_url_regains_case() {
        let mut attributes = vec![Attribute::new(
            "definitionurl".to_string(),
            "x".to_string(),
        )];
        adjust_mathml_attributes(&mut attributes);
        assert_eq!(attributes[0].name, "definitionURL");
    }
}
