//! Document mode selection from the DOCTYPE token.
//!
//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)

use sapling_dom::QuirksMode;

/// Public identifiers that put the document in quirks mode when matched
/// exactly (ASCII case-insensitive).
const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// "The public identifier starts with" one of these.
const QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// Prefixes that force quirks mode when the system identifier is missing,
/// and limited-quirks mode when it is present.
const HTML4_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// Prefixes that always select limited-quirks mode.
const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

const QUIRKS_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// The fields of a DOCTYPE token that decide the document mode.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct DoctypeFields<'a> {
    pub(super) name: Option<&'a str>,
    pub(super) public_id: Option<&'a str>,
    pub(super) system_id: Option<&'a str>,
    pub(super) force_quirks: bool,
}

impl DoctypeFields<'_> {
    /// "If the DOCTYPE token's name is not "html", or the token's public
    /// identifier is not missing, or the token's system identifier is neither
    /// missing nor "about:legacy-compat", then there is a parse error."
    pub(super) fn is_conforming(&self) -> bool {
        self.name == Some("html")
            && self.public_id.is_none()
            && self.system_id.is_none_or(|id| id == "about:legacy-compat")
    }

    /// The document mode selected by this DOCTYPE for a document that is
    /// not an `iframe srcdoc` document.
    pub(super) fn quirks_mode(&self) -> QuirksMode {
        if self.force_quirks || self.name != Some("html") {
            return QuirksMode::Quirks;
        }

        let public_id = self.public_id.map(str::to_ascii_lowercase);
        let system_id = self.system_id.map(str::to_ascii_lowercase);
        let public = public_id.as_deref();
        let has_prefix =
            |prefixes: &[&str]| public.is_some_and(|id| prefixes.iter().any(|p| id.starts_with(p)));

        if public.is_some_and(|id| QUIRKS_PUBLIC_IDS.contains(&id))
            || system_id.as_deref() == Some(QUIRKS_SYSTEM_ID)
            || has_prefix(QUIRKS_PUBLIC_ID_PREFIXES)
            || (system_id.is_none() && has_prefix(HTML4_PUBLIC_ID_PREFIXES))
        {
            return QuirksMode::Quirks;
        }

        if has_prefix(LIMITED_QUIRKS_PUBLIC_ID_PREFIXES)
            || (system_id.is_some() && has_prefix(HTML4_PUBLIC_ID_PREFIXES))
        {
            return QuirksMode::LimitedQuirks;
        }

        QuirksMode::NoQuirks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype<'a>(
        name: Option<&'a str>,
        public_id: Option<&'a str>,
        system_id: Option<&'a str>,
    ) -> DoctypeFields<'a> {
        DoctypeFields {
            name,
            public_id,
            system_id,
            force_quirks: false,
        }
    }

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        let fields = doctype(Some("html"), None, None);
        assert!(fields.is_conforming());
        assert_eq!(fields.quirks_mode(), QuirksMode::NoQuirks);
    }

    #[test]
    fn test_force_quirks_and_wrong_name() {
        let mut fields = doctype(Some("html"), None, None);
        fields.force_quirks = true;
        assert_eq!(fields.quirks_mode(), QuirksMode::Quirks);
        assert_eq!(
            doctype(Some("svg"), None, None).quirks_mode(),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_public_id_prefix_is_case_insensitive() {
        let fields = doctype(Some("html"), Some("-//W3C//DTD HTML 3.2 Final//EN"), None);
        assert!(!fields.is_conforming());
        assert_eq!(fields.quirks_mode(), QuirksMode::Quirks);
    }

    #[test]
    fn test_html4_transitional_depends_on_system_id() {
        let public = Some("-//W3C//DTD HTML 4.01 Transitional//EN");
        assert_eq!(
            doctype(Some("html"), public, None).quirks_mode(),
            QuirksMode::Quirks
        );
        assert_eq!(
            doctype(
                Some("html"),
                public,
                Some("http://www.w3.org/TR/html4/loose.dtd")
            )
            .quirks_mode(),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_legacy_compat_is_conforming() {
        let fields = doctype(Some("html"), None, Some("about:legacy-compat"));
        assert!(fields.is_conforming());
        assert_eq!(fields.quirks_mode(), QuirksMode::NoQuirks);
    }
}
