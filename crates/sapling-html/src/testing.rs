//! Loaders and runners for the html5lib fixture formats.
//!
//! Two formats are understood:
//!
//! - the tokenizer JSON files (`{"tests": [...]}`), deserialised with serde;
//! - the tree-construction `.dat` files, blocks of `#data`, `#errors` and
//!   `#document` sections.
//!
//! Fragment cases (`#document-fragment`) are not supported; they are
//! skipped with a one-time warning.

use sapling_common::warning::warn_once;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::dump::{dump_tree, tokens_to_json};
use crate::error::ParseError;
use crate::session::{ParserOptions, parse_document_with};
use crate::tokenizer::{HTMLTokenizer, TokenizerState};

/// A fixture that cannot be run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    /// The `initialStates` entry names no known tokenizer state.
    #[error("unknown initial tokenizer state `{0}`")]
    UnknownState(String),
}

/// A tokenizer fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerFixture {
    /// The test cases.
    #[serde(default)]
    pub tests: Vec<TokenizerTest>,
}

/// One tokenizer test case.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizerTest {
    /// Human-readable summary.
    pub description: String,
    /// The input to tokenize.
    pub input: String,
    /// Expected tokens in the [`tokens_to_json`] format.
    pub output: Value,
    /// States to start in, e.g. `"RCDATA state"`. Defaults to the data state.
    #[serde(default)]
    pub initial_states: Vec<String>,
    /// Name of the last start tag seen before the input.
    #[serde(default)]
    pub last_start_tag: Option<String>,
    /// Whether `input` and `output` strings carry `\uXXXX` escapes.
    #[serde(default)]
    pub double_escaped: bool,
    /// Expected errors.
    #[serde(default)]
    pub errors: Vec<FixtureErrorEntry>,
}

/// An expected error in a tokenizer fixture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FixtureErrorEntry {
    /// The kebab-case error code.
    pub code: String,
    /// One-based line.
    pub line: usize,
    /// One-based column.
    pub col: usize,
}

/// What the tokenizer produced for one initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerRun {
    /// The state the run started in.
    pub state: TokenizerState,
    /// Tokens, in the fixture format.
    pub output: Value,
    /// Error codes, in order.
    pub errors: Vec<String>,
}

impl TokenizerTest {
    /// The expected output with double escaping undone.
    #[must_use]
    pub fn expected_output(&self) -> Value {
        if self.double_escaped {
            unescape_value(&self.output)
        } else {
            self.output.clone()
        }
    }

    /// The expected error codes, in order.
    #[must_use]
    pub fn expected_error_codes(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.code.clone()).collect()
    }
}

/// Map a fixture state name such as `"Script data state"` to a
/// [`TokenizerState`].
#[must_use]
pub fn state_from_fixture_name(name: &str) -> Option<TokenizerState> {
    match name {
        "Data state" => Some(TokenizerState::Data),
        "PLAINTEXT state" => Some(TokenizerState::PLAINTEXT),
        "RCDATA state" => Some(TokenizerState::RCDATA),
        "RAWTEXT state" => Some(TokenizerState::RAWTEXT),
        "Script data state" => Some(TokenizerState::ScriptData),
        "CDATA section state" => Some(TokenizerState::CDATASection),
        _ => None,
    }
}

/// Tokenize a fixture's input once per initial state.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownState`] if an initial state name is not
/// recognised.
pub fn run_tokenizer_test(test: &TokenizerTest) -> Result<Vec<TokenizerRun>, FixtureError> {
    let input = if test.double_escaped {
        unescape(&test.input)
    } else {
        test.input.clone()
    };

    let states = if test.initial_states.is_empty() {
        vec![TokenizerState::Data]
    } else {
        test.initial_states
            .iter()
            .map(|name| {
                state_from_fixture_name(name).ok_or_else(|| FixtureError::UnknownState(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(states
        .into_iter()
        .map(|state| {
            let mut tokenizer = HTMLTokenizer::new(&input);
            tokenizer.set_state(state);
            tokenizer.set_last_start_tag(test.last_start_tag.as_deref());
            let tokens = tokenizer.run();
            let errors = tokenizer
                .take_errors()
                .into_vec()
                .into_iter()
                .map(|e| e.kind.code().to_string())
                .collect();
            TokenizerRun {
                state,
                output: tokens_to_json(&tokens),
                errors,
            }
        })
        .collect())
}

/// Undo the `\uXXXX` escaping of double-escaped fixtures. Surrogate pairs
/// are combined; a lone surrogate becomes U+FFFD.
#[must_use]
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(index) = rest.find("\\u") {
        out.push_str(&rest[..index]);
        let after = &rest[index + 2..];
        let Some(unit) = after.get(..4).and_then(|hex| u32::from_str_radix(hex, 16).ok()) else {
            out.push_str("\\u");
            rest = after;
            continue;
        };
        rest = &after[4..];

        if (0xD800..0xDC00).contains(&unit)
            && let Some(low) = rest
                .strip_prefix("\\u")
                .and_then(|r| r.get(..4))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .filter(|low| (0xDC00..0xE000).contains(low))
        {
            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
            rest = &rest[6..];
            continue;
        }
        out.push(char::from_u32(unit).unwrap_or('\u{FFFD}'));
    }
    out.push_str(rest);
    out
}

fn unescape_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(unescape(s)),
        Value::Array(items) => Value::Array(items.iter().map(unescape_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (unescape(k), unescape_value(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// One tree-construction test case from a `.dat` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeTest {
    /// The `#data` section.
    pub data: String,
    /// The `#errors` section, one line per error.
    pub errors: Vec<String>,
    /// The `#document-fragment` context element, if this is a fragment case.
    pub fragment_context: Option<String>,
    /// `Some(true)` for `#script-on`, `Some(false)` for `#script-off`.
    pub scripting: Option<bool>,
    /// The `#document` section in [`dump_tree`] format.
    pub document: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Data,
    Errors,
    NewErrors,
    Fragment,
    Document,
    Other,
}

/// Split a `.dat` file into test cases.
#[must_use]
pub fn parse_dat(contents: &str) -> Vec<TreeTest> {
    let mut tests = Vec::new();
    let mut current: Option<TreeTest> = None;
    let mut section = Section::Other;
    let mut data_lines: Vec<&str> = Vec::new();
    let mut document_lines: Vec<&str> = Vec::new();

    let mut finish = |test: Option<TreeTest>, data: &mut Vec<&str>, doc: &mut Vec<&str>| {
        if let Some(mut test) = test {
            test.data = data.join("\n");
            // The blank line separating cases belongs to neither.
            while doc.last().is_some_and(|line| line.is_empty()) {
                let _ = doc.pop();
            }
            test.document = doc.iter().map(|line| format!("{line}\n")).collect();
            tests.push(test);
        }
        data.clear();
        doc.clear();
    };

    for line in contents.lines() {
        let header = match line {
            "#data" => Some(Section::Data),
            "#errors" => Some(Section::Errors),
            "#new-errors" => Some(Section::NewErrors),
            "#document-fragment" => Some(Section::Fragment),
            "#document" => Some(Section::Document),
            "#script-on" | "#script-off" => Some(Section::Other),
            _ => None,
        };

        if let Some(next) = header {
            if next == Section::Data {
                finish(current.take(), &mut data_lines, &mut document_lines);
                current = Some(TreeTest::default());
            }
            if let Some(test) = current.as_mut() {
                match line {
                    "#script-on" => test.scripting = Some(true),
                    "#script-off" => test.scripting = Some(false),
                    _ => {}
                }
            }
            section = next;
            continue;
        }

        let Some(test) = current.as_mut() else {
            continue;
        };
        match section {
            Section::Data => data_lines.push(line),
            Section::Errors => {
                if !line.is_empty() {
                    test.errors.push(line.to_string());
                }
            }
            Section::Fragment => {
                if !line.is_empty() {
                    test.fragment_context = Some(line.to_string());
                }
            }
            Section::Document => document_lines.push(line),
            Section::NewErrors | Section::Other => {}
        }
    }
    finish(current, &mut data_lines, &mut document_lines);

    tests
}

/// What the parser produced for a tree-construction case.
#[derive(Debug)]
pub struct TreeRun {
    /// The document in [`dump_tree`] format.
    pub document: String,
    /// Parse errors, in order.
    pub errors: Vec<ParseError>,
}

/// Parse a tree-construction case's input.
///
/// Returns `None` for fragment cases, which are not supported.
#[must_use]
pub fn run_tree_test(test: &TreeTest) -> Option<TreeRun> {
    if test.fragment_context.is_some() {
        let _ = warn_once("HTML Fixtures", "fragment cases are not supported; skipping");
        return None;
    }

    let options = ParserOptions::new().with_scripting(test.scripting.unwrap_or(false));
    let output = parse_document_with(&test.data, &options);
    Some(TreeRun {
        document: dump_tree(&output.tree),
        errors: output.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_handles_surrogate_pairs() {
        assert_eq!(unescape("a\\u0041b"), "aAb");
        assert_eq!(unescape("\\uD83D\\uDE00"), "\u{1F600}");
        assert_eq!(unescape("\\uDC00"), "\u{FFFD}");
        assert_eq!(unescape("\\u00"), "\\u00");
    }

    #[test]
    fn dat_blocks_split_on_data_headers() {
        let contents = "#data\n<p>One\n#errors\n(1,3): expected-doctype\n#document\n| <html>\n|   <head>\n\n#data\nx\n#errors\n#document-fragment\ndiv\n#document\n| \"x\"\n";
        let tests = parse_dat(contents);
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0].data, "<p>One");
        assert_eq!(tests[0].errors, vec!["(1,3): expected-doctype".to_string()]);
        assert_eq!(tests[0].document, "| <html>\n|   <head>\n");
        assert_eq!(tests[1].fragment_context.as_deref(), Some("div"));
        assert!(run_tree_test(&tests[1]).is_none());
    }

    #[test]
    fn unknown_state_is_reported() {
        let test = TokenizerTest {
            description: "bad".to_string(),
            input: String::new(),
            output: Value::Array(Vec::new()),
            initial_states: vec!["Bogus state".to_string()],
            last_start_tag: None,
            double_escaped: false,
            errors: Vec::new(),
        };
        assert_eq!(
            run_tokenizer_test(&test),
            Err(FixtureError::UnknownState("Bogus state".to_string()))
        );
    }
}
