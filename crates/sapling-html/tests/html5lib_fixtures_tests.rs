//! Runs small html5lib-format fixtures through the fixture runners.

use pretty_assertions::assert_eq;
use sapling_html::testing::{
    TokenizerFixture, parse_dat, run_tokenizer_test, run_tree_test, state_from_fixture_name,
};
use sapling_html::{ParseErrorKind, TokenizerState};

const TOKENIZER_FIXTURE: &str = r#"{"tests": [
    {"description": "Start tag with attributes",
     "input": "<h a='b' c=d>",
     "output": [["StartTag", "h", {"a": "b", "c": "d"}]]},
    {"description": "Duplicate attribute",
     "input": "<h a=1 a=2>",
     "output": [["StartTag", "h", {"a": "1"}]],
     "errors": [{"code": "duplicate-attribute", "line": 1, "col": 10}]},
    {"description": "Comment then text",
     "input": "<!--x-->y",
     "output": [["Comment", "x"], ["Character", "y"]]},
    {"description": "Raw text end tag",
     "initialStates": ["RAWTEXT state", "RCDATA state"],
     "lastStartTag": "xmp",
     "input": "a<b></xmp>",
     "output": [["Character", "a<b>"], ["EndTag", "xmp"]]},
    {"description": "Escaped input",
     "doubleEscaped": true,
     "input": "\\u00e9",
     "output": [["Character", "\\u00e9"]]}
]}"#;

const TREE_FIXTURE: &str = "#data
<p>One<p>Two
#errors
(1,3): expected-doctype-but-got-start-tag
(1,13): expected-closing-tag-but-got-eof
#document
| <html>
|   <head>
|   <body>
|     <p>
|       \"One\"
|     <p>
|       \"Two\"

#data
<!DOCTYPE html><table><td>x
#errors
(1,26): unexpected-cell-in-table-body
(1,28): expected-closing-tag-but-got-eof
#document
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"x\"

#data
<b>x
#errors
#document-fragment
div
#document
| <b>
|   \"x\"
";

#[test]
fn test_tokenizer_fixture_cases() {
    let fixture: TokenizerFixture =
        serde_json::from_str(TOKENIZER_FIXTURE).expect("fixture is valid JSON");
    assert_eq!(fixture.tests.len(), 5);

    for test in &fixture.tests {
        let runs = run_tokenizer_test(test).expect("known initial states");
        assert!(!runs.is_empty(), "{}", test.description);
        for run in runs {
            assert_eq!(run.output, test.expected_output(), "{}", test.description);
            assert_eq!(
                run.errors,
                test.expected_error_codes(),
                "{} in {}",
                test.description,
                run.state
            );
        }
    }
}

#[test]
fn test_tokenizer_fixture_runs_each_initial_state() {
    let fixture: TokenizerFixture =
        serde_json::from_str(TOKENIZER_FIXTURE).expect("fixture is valid JSON");
    let runs = run_tokenizer_test(&fixture.tests[3]).expect("known initial states");
    let states: Vec<_> = runs.iter().map(|run| run.state).collect();
    assert_eq!(states, vec![TokenizerState::RAWTEXT, TokenizerState::RCDATA]);
}

#[test]
fn test_fixture_state_names() {
    assert_eq!(
        state_from_fixture_name("Script data state"),
        Some(TokenizerState::ScriptData)
    );
    assert_eq!(state_from_fixture_name("Bogus state"), None);
}

#[test]
fn test_tree_fixture_documents_match() {
    let tests = parse_dat(TREE_FIXTURE);
    assert_eq!(tests.len(), 3);

    for test in &tests[..2] {
        let run = run_tree_test(test).expect("document case");
        assert_eq!(run.document, test.document, "{}", test.data);
        assert_eq!(run.errors.len(), test.errors.len(), "{}", test.data);
    }
}

#[test]
fn test_tree_fixture_error_kinds() {
    let tests = parse_dat(TREE_FIXTURE);
    let run = run_tree_test(&tests[1]).expect("document case");
    let kinds: Vec<_> = run.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ParseErrorKind::UnexpectedStartTag,
            ParseErrorKind::EofWithOpenElements,
        ]
    );
}

#[test]
fn test_fragment_cases_are_skipped() {
    let tests = parse_dat(TREE_FIXTURE);
    assert_eq!(tests[2].fragment_context.as_deref(), Some("div"));
    assert!(run_tree_test(&tests[2]).is_none());
}
