//! Best-effort recovery of a JSON object from model output.
//!
//! Models often wrap the object in prose or code fences. Every `{` that opens
//! a balanced span is a candidate, tracking string literals and escapes so
//! braces inside strings do not count. Candidates are tried in order and the
//! first one that parses as JSON wins, so brace-delimited prose such as
//! `{date, healthTips}` ahead of the real object is skipped.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no JSON object found in reply")]
    NoObject,

    #[error("reply JSON did not parse: {0}")]
    Unparseable(String),
}

/// Returns the first balanced `{...}` substring of `text` that parses as JSON.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractError> {
    let mut first_error = None;

    for candidate in balanced_spans(text) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    Err(first_error.map_or(ExtractError::NoObject, ExtractError::Unparseable))
}

/// Every balanced `{...}` span, in order of its opening brace.
fn balanced_spans(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(|(start, _)| balanced_end(&text[start..]).map(|len| &text[start..start + len]))
}

/// Length of the balanced object starting at `s[0] == '{'`, or `None` if it never closes.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_bare_object_is_returned_whole() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(extract_json_object(input), Ok(input));
    }

    #[test]
    fn test_object_surrounded_by_prose() {
        let input = r#"Sure! Here are today's tips: {"date":"2024-01-01","n":{"a":1}} Stay healthy!"#;
        assert_eq!(
            extract_json_object(input),
            Ok(r#"{"date":"2024-01-01","n":{"a":1}}"#)
        );
    }

    #[test]
    fn test_object_inside_code_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_object(input), Ok("{\"key\": \"value\"}"));
    }

    #[test]
    fn test_braces_inside_strings_do_not_count() {
        let input = r#"Result: {"note":"use } and { freely","q":"say \"}\""} done"#;
        assert_eq!(
            extract_json_object(input),
            Ok(r#"{"note":"use } and { freely","q":"say \"}\""}"#)
        );
    }

    #[test]
    fn test_no_braces_is_no_object() {
        assert_eq!(
            extract_json_object("I cannot help with that today."),
            Err(ExtractError::NoObject)
        );
        assert_eq!(extract_json_object(""), Err(ExtractError::NoObject));
    }

    #[test]
    fn test_unclosed_object_is_no_object() {
        assert_eq!(
            extract_json_object(r#"Here: {"date": "2024-01-01""#),
            Err(ExtractError::NoObject)
        );
    }

    #[test]
    fn test_unmatched_brace_in_prose_is_skipped() {
        let input = r#"Note: { is a brace. {"a":{"b":2}}"#;
        assert_eq!(extract_json_object(input), Ok(r#"{"a":{"b":2}}"#));
    }

    #[test]
    fn test_balanced_prose_braces_before_object_are_skipped() {
        let input = r#"Format is {date, healthTips}: {"date":"2024-01-01","healthTips":{"x":1}}"#;
        assert_eq!(
            extract_json_object(input),
            Ok(r#"{"date":"2024-01-01","healthTips":{"x":1}}"#)
        );
    }

    #[test]
    fn test_several_prose_placeholders_before_object() {
        let input = r#"Use {date} and {healthTips} like so -> {"date":"d"} ok"#;
        assert_eq!(extract_json_object(input), Ok(r#"{"date":"d"}"#));
    }

    #[test]
    fn test_only_invalid_candidates_is_unparseable() {
        let err = extract_json_object("Here: {date: 2024-01-01}").unwrap_err();
        assert!(matches!(err, ExtractError::Unparseable(_)));
        assert!(err.to_string().contains("did not parse"));
    }

    #[test]
    fn test_first_of_multiple_objects_wins() {
        let input = r#"{"a":1} and also {"b":2}"#;
        assert_eq!(extract_json_object(input), Ok(r#"{"a":1}"#));
    }

    #[test]
    fn test_multibyte_text_around_object() {
        let input = "今日の健康ヒント：{\"note\":\"糖分は控えめに\"}です";
        assert_eq!(
            extract_json_object(input),
            Ok("{\"note\":\"糖分は控えめに\"}")
        );
    }

    fn leaf() -> impl Strategy<Value = String> {
        any::<String>()
    }

    /// Any record embedded in brace-free prose is recovered exactly.
    #[test]
    fn test_record_in_prose_is_recovered_exactly() {
        let mut runner = proptest::test_runner::TestRunner::default();
        let prose = "[^{}]{0,60}";

        runner
            .run(
                &(
                    prose,
                    prose,
                    proptest::collection::vec(leaf(), 9),
                    any::<bool>(),
                ),
                |(prefix, suffix, leaves, pretty)| {
                    let record = json!({
                        "date": leaves[0],
                        "healthTips": {
                            "sugar": {"dailyAmount": leaves[1], "note": leaves[2]},
                            "calorie": {
                                "range": {
                                    "lightActivity": leaves[3],
                                    "moderateActivity": leaves[4],
                                    "heavyActivity": leaves[5]
                                },
                                "tip": leaves[6]
                            },
                            "caffeine": {"safeAmount": leaves[7], "warning": leaves[8]}
                        }
                    });
                    let object = if pretty {
                        serde_json::to_string_pretty(&record).unwrap()
                    } else {
                        serde_json::to_string(&record).unwrap()
                    };
                    let reply = format!("{prefix}{object}{suffix}");

                    prop_assert_eq!(extract_json_object(&reply), Ok(object.as_str()));
                    Ok(())
                },
            )
            .unwrap();
    }
}
