//! Placeholder splitter: recovers deferred expressions from rendered text.
//!
//! Scans for single-quoted literals whose content is `{{ <json> }}` — the
//! exact form the renderer's quoting contract guarantees for every
//! placeholder the transformer emits — and rebuilds the alternating
//! literal/expression sequence.

use bootform_types::ConfigNode;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{UserDataError, UserDataResult};
use crate::{UserData, UserDataPart};

/// A placeholder as it appears in rendered text: the renderer's quote
/// character around the transformer's delimiters. `(?s)` because the JSON
/// may contain escaped content spanning what YAML treats as one line.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)'\{\{ (.*?) \}\}'").expect("placeholder pattern compiles"));

/// Length of the leading `'{{ ` and trailing ` }}'` around the JSON.
const DELIM_LEN: usize = 4;

/// Split rendered text into literal segments and decoded deferred
/// expressions.
///
/// With no placeholder present the text collapses to a single literal.
/// Otherwise the result alternates literal/expression and is bounded by
/// literals on both sides (possibly empty), so its length is odd and >= 3.
pub fn split(text: &str) -> UserDataResult<UserData> {
    let mut parts = Vec::new();
    let mut last = 0;
    for found in PLACEHOLDER_RE.find_iter(text) {
        let matched = found.as_str();
        // The emitter doubles every `'` inside a single-quoted scalar; undo
        // that before treating the content as JSON.
        let json = matched[DELIM_LEN..matched.len() - DELIM_LEN].replace("''", "'");
        parts.push(UserDataPart::Literal(text[last..found.start()].to_owned()));
        parts.push(UserDataPart::Expression(decode_expression(&json)?));
        last = found.end();
    }
    if parts.is_empty() {
        return Ok(UserData::Literal(text.to_owned()));
    }
    parts.push(UserDataPart::Literal(text[last..].to_owned()));
    Ok(UserData::Join(parts))
}

fn decode_expression(json: &str) -> UserDataResult<ConfigNode> {
    let node: ConfigNode =
        serde_json::from_str(json).map_err(|source| UserDataError::InvalidPlaceholder {
            snippet: snippet(json),
            source: Some(source),
        })?;
    if node.as_deferred_expression().is_none() {
        return Err(UserDataError::InvalidPlaceholder {
            snippet: snippet(json),
            source: None,
        });
    }
    Ok(node)
}

fn snippet(json: &str) -> String {
    const MAX: usize = 80;
    if json.len() <= MAX {
        json.to_owned()
    } else {
        let cut = (0..=MAX).rev().find(|i| json.is_char_boundary(*i));
        format!("{}...", &json[..cut.unwrap_or(0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_a_single_literal() {
        let text = "#bootform-ami-config\nkey: value\n";
        assert_eq!(split(text).unwrap(), UserData::Literal(text.to_owned()));
    }

    #[test]
    fn quotes_are_discarded_and_literals_bound_the_match() {
        let text = "a: '{{ {\"Ref\":\"Bucket\"} }}'\nb: 2\n";
        let UserData::Join(parts) = split(text).unwrap() else {
            panic!("expected a join");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], UserDataPart::Literal("a: ".to_owned()));
        assert_eq!(
            parts[1],
            UserDataPart::Expression(serde_json::from_str(r#"{"Ref":"Bucket"}"#).unwrap())
        );
        assert_eq!(parts[2], UserDataPart::Literal("\nb: 2\n".to_owned()));
    }

    #[test]
    fn adjacent_placeholders_keep_empty_bounding_literals() {
        let text = "'{{ {\"Ref\":\"A\"} }}''{{ {\"Ref\":\"B\"} }}'";
        let UserData::Join(parts) = split(text).unwrap() else {
            panic!("expected a join");
        };
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], UserDataPart::Literal(String::new()));
        assert_eq!(parts[2], UserDataPart::Literal(String::new()));
        assert_eq!(parts[4], UserDataPart::Literal(String::new()));
    }

    #[test]
    fn doubled_single_quotes_decode_back_to_apostrophes() {
        let text = "a: '{{ {\"Ref\":\"it''s\"} }}'\n";
        let UserData::Join(parts) = split(text).unwrap() else {
            panic!("expected a join");
        };
        assert_eq!(
            parts[1],
            UserDataPart::Expression(serde_json::from_str(r#"{"Ref":"it's"}"#).unwrap())
        );
    }

    #[test]
    fn malformed_json_is_an_internal_invariant_error() {
        let err = split("a: '{{ not json }}'\n").unwrap_err();
        assert!(matches!(
            err,
            UserDataError::InvalidPlaceholder { source: Some(_), .. }
        ));
    }

    #[test]
    fn non_expression_json_is_an_internal_invariant_error() {
        let err = split("a: '{{ {\"plain\":1} }}'\n").unwrap_err();
        assert!(matches!(
            err,
            UserDataError::InvalidPlaceholder { source: None, .. }
        ));
    }

    #[test]
    fn unquoted_braces_are_left_alone() {
        let text = "doc: \"{{ not a placeholder }}\"\n";
        assert_eq!(split(text).unwrap(), UserData::Literal(text.to_owned()));
    }
}
