//! Pulls the structured scholarship payload out of free-form generated text.
//!
//! Two stages: a ```` ```json ```` fenced block if one exists, otherwise
//! everything from the first `{` to the end of the text.

use serde_json::Value;
use tracing::warn;

use crate::models::scholarship::{ScholarshipRecommendation, ScholarshipSet};
use crate::recommendation::engine::DegradeReason;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Locates the structured-data payload inside `text`.
/// Returns `None` when there is neither a `json` fence nor an opening brace.
pub fn extract_structured_block(text: &str) -> Option<&str> {
    fenced_json_block(text).or_else(|| text.find('{').map(|start| text[start..].trim()))
}

/// Contents of the first fence tagged `json` (ASCII case-insensitive) that is closed.
fn fenced_json_block(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    let mut search_from = 0;

    while let Some(offset) = lower[search_from..].find(FENCE) {
        let fence_start = search_from + offset;
        let after_fence = fence_start + FENCE.len();

        if lower[after_fence..].starts_with(JSON_TAG) {
            let body_start = after_fence + JSON_TAG.len();
            let body_end = text[body_start..].find(FENCE)? + body_start;
            return Some(text[body_start..body_end].trim());
        }

        search_from = after_fence;
    }

    None
}

/// Parses a payload into a `ScholarshipSet`.
///
/// Only the `overlapping` collection gates acceptance: it must exist and be a
/// non-empty array. `primary` defaults to empty when absent. Entries that are
/// not candidate objects are dropped from either list after the gate.
/// `primary` is stably re-sorted by ascending `number`, unnumbered entries last.
pub fn parse_scholarship_set(payload: &str) -> Result<ScholarshipSet, DegradeReason> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| DegradeReason::InvalidPayload(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| DegradeReason::InvalidPayload("top-level value is not an object".into()))?;

    let overlapping = match object.get("overlapping") {
        None => return Err(DegradeReason::MissingOverlapping),
        Some(Value::Array(items)) if items.is_empty() => {
            return Err(DegradeReason::EmptyOverlapping)
        }
        Some(Value::Array(items)) => candidates_from(items, "overlapping"),
        Some(_) => return Err(DegradeReason::OverlappingNotArray),
    };

    let mut primary = match object.get("primary").or_else(|| object.get("scholarships")) {
        Some(Value::Array(items)) => candidates_from(items, "primary"),
        Some(_) => {
            warn!("Generated 'primary' collection is not an array; treating it as empty");
            Vec::new()
        }
        None => Vec::new(),
    };
    primary.sort_by_key(|c| c.number.unwrap_or(u32::MAX));

    Ok(ScholarshipSet {
        primary,
        overlapping,
    })
}

/// Runs both stages: extraction, then parsing.
pub fn parse_generated_text(text: &str) -> Result<ScholarshipSet, DegradeReason> {
    let payload = extract_structured_block(text).ok_or(DegradeReason::NoStructuredBlock)?;
    parse_scholarship_set(payload)
}

fn candidates_from(items: &[Value], collection: &str) -> Vec<ScholarshipRecommendation> {
    items
        .iter()
        .filter_map(|item| {
            serde_json::from_value::<ScholarshipRecommendation>(item.clone())
                .map_err(|e| warn!("Dropping malformed {collection} candidate: {e}"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"Here you go!
```json
{
  "primary": [
    {"number": 2, "title": "B", "apply_link": "https://b.org"},
    {"number": 1, "title": "A", "apply_link": "https://a.org"}
  ],
  "overlapping": [
    {"number": 1, "title": "A", "apply_link": "https://a.org"}
  ]
}
```
Good luck!"#;

    #[test]
    fn test_fenced_block_is_preferred() {
        let block = extract_structured_block(WELL_FORMED).unwrap();
        assert!(block.starts_with('{'));
        assert!(block.ends_with('}'));
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        let text = "```JSON\n{\"overlapping\": []}\n```";
        assert_eq!(extract_structured_block(text), Some("{\"overlapping\": []}"));
    }

    #[test]
    fn test_untagged_fence_is_skipped_for_tagged_one() {
        let text = "```\nnot this\n```\nthen\n```json\n{\"x\": 1}\n```";
        assert_eq!(extract_structured_block(text), Some("{\"x\": 1}"));
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_brace() {
        let text = "```json\n{\"x\": 1}";
        assert_eq!(extract_structured_block(text), Some("{\"x\": 1}"));
    }

    #[test]
    fn test_brace_fallback_takes_remainder() {
        let text = "Sure: {\"a\": 1} thanks";
        assert_eq!(extract_structured_block(text), Some("{\"a\": 1} thanks"));
    }

    #[test]
    fn test_plain_prose_has_no_block() {
        assert_eq!(extract_structured_block("I could not find any scholarships."), None);
        assert_eq!(
            parse_generated_text("I could not find any scholarships."),
            Err(DegradeReason::NoStructuredBlock)
        );
    }

    #[test]
    fn test_well_formed_parses_and_sorts_primary() {
        let set = parse_generated_text(WELL_FORMED).unwrap();
        let titles: Vec<_> = set.primary.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(set.overlapping.len(), 1);
    }

    #[test]
    fn test_unnumbered_primary_entries_sort_last() {
        let payload = r#"{"primary": [{"title": "X"}, {"number": 3, "title": "C"}],
                          "overlapping": [{"title": "C"}]}"#;
        let set = parse_scholarship_set(payload).unwrap();
        assert_eq!(set.primary[0].title, "C");
        assert_eq!(set.primary[1].title, "X");
    }

    #[test]
    fn test_trailing_prose_after_brace_is_invalid() {
        assert!(matches!(
            parse_generated_text("Sure: {\"overlapping\": [{\"title\": \"A\"}]} thanks"),
            Err(DegradeReason::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_missing_overlapping() {
        assert_eq!(
            parse_scholarship_set(r#"{"primary": [{"title": "A"}]}"#),
            Err(DegradeReason::MissingOverlapping)
        );
    }

    #[test]
    fn test_non_array_overlapping() {
        assert_eq!(
            parse_scholarship_set(r#"{"overlapping": {"title": "A"}}"#),
            Err(DegradeReason::OverlappingNotArray)
        );
    }

    #[test]
    fn test_empty_overlapping() {
        assert_eq!(
            parse_scholarship_set(r#"{"primary": [], "overlapping": []}"#),
            Err(DegradeReason::EmptyOverlapping)
        );
    }

    #[test]
    fn test_non_empty_overlapping_is_accepted_even_if_entries_are_sparse() {
        let set = parse_scholarship_set(
            r#"{"primary": [], "overlapping": [{"name": "Gates Scholarship", "apply_link": "https://gates.org"}]}"#,
        )
        .unwrap();
        assert_eq!(set.overlapping.len(), 1);
        assert_eq!(set.overlapping[0].title, "Gates Scholarship");
        assert_eq!(set.overlapping[0].apply_link, "https://gates.org");
    }

    #[test]
    fn test_non_object_entries_are_dropped_without_fallback() {
        let set = parse_scholarship_set(r#"{"overlapping": [{"number": 1}, 42]}"#).unwrap();
        assert_eq!(set.overlapping.len(), 1);
        assert_eq!(set.overlapping[0].number, Some(1));

        let set = parse_scholarship_set(r#"{"overlapping": [42, "x"]}"#).unwrap();
        assert!(set.overlapping.is_empty());
    }

    #[test]
    fn test_top_level_array_is_invalid() {
        assert!(matches!(
            parse_scholarship_set("[1, 2]"),
            Err(DegradeReason::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_truncated_json_is_invalid() {
        assert!(matches!(
            parse_generated_text("```json\n{\"overlapping\": [\n```"),
            Err(DegradeReason::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_missing_primary_is_empty_and_legacy_key_is_accepted() {
        let set = parse_scholarship_set(r#"{"overlapping": [{"title": "A"}]}"#).unwrap();
        assert!(set.primary.is_empty());

        let legacy = parse_scholarship_set(
            r#"{"scholarships": [{"title": "L"}], "overlapping": [{"title": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(legacy.primary[0].title, "L");
    }

    #[test]
    fn test_non_array_primary_is_tolerated() {
        let set =
            parse_scholarship_set(r#"{"primary": "none", "overlapping": [{"title": "A"}]}"#)
                .unwrap();
        assert!(set.primary.is_empty());
        assert_eq!(set.overlapping.len(), 1);
    }
}
