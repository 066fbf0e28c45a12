//! Reply aggregation

use crate::models::{ReplyItem, ReplyOutput};

/// Returned when a generator succeeds without producing any text.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "…";

/// Collapse a generator's output into one display string.
///
/// Non-blank texts are trimmed and joined with a blank line, in order.
/// The result is never empty.
pub fn aggregate_reply(output: &ReplyOutput) -> String {
    let items: &[ReplyItem] = match output {
        ReplyOutput::Many(items) => items,
        ReplyOutput::One(item) => std::slice::from_ref(item),
    };

    let joined = items
        .iter()
        .filter_map(|item| item.text.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let joined = joined.trim();
    if joined.is_empty() {
        EMPTY_REPLY_PLACEHOLDER.to_string()
    } else {
        joined.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_sequence() {
        let output = ReplyOutput::Many(vec![
            ReplyItem::text("a"),
            ReplyItem::text(""),
            ReplyItem::text(" b "),
        ]);
        assert_eq!(aggregate_reply(&output), "a\n\nb");
    }

    #[test]
    fn test_aggregate_single_item() {
        let output = ReplyOutput::One(ReplyItem::text("  only one\n"));
        assert_eq!(aggregate_reply(&output), "only one");
    }

    #[test]
    fn test_aggregate_skips_items_without_text() {
        let output = ReplyOutput::Many(vec![
            ReplyItem::default(),
            ReplyItem::text("x"),
            ReplyItem::default(),
        ]);
        assert_eq!(aggregate_reply(&output), "x");
    }

    #[test]
    fn test_aggregate_empty_uses_placeholder() {
        assert_eq!(aggregate_reply(&ReplyOutput::Many(vec![])), "…");
        assert_eq!(aggregate_reply(&ReplyOutput::One(ReplyItem::default())), "…");

        let blank = ReplyOutput::Many(vec![ReplyItem::text(" "), ReplyItem::text("\n\t")]);
        assert_eq!(aggregate_reply(&blank), "…");
    }

    #[test]
    fn test_aggregate_keeps_inner_newlines() {
        let output = ReplyOutput::Many(vec![
            ReplyItem::text("line 1\nline 2"),
            ReplyItem::text("next"),
        ]);
        assert_eq!(aggregate_reply(&output), "line 1\nline 2\n\nnext");
    }
}
