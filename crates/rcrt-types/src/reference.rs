//! Inline reference markers in article text.
//!
//! An article body may point at another entry with `[label]#<id>`, e.g.
//! `see [my notes]#aB3xY9 for details`. The label is the shortest run that
//! reaches a `]#` followed by six word characters, so it may itself contain
//! `]` but never a line break. Only ids made of ASCII alphanumerics can ever
//! resolve, but anything matching the marker shape is reported so that
//! dangling references surface instead of silently vanishing.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// `[label]#<id>`, where `.` excludes the same line terminators a browser's
/// `.` does and `\w` is ASCII only.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\n\r\x{2028}\x{2029}]*?)\]#([A-Za-z0-9_]{6})")
        .expect("MARKER is a valid regex literal")
});

/// A `[label]#<id>` marker found in text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineRef {
    pub label: String,
    pub id: String,
    /// Byte range of the whole marker in the scanned text.
    pub span: Range<usize>,
}

/// Find every inline reference in `text`, in order of appearance.
pub fn references(text: &str) -> Vec<InlineRef> {
    MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(InlineRef {
                label: caps.get(1)?.as_str().to_string(),
                id: caps.get(2)?.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_reference() {
        let refs = references("see [this link]#aB3xY9 please");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label, "this link");
        assert_eq!(refs[0].id, "aB3xY9");
        assert_eq!(&"see [this link]#aB3xY9 please"[refs[0].span.clone()], "[this link]#aB3xY9");
    }

    #[test]
    fn finds_multiple_references() {
        let refs = references("[a]#aaaaaa and [b]#bbbbbb");
        let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["aaaaaa", "bbbbbb"]);
    }

    #[test]
    fn ignores_brackets_without_marker() {
        assert!(references("an [aside] with no id").is_empty());
        assert!(references("[short]#abc").is_empty());
        assert!(references("[dash]#ab-cde").is_empty());
        assert!(references("unterminated [label#abcdef").is_empty());
    }

    #[test]
    fn label_runs_to_the_nearest_marker_tail() {
        let refs = references("[x] then [y]#abcdef");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label, "x] then [y");
        assert_eq!(refs[0].span, 0..19);
    }

    #[test]
    fn label_may_contain_closing_bracket() {
        let refs = references("see [a]b]#zzzzzz");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label, "a]b");
        assert_eq!(refs[0].id, "zzzzzz");
    }

    #[test]
    fn label_never_spans_lines() {
        assert!(references("[a\nb]#zzzzzz").is_empty());
        assert!(references("[a\r\nb]#zzzzzz").is_empty());

        let refs = references("[a\n[b]#zzzzzz");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label, "b");
    }

    #[test]
    fn id_takes_first_six_word_characters() {
        let refs = references("[x]#abcdefgh");
        assert_eq!(refs[0].id, "abcdef");
        assert_eq!(refs[0].span, 0..10);
    }

    #[test]
    fn empty_label_is_allowed() {
        let refs = references("[]#zzzzzz");
        assert_eq!(refs[0].label, "");
        assert_eq!(refs[0].id, "zzzzzz");
    }

    #[test]
    fn multibyte_text_around_markers() {
        let text = "中文 [标签]#abc123 结束";
        let refs = references(text);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label, "标签");
        assert_eq!(&text[refs[0].span.clone()], "[标签]#abc123");
    }
}
