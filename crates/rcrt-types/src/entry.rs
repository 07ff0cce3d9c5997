use serde::{Deserialize, Serialize};

use crate::identity::EntryId;

/// One timeline item, tagged by its `type` field on the wire.
///
/// Optional fields are omitted from the serialized form when absent, so a
/// record written by an edit is stored exactly as supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    /// Short inline text with a creation time.
    Post {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<i64>,
    },
    /// Older spelling of [`Entry::Post`].
    TextInline {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<i64>,
    },
    /// A bare outbound link.
    Link { url: String },
    /// Long-form text. The body lives in `<id>.txt`.
    Article {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        series: Option<String>,
    },
    /// Binary image. The bytes live in `<id>.<ext>`.
    Image { ext: String },
}

impl Entry {
    /// The `type` tag as written to `meta.json`.
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::Post { .. } => "post",
            Entry::TextInline { .. } => "text_inline",
            Entry::Link { .. } => "link",
            Entry::Article { .. } => "article",
            Entry::Image { .. } => "image",
        }
    }

    /// Creation time in epoch seconds, for the variants that carry one.
    pub fn time(&self) -> Option<i64> {
        match self {
            Entry::Post { time, .. }
            | Entry::TextInline { time, .. }
            | Entry::Article { time, .. } => *time,
            Entry::Link { .. } | Entry::Image { .. } => None,
        }
    }

    /// Name of the content file holding this entry's payload, if any.
    pub fn content_file(&self, id: &EntryId) -> Option<String> {
        match self {
            Entry::Article { .. } => Some(format!("{id}.txt")),
            Entry::Image { ext } => Some(format!("{id}.{ext}")),
            _ => None,
        }
    }

    /// Whether the payload is kept in a separate content file.
    pub fn has_content_file(&self) -> bool {
        matches!(self, Entry::Article { .. } | Entry::Image { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_serializes_with_type_tag() {
        let entry = Entry::Post {
            text: "hello".into(),
            time: Some(1_600_000_000),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"type": "post", "text": "hello", "time": 1_600_000_000}));
    }

    #[test]
    fn missing_optional_fields_stay_missing() {
        let raw = json!({"type": "post", "text": "new"});
        let entry: Entry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.time(), None);
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn all_variants_parse() {
        let cases = [
            (json!({"type": "post", "text": "a", "time": 1}), "post"),
            (json!({"type": "text_inline", "text": "a", "time": 1}), "text_inline"),
            (json!({"type": "link", "url": "https://example.com"}), "link"),
            (
                json!({"type": "article", "title": "t", "time": 1, "series": "s"}),
                "article",
            ),
            (json!({"type": "image", "ext": "png"}), "image"),
        ];
        for (raw, kind) in cases {
            let entry: Entry = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(entry.kind(), kind);
            assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let raw = json!({"type": "video", "url": "x"});
        assert!(serde_json::from_value::<Entry>(raw).is_err());
    }

    #[test]
    fn missing_tag_is_rejected() {
        assert!(serde_json::from_value::<Entry>(json!({"text": "x"})).is_err());
    }

    #[test]
    fn content_file_names() {
        let id = EntryId::parse("abc123").unwrap();
        let article = Entry::Article {
            title: "t".into(),
            time: None,
            series: None,
        };
        let image = Entry::Image { ext: "svg".into() };
        let link = Entry::Link { url: "u".into() };
        assert_eq!(article.content_file(&id).as_deref(), Some("abc123.txt"));
        assert_eq!(image.content_file(&id).as_deref(), Some("abc123.svg"));
        assert_eq!(link.content_file(&id), None);
        assert!(article.has_content_file());
        assert!(!link.has_content_file());
    }
}
