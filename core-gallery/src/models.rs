//! Image metadata as served by the upstream list endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of remote image metadata.
///
/// Only `id` is required and must be a string. The descriptive fields are
/// typed for convenience but optional. Anything the upstream adds beyond them,
/// or a descriptive field whose JSON type does not match, is kept verbatim in
/// [`extra`](Self::extra) so the record round-trips unchanged.
///
/// ```
/// use core_gallery::models::ImageRecord;
///
/// let record: ImageRecord = serde_json::from_str(
///     r#"{"id":"0","author":"Alejandro Escamilla","width":5000,"height":3333,
///        "url":"https://unsplash.com/photos/yC-Yzbqy7PY",
///        "download_url":"https://picsum.photos/id/0/5000/3333"}"#,
/// ).unwrap();
/// assert_eq!(record.id, "0");
/// assert_eq!(record.width, Some(5000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ImageRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Page of the original photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Direct link to the full-size image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: None,
            width: None,
            height: None,
            url: None,
            download_url: None,
            extra: Map::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_urls(mut self, url: impl Into<String>, download_url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.download_url = Some(download_url.into());
        self
    }
}

impl TryFrom<Map<String, Value>> for ImageRecord {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            Some(other) => {
                return Err(format!("field `id` must be a string, got {}", other));
            }
            None => return Err("missing field `id`".to_string()),
        };

        Ok(Self {
            id,
            author: take_field(&mut fields, "author", as_string),
            width: take_field(&mut fields, "width", as_dimension),
            height: take_field(&mut fields, "height", as_dimension),
            url: take_field(&mut fields, "url", as_string),
            download_url: take_field(&mut fields, "download_url", as_string),
            extra: fields,
        })
    }
}

/// Moves `key` out of `fields` when `convert` accepts its value, otherwise
/// leaves it in place.
fn take_field<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    let typed = fields.get(key).and_then(convert)?;
    fields.remove(key);
    Some(typed)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_dimension(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_record() {
        let json = r#"{
            "id": "10",
            "author": "Paul Jarvis",
            "width": 2500,
            "height": 1667,
            "url": "https://unsplash.com/photos/6J--NXulQCs",
            "download_url": "https://picsum.photos/id/10/2500/1667"
        }"#;

        let record: ImageRecord = serde_json::from_str(json).unwrap();
        let expected = ImageRecord::new("10")
            .with_author("Paul Jarvis")
            .with_dimensions(2500, 1667)
            .with_urls(
                "https://unsplash.com/photos/6J--NXulQCs",
                "https://picsum.photos/id/10/2500/1667",
            );
        assert_eq!(record, expected);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_decode_minimal_record() {
        let record: ImageRecord = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(record, ImageRecord::new("abc"));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let json = r#"{"id":"7","author":"Alejandro Escamilla","blur_hash":"LEHV6nWB2yk8","tags":["sea"]}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.author.as_deref(), Some("Alejandro Escamilla"));
        assert_eq!(record.extra.get("blur_hash"), Some(&Value::from("LEHV6nWB2yk8")));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tags"][0], "sea");
        assert!(value.get("width").is_none());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result = serde_json::from_str::<ImageRecord>(r#"{"author":"nobody"}"#);
        assert!(result.unwrap_err().to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_non_string_id_is_rejected() {
        let result = serde_json::from_str::<ImageRecord>(r#"{"id":0}"#);
        assert!(result.unwrap_err().to_string().contains("`id` must be a string"));
    }

    #[test]
    fn test_mistyped_fields_are_kept_in_extra() {
        let json = r#"{"id":"3","author":7,"width":5000.0,"height":"3333","url":null,
                       "download_url":"https://picsum.photos/id/3/5000/3333"}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.author, None);
        assert_eq!(record.width, None);
        assert_eq!(record.height, None);
        assert_eq!(record.url, None);
        assert_eq!(
            record.download_url.as_deref(),
            Some("https://picsum.photos/id/3/5000/3333")
        );
        assert_eq!(record.extra.get("author"), Some(&Value::from(7)));
        assert_eq!(record.extra.get("height"), Some(&Value::from("3333")));
        assert_eq!(record.extra.get("url"), Some(&Value::Null));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["width"], 5000.0);
        assert_eq!(value["author"], 7);
    }

    #[test]
    fn test_oversized_dimension_is_kept_in_extra() {
        let record: ImageRecord =
            serde_json::from_str(r#"{"id":"9","width":8589934592,"height":10}"#).unwrap();

        assert_eq!(record.width, None);
        assert_eq!(record.height, Some(10));
        assert_eq!(record.extra.get("width"), Some(&Value::from(8589934592u64)));
    }
}
