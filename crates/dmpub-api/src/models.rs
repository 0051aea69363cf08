// Wire models for the Download Monitor REST API.
//
// Both REST flavors return the same records; Download Monitor uses
// camelCase field names, the DokuMate plugin snake_case. Deserialization
// accepts either, serialization emits camelCase. Embedded PHP dates keep
// their `timezone_type` spelling in both flavors.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A date as WordPress serializes PHP `DateTime` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPressDate {
    /// e.g. `"2019-03-14 09:26:53.000000"`
    pub date: String,
    #[serde(default)]
    pub timezone_type: Option<i32>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl WordPressDate {
    /// Parse `date` as a naive local timestamp in the record's timezone.
    pub fn parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S"))
            .ok()
    }
}

/// Parent record grouping the versions of one distributable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub author: Option<u64>,
    #[serde(default, alias = "download_link")]
    pub download_link: Option<String>,
}

impl Download {
    /// Title in comparison form: trimmed and uppercased.
    pub fn normalized_title(&self) -> Option<String> {
        self.title.as_deref().map(normalize_title)
    }
}

/// Canonical form used for title identity: surrounding whitespace removed,
/// case folded to upper.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_uppercase()
}

/// One versioned file entry under a [`Download`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadVersion {
    pub id: u64,
    #[serde(alias = "download_id")]
    pub download_id: u64,
    pub version: String,
    pub url: String,
    #[serde(default, alias = "menu_order")]
    pub menu_order: Option<i64>,
    #[serde(default)]
    pub date: Option<WordPressDate>,
    #[serde(default, alias = "download_count")]
    pub download_count: Option<u64>,
}

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct NewDownload<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewVersion<'a> {
    pub version: &'a str,
    pub url: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn download_from_camel_case() {
        let download: Download = serde_json::from_value(json!({
            "id": 42,
            "status": "publish",
            "title": "DokuMate for Office",
            "slug": "dokumate-for-office",
            "author": 1,
            "downloadLink": "https://example.com/download/42/"
        }))
        .unwrap();

        assert_eq!(download.id, 42);
        assert_eq!(
            download.download_link.as_deref(),
            Some("https://example.com/download/42/")
        );
        assert_eq!(
            download.normalized_title().as_deref(),
            Some("DOKUMATE FOR OFFICE")
        );
    }

    #[test]
    fn download_from_snake_case_with_null_title() {
        let download: Download = serde_json::from_value(json!({
            "id": 7,
            "title": null,
            "download_link": "https://example.com/download/7/"
        }))
        .unwrap();

        assert_eq!(download.title, None);
        assert_eq!(download.normalized_title(), None);
        assert!(download.download_link.is_some());
    }

    #[test]
    fn version_from_both_conventions() {
        let camel: DownloadVersion = serde_json::from_value(json!({
            "id": 9,
            "downloadId": 42,
            "version": "2.8.3",
            "url": "https://host/file.zip",
            "menuOrder": 0,
            "downloadCount": 12,
            "date": { "date": "2019-03-14 09:26:53.000000", "timezone_type": 3, "timezone": "UTC" }
        }))
        .unwrap();
        let snake: DownloadVersion = serde_json::from_value(json!({
            "id": 9,
            "download_id": 42,
            "version": "2.8.3",
            "url": "https://host/file.zip",
            "menu_order": 0,
            "download_count": 12,
            "date": { "date": "2019-03-14 09:26:53.000000", "timezone_type": 3, "timezone": "UTC" }
        }))
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.download_id, 42);
        assert_eq!(camel.download_count, Some(12));
    }

    #[test]
    fn version_serializes_camel_case() {
        let version = DownloadVersion {
            id: 1,
            download_id: 2,
            version: "1.0".into(),
            url: "https://host/a.zip".into(),
            menu_order: None,
            date: None,
            download_count: None,
        };
        let value = serde_json::to_value(&version).unwrap();
        assert_eq!(value["downloadId"], json!(2));
        assert!(value.get("download_id").is_none());
    }

    #[test]
    fn wordpress_date_parses_fractional_seconds() {
        let date = WordPressDate {
            date: "2019-03-14 09:26:53.000000".into(),
            timezone_type: Some(3),
            timezone: Some("UTC".into()),
        };
        let parsed = date.parsed().unwrap();
        assert_eq!(parsed.to_string(), "2019-03-14 09:26:53");

        let bad = WordPressDate {
            date: "yesterday".into(),
            timezone_type: None,
            timezone: None,
        };
        assert!(bad.parsed().is_none());
    }

    #[test]
    fn wordpress_date_keeps_php_field_names() {
        let date: WordPressDate = serde_json::from_value(json!({
            "date": "2019-03-14 09:26:53.000000",
            "timezone_type": 3,
            "timezone": "UTC"
        }))
        .unwrap();
        assert_eq!(date.timezone_type, Some(3));

        let value = serde_json::to_value(&date).unwrap();
        assert_eq!(value["timezone_type"], json!(3));
        assert!(value.get("timezoneType").is_none());
    }

    #[test]
    fn title_normalization() {
        assert_eq!(normalize_title("  Release "), "RELEASE");
        assert_eq!(normalize_title("release"), normalize_title("RELEASE"));
    }
}
