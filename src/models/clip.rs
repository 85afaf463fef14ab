//! Clip metadata model.

use serde::{Deserialize, Serialize};

/// Metadata for one recorded clip.
///
/// The audio itself is not part of the record; it lives in the ledger's
/// session map and is gone after a restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    /// Older exports carry no id; the importer assigns one.
    #[serde(default)]
    pub id: String,
    /// Milliseconds since the Unix epoch.
    #[serde(alias = "ts")]
    pub captured_at: i64,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_label: Option<String>,
    #[serde(default)]
    pub size_bytes: u64,
}

/// Query parameters accompanying an uploaded capture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClipParams {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Trim a free-text note; blank notes are dropped.
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

impl ClipRecord {
    /// Apply the capture rules to a record that arrived from outside the ledger.
    ///
    /// Tag and note are trimmed, a duration that is not `MM:SS` is dropped, and
    /// a missing id is derived from the record's content so the same record
    /// always maps to the same id.
    pub fn normalized(mut self) -> Self {
        self.tag = self.tag.trim().to_string();
        self.note = normalize_note(self.note.as_deref());
        self.duration_label = self
            .duration_label
            .as_deref()
            .map(str::trim)
            .filter(|d| is_duration_label(d))
            .map(str::to_string);
        self.id = self.id.trim().to_string();
        if self.id.is_empty() {
            self.id = content_id(self.captured_at, &self.tag, self.note.as_deref());
        }
        self
    }
}

/// Name-based id over `capturedAt|tag|note`.
fn content_id(captured_at: i64, tag: &str, note: Option<&str>) -> String {
    let name = format!("{}|{}|{}", captured_at, tag, note.unwrap_or(""));
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

/// `MM:SS` with any number of minute digits and seconds 00-59.
pub fn is_duration_label(label: &str) -> bool {
    let Some((minutes, seconds)) = label.split_once(':') else {
        return false;
    };

    !minutes.is_empty()
        && minutes.bytes().all(|b| b.is_ascii_digit())
        && seconds.len() == 2
        && seconds.bytes().all(|b| b.is_ascii_digit())
        && seconds < "60"
}
