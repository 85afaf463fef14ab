//! Digest import.
//!
//! Parsing is separated from applying: `parse_import` validates the whole
//! document first, so a rejected import never touches the store. Clip history is
//! merged; counters and settings present in the document replace the stored
//! ones.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ledger::merge_clips;
use crate::models::{ClipRecord, SettingsRecord};
use crate::store::{keys, Store};

/// Why an import document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    NotJson(String),
    NotAnObject,
    BadShape(String),
    MissingTag { index: usize },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::NotJson(reason) => write!(f, "invalid format: not JSON ({})", reason),
            ImportError::NotAnObject => write!(f, "invalid format: expected a JSON object"),
            ImportError::BadShape(reason) => write!(f, "invalid format: {}", reason),
            ImportError::MissingTag { index } => {
                write!(f, "invalid format: clip {} has no tag", index)
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::InvalidFormat(err.to_string())
    }
}

/// A validated import document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPayload {
    pub clips: Vec<ClipRecord>,
    pub carrots: Option<u64>,
    pub resets: Option<u64>,
    pub settings: Option<SettingsRecord>,
}

/// What an applied import changed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub clips_in_document: usize,
    pub clips_added: usize,
    pub total_clips: usize,
    pub carrots_replaced: bool,
    pub resets_replaced: bool,
    pub settings_replaced: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    #[serde(default)]
    window_clips: Option<Vec<ClipRecord>>,
    /// Legacy name for `windowClips`; ignored when both are present.
    #[serde(default)]
    entries: Option<Vec<ClipRecord>>,
    #[serde(default)]
    totals: Option<ImportTotals>,
    #[serde(default)]
    settings: Option<SettingsRecord>,
}

#[derive(Deserialize)]
struct ImportTotals {
    #[serde(default)]
    carrots: Option<u64>,
    #[serde(default)]
    resets: Option<u64>,
}

/// Validate an exported digest (current or legacy layout).
pub fn parse_import(bytes: &[u8]) -> Result<ImportPayload, ImportError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| ImportError::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(ImportError::NotAnObject);
    }

    let document: ImportDocument =
        serde_json::from_value(value).map_err(|e| ImportError::BadShape(e.to_string()))?;

    let clips = document
        .window_clips
        .or(document.entries)
        .unwrap_or_default();
    if let Some(index) = clips.iter().position(|c| c.tag.trim().is_empty()) {
        return Err(ImportError::MissingTag { index });
    }

    let (carrots, resets) = document
        .totals
        .map(|t| (t.carrots, t.resets))
        .unwrap_or((None, None));

    Ok(ImportPayload {
        clips,
        carrots,
        resets,
        settings: document.settings,
    })
}

/// Write a validated payload back to the store in one transaction.
pub async fn apply_import(store: &Store, payload: ImportPayload) -> Result<ImportSummary, AppError> {
    let _guard = store.write_guard().await;

    let existing: Vec<ClipRecord> = store.get(keys::CLIPS, Vec::new()).await?;
    let existing_count = existing.len();
    let clips_in_document = payload.clips.len();
    let merged = merge_clips(existing, payload.clips);

    let mut entries = vec![(keys::CLIPS, serde_json::to_value(&merged)?)];
    if let Some(carrots) = payload.carrots {
        entries.push((keys::CARROTS, serde_json::Value::from(carrots)));
    }
    if let Some(resets) = payload.resets {
        entries.push((keys::RESETS, serde_json::Value::from(resets)));
    }
    if let Some(settings) = &payload.settings {
        entries.push((keys::SETTINGS, serde_json::to_value(settings)?));
    }
    store.set_many(&entries).await?;

    let summary = ImportSummary {
        clips_in_document,
        clips_added: merged.len() - existing_count,
        total_clips: merged.len(),
        carrots_replaced: payload.carrots.is_some(),
        resets_replaced: payload.resets.is_some(),
        settings_replaced: payload.settings.is_some(),
    };
    tracing::info!(
        clips_added = summary.clips_added,
        total_clips = summary.total_clips,
        "Digest imported"
    );
    Ok(summary)
}
