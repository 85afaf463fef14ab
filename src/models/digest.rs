//! Weekly digest model. Derived on demand, never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClipRecord, SettingsRecord};

/// Aggregate counts shown at the top of every export.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DigestTotals {
    pub clip_count: usize,
    pub carrots: u64,
    pub resets: u64,
}

/// Rolling seven-day summary of the ledger, counters and settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    /// Inclusive lower edge of the window, ms since epoch.
    pub window_start: i64,
    pub totals: DigestTotals,
    pub settings: SettingsRecord,
    pub window_clips: Vec<ClipRecord>,
}
