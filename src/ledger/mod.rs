//! Clip ledger: recorded clip metadata, most recent first.
//!
//! Metadata is persisted under `cc_clips`. Audio payloads are held in memory for
//! the lifetime of the process only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::body::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{is_duration_label, normalize_note, ClipRecord};
use crate::store::{keys, Store};

/// A finished capture handed over by the recording subsystem.
#[derive(Debug, Clone)]
pub struct NewClip {
    pub tag: String,
    pub note: Option<String>,
    pub duration_label: Option<String>,
    pub audio: Bytes,
}

pub struct ClipLedger {
    store: Arc<Store>,
    audio: RwLock<HashMap<String, Bytes>>,
}

impl ClipLedger {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            audio: RwLock::new(HashMap::new()),
        }
    }

    /// All clips in ledger order.
    pub async fn list_all(&self) -> Result<Vec<ClipRecord>, AppError> {
        self.store.get(keys::CLIPS, Vec::new()).await
    }

    /// Get a clip by ID.
    pub async fn get(&self, id: &str) -> Result<Option<ClipRecord>, AppError> {
        Ok(self.list_all().await?.into_iter().find(|c| c.id == id))
    }

    /// Session audio for a clip, if it was recorded by this process.
    pub async fn audio(&self, id: &str) -> Option<Bytes> {
        self.audio.read().await.get(id).cloned()
    }

    /// Validate a capture and insert it at the head of the ledger.
    pub async fn append(&self, clip: NewClip) -> Result<ClipRecord, AppError> {
        let tag = clip.tag.trim();
        if tag.is_empty() {
            return Err(AppError::Validation("Tag is required".to_string()));
        }
        if clip.audio.is_empty() {
            return Err(AppError::Validation(
                "Empty capture: no audio was recorded".to_string(),
            ));
        }
        let duration_label = clip
            .duration_label
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if let Some(label) = duration_label {
            if !is_duration_label(label) {
                return Err(AppError::Validation(format!(
                    "Duration must be MM:SS, got {:?}",
                    label
                )));
            }
        }

        let record = ClipRecord {
            id: uuid::Uuid::new_v4().to_string(),
            captured_at: Utc::now().timestamp_millis(),
            tag: tag.to_string(),
            note: normalize_note(clip.note.as_deref()),
            duration_label: duration_label.map(str::to_string),
            size_bytes: clip.audio.len() as u64,
        };

        let _guard = self.store.write_guard().await;
        let mut clips = self.list_all().await?;
        clips.insert(0, record.clone());
        self.store.set(keys::CLIPS, &clips).await?;

        self.audio
            .write()
            .await
            .insert(record.id.clone(), clip.audio);

        tracing::info!(
            clip_id = %record.id,
            tag = %record.tag,
            size_bytes = record.size_bytes,
            "Clip saved"
        );
        Ok(record)
    }

    /// Remove a clip by ID. Returns whether anything was removed; an unknown ID
    /// is not an error.
    pub async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.store.write_guard().await;
        let mut clips = self.list_all().await?;
        let before = clips.len();
        clips.retain(|c| c.id != id);
        let removed = clips.len() != before;

        if removed {
            self.store.set(keys::CLIPS, &clips).await?;
            tracing::info!(clip_id = %id, "Clip removed");
        }
        self.audio.write().await.remove(id);

        Ok(removed)
    }

    /// Remove every application key and every session payload.
    ///
    /// Both happen under the store write guard, so a concurrent append lands
    /// either wholly before or wholly after the wipe.
    pub async fn wipe(&self) -> Result<(), AppError> {
        let _guard = self.store.write_guard().await;
        self.store.remove_many(&keys::ALL).await?;
        self.audio.write().await.clear();
        tracing::warn!("All local data wiped");
        Ok(())
    }
}

/// Union of two clip lists keyed by ID, newest first.
///
/// Imported records are normalised first, so an ID-less record always gets the
/// same ID. Existing records win an ID collision. The sort is stable, so equal
/// timestamps keep their relative order.
pub fn merge_clips(existing: Vec<ClipRecord>, imported: Vec<ClipRecord>) -> Vec<ClipRecord> {
    let mut seen: HashSet<String> = existing.iter().map(|c| c.id.clone()).collect();
    let mut merged = existing;

    for clip in imported {
        let clip = clip.normalized();
        if seen.insert(clip.id.clone()) {
            merged.push(clip);
        }
    }

    merged.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    merged
}
