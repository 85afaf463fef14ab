//! Weekly digest aggregation.
//!
//! The window is a rolling seven days ending at `now`, measured in the same
//! epoch milliseconds the ledger stores. It is not aligned to calendar weeks.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::ledger::ClipLedger;
use crate::models::{ClipRecord, Digest, DigestTotals, RewardState, SettingsRecord};
use crate::rewards::RewardCounter;
use crate::settings::SettingsStore;
use crate::store::Store;

pub const DAY_MS: i64 = 86_400_000;
pub const WINDOW_MS: i64 = 7 * DAY_MS;

/// Build the digest for `now`. Clips with `captured_at >= now - 7 days` are
/// kept in ledger order; nothing is cut at the upper edge.
pub fn compute(
    clips: &[ClipRecord],
    rewards: RewardState,
    settings: &SettingsRecord,
    now: DateTime<Utc>,
) -> Digest {
    let window_start = now.timestamp_millis().saturating_sub(WINDOW_MS);
    let window_clips: Vec<ClipRecord> = clips
        .iter()
        .filter(|c| c.captured_at >= window_start)
        .cloned()
        .collect();

    Digest {
        generated_at: now,
        window_start,
        totals: DigestTotals {
            clip_count: window_clips.len(),
            carrots: rewards.carrots,
            resets: rewards.resets,
        },
        settings: settings.clone(),
        window_clips,
    }
}

/// Reads the current records and aggregates them.
pub struct DigestService {
    store: Arc<Store>,
    ledger: Arc<ClipLedger>,
    rewards: Arc<RewardCounter>,
    settings: Arc<SettingsStore>,
}

impl DigestService {
    pub fn new(
        store: Arc<Store>,
        ledger: Arc<ClipLedger>,
        rewards: Arc<RewardCounter>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            store,
            ledger,
            rewards,
            settings,
        }
    }

    pub async fn snapshot(&self, now: DateTime<Utc>) -> Result<Digest, AppError> {
        // Hold the writer lock so the three reads see one consistent state.
        let _guard = self.store.write_guard().await;
        let clips = self.ledger.list_all().await?;
        let rewards = self.rewards.state().await?;
        let settings = self.settings.load().await?;

        let digest = compute(&clips, rewards, &settings, now);
        tracing::debug!(
            clip_count = digest.totals.clip_count,
            window_start = digest.window_start,
            "Digest computed"
        );
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clip(id: &str, captured_at: i64) -> ClipRecord {
        ClipRecord {
            id: id.to_string(),
            captured_at,
            tag: "participation".to_string(),
            note: None,
            duration_label: None,
            size_bytes: 1024,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_window_keeps_last_seven_days() {
        let now_ms = now().timestamp_millis();
        let clips = vec![
            clip("now", now_ms),
            clip("six-days", now_ms - 6 * DAY_MS),
            clip("eight-days", now_ms - 8 * DAY_MS),
        ];

        let digest = compute(&clips, RewardState::default(), &SettingsRecord::default(), now());
        let ids: Vec<&str> = digest.window_clips.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["now", "six-days"]);
        assert_eq!(digest.totals.clip_count, 2);
    }

    #[test]
    fn test_lower_edge_is_inclusive() {
        let now_ms = now().timestamp_millis();
        let clips = vec![
            clip("edge", now_ms - WINDOW_MS),
            clip("just-outside", now_ms - WINDOW_MS - 1),
        ];

        let digest = compute(&clips, RewardState::default(), &SettingsRecord::default(), now());

        assert_eq!(digest.window_clips.len(), 1);
        assert_eq!(digest.window_clips[0].id, "edge");
        assert_eq!(digest.window_start, now_ms - WINDOW_MS);
    }

    #[test]
    fn test_totals_and_settings_snapshot() {
        let settings = SettingsRecord {
            class_name: "2C".into(),
            teacher: "Ms. Ade".into(),
            students: vec!["Ana".into()],
        };
        let rewards = RewardState {
            carrots: 42,
            resets: 3,
        };

        let digest = compute(&[], rewards, &settings, now());

        assert_eq!(
            digest.totals,
            DigestTotals {
                clip_count: 0,
                carrots: 42,
                resets: 3
            }
        );
        assert_eq!(digest.settings, settings);
        assert_eq!(digest.generated_at, now());
    }

    #[test]
    fn test_deterministic() {
        let clips = vec![clip("a", now().timestamp_millis())];
        let a = compute(&clips, RewardState::default(), &SettingsRecord::default(), now());
        let b = compute(&clips, RewardState::default(), &SettingsRecord::default(), now());

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
