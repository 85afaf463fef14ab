//! Carrot reward counter.
//!
//! Two counters only ever grow. A reset is a counted event: it bumps `resets`
//! and leaves `carrots` alone.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{meter_percentage, CarrotDelta, RewardState};
use crate::store::{keys, Store};

pub struct RewardCounter {
    store: Arc<Store>,
}

impl RewardCounter {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Current counters, zero if never written.
    pub async fn state(&self) -> Result<RewardState, AppError> {
        Ok(RewardState {
            carrots: self.store.get(keys::CARROTS, 0u64).await?,
            resets: self.store.get(keys::RESETS, 0u64).await?,
        })
    }

    pub async fn add_carrots(&self, delta: CarrotDelta) -> Result<RewardState, AppError> {
        let _guard = self.store.write_guard().await;
        let carrots = self
            .store
            .get(keys::CARROTS, 0u64)
            .await?
            .saturating_add(delta.amount());
        self.store.set(keys::CARROTS, &carrots).await?;

        tracing::debug!(amount = delta.amount(), carrots, "Carrots awarded");
        Ok(RewardState {
            carrots,
            resets: self.store.get(keys::RESETS, 0u64).await?,
        })
    }

    pub async fn add_reset(&self) -> Result<RewardState, AppError> {
        let _guard = self.store.write_guard().await;
        let resets = self.store.get(keys::RESETS, 0u64).await?.saturating_add(1);
        self.store.set(keys::RESETS, &resets).await?;

        tracing::debug!(resets, "Reset token used");
        Ok(RewardState {
            carrots: self.store.get(keys::CARROTS, 0u64).await?,
            resets,
        })
    }

    /// Meter fill for the current carrot count.
    pub async fn percentage(&self) -> Result<u8, AppError> {
        Ok(meter_percentage(self.state().await?.carrots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::temp_store;

    #[tokio::test]
    async fn test_defaults_to_zero() {
        let (store, _dir) = temp_store().await;
        let counter = RewardCounter::new(Arc::new(store));

        assert_eq!(counter.state().await.unwrap(), RewardState::default());
        assert_eq!(counter.percentage().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_five_fives_from_zero() {
        let (store, _dir) = temp_store().await;
        let counter = RewardCounter::new(Arc::new(store));

        for _ in 0..5 {
            counter.add_carrots(CarrotDelta::Five).await.unwrap();
        }

        assert_eq!(counter.state().await.unwrap().carrots, 25);
        assert_eq!(counter.percentage().await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_wraps_past_one_hundred() {
        let (store, _dir) = temp_store().await;
        let store = Arc::new(store);
        store.set(keys::CARROTS, &98u64).await.unwrap();
        let counter = RewardCounter::new(store);

        let state = counter.add_carrots(CarrotDelta::Five).await.unwrap();

        assert_eq!(state.carrots, 103);
        assert_eq!(counter.percentage().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reset_does_not_touch_carrots() {
        let (store, _dir) = temp_store().await;
        let counter = RewardCounter::new(Arc::new(store));

        counter.add_carrots(CarrotDelta::One).await.unwrap();
        let state = counter.add_reset().await.unwrap();

        assert_eq!(state, RewardState { carrots: 1, resets: 1 });
        assert_eq!(counter.state().await.unwrap(), state);
    }
}
