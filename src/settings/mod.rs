//! Class settings record, stored wholesale under `cc_settings`.

use std::sync::Arc;

use crate::errors::AppError;
use crate::models::SettingsRecord;
use crate::store::{keys, Store};

pub struct SettingsStore {
    store: Arc<Store>,
}

impl SettingsStore {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<SettingsRecord, AppError> {
        self.store.get(keys::SETTINGS, SettingsRecord::default()).await
    }

    pub async fn save(&self, record: &SettingsRecord) -> Result<(), AppError> {
        let _guard = self.store.write_guard().await;
        self.store.set(keys::SETTINGS, record).await?;
        tracing::info!(
            class_name = %record.class_name,
            students = record.students.len(),
            "Settings saved"
        );
        Ok(())
    }
}
