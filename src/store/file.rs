//! JSON-file payment request store

use crate::error::{Error, Result};
use crate::store::PaymentStore;
use crate::types::{PaymentRequest, RequestDraft, RequestFilter, RequestPatch};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Store keeping every payment request in one pretty-printed JSON file
///
/// Reads and writes are serialized through a mutex so concurrent upserts
/// from one process never interleave.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<PaymentRequest>> {
        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|e| Error::Store(format!("failed to access {}: {e}", self.path.display())))?;
        if !exists {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Store(format!("failed to read {}: {e}", self.path.display())))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Store(format!("failed to parse {}: {e}", self.path.display())))
    }

    async fn save(&self, records: &[PaymentRequest]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::Store(format!("failed to create {}: {e}", dir.display())))?;
        }

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| Error::Store(format!("failed to serialize requests: {e}")))?;

        // Write a sibling temp file and rename it over the store
        let tmp_path = self.path.with_extension("json.tmp");
        let write_err =
            |e: std::io::Error| Error::Store(format!("failed to write {}: {e}", tmp_path.display()));
        let mut file = fs::File::create(&tmp_path).await.map_err(write_err)?;
        file.write_all(content.as_bytes()).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            Error::Store(format!(
                "failed to replace {}: {e}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), records = records.len(), "Saved payment requests");
        Ok(())
    }
}

fn new_request_id() -> String {
    format!("req-{}", Uuid::new_v4())
}

#[async_trait]
impl PaymentStore for FileStore {
    async fn select(&self, filter: &RequestFilter) -> Result<Vec<PaymentRequest>> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn update(&self, ids: &[String], patch: &RequestPatch) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;

        if let Some(missing) = ids.iter().find(|id| !records.iter().any(|r| &r.id == *id)) {
            return Err(Error::RemotePersistence(format!(
                "payment request '{missing}' does not exist"
            )));
        }

        let mut updated = 0;
        for record in records.iter_mut().filter(|r| ids.contains(&r.id)) {
            patch.apply(record);
            updated += 1;
        }

        self.save(&records).await?;
        debug!(count = updated, "Updated payment requests");
        Ok(updated)
    }

    async fn insert(&self, draft: RequestDraft) -> Result<PaymentRequest> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;

        if records.iter().any(|r| r.line_item_id == draft.line_item_id) {
            return Err(Error::RemotePersistence(format!(
                "line item '{}' already has a payment request",
                draft.line_item_id
            )));
        }

        let record = draft.into_request(new_request_id());
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    async fn upsert(&self, draft: RequestDraft) -> Result<PaymentRequest> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;

        let record = if let Some(existing) = records
            .iter_mut()
            .find(|r| r.line_item_id == draft.line_item_id)
        {
            *existing = draft.into_request(existing.id.clone());
            existing.clone()
        } else {
            let record = draft.into_request(new_request_id());
            records.push(record.clone());
            record
        };

        self.save(&records).await?;
        debug!(id = %record.id, line_item = %record.line_item_id, "Upserted payment request");
        Ok(record)
    }
}
