//! JSON file backed submission store
//!
//! The whole collection is read, modified and rewritten under one async
//! mutex. Rewrites go to a sibling temp file that is renamed over the live
//! file, so a failed write leaves the previous contents in place.

use super::{NewSubmission, StoreError, StoreResult, Submission, SubmissionStore};
use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct JsonFileStore {
    path: PathBuf,
    display_offset: FixedOffset,
    /// Held for the full duration of every operation
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, display_offset: FixedOffset) -> Self {
        Self {
            path: path.into(),
            display_offset,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tolerant read: a missing, empty or malformed file is an empty store.
    async fn read_records(&self) -> StoreResult<Vec<Submission>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No submission file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Submission file is malformed, treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_records(&self, records: &[Submission]) -> StoreResult<()> {
        let mut body = serde_json::to_vec_pretty(records)?;
        body.push(b'\n');

        let temp_path = self.temp_path();
        let replaced = match tokio::fs::write(&temp_path, &body).await {
            Ok(()) => tokio::fs::rename(&temp_path, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = replaced {
            // A half-written temp file must not linger next to the live one
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("submissions.json"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn upsert(&self, record: NewSubmission) -> StoreResult<Submission> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;

        let stored = record.stamped(Utc::now().with_timezone(&self.display_offset));
        match records.iter_mut().find(|r| r.user_id == stored.user_id) {
            Some(existing) => *existing = stored.clone(),
            None => records.push(stored.clone()),
        }

        self.write_records(&records).await?;
        tracing::info!(
            user_id = %stored.user_id,
            game_mode = %stored.game_mode,
            total = records.len(),
            "Submission saved"
        );
        Ok(stored)
    }

    async fn list_all(&self) -> StoreResult<Vec<Submission>> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    async fn delete_all(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.write_records(&[]).await?;
        tracing::info!("All submissions deleted");
        Ok(())
    }

    async fn delete_at(&self, position: usize) -> StoreResult<Submission> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;

        if position >= records.len() {
            return Err(StoreError::OutOfRange {
                position,
                len: records.len(),
            });
        }

        let removed = records.remove(position);
        self.write_records(&records).await?;
        tracing::info!(position, user_id = %removed.user_id, "Submission deleted");
        Ok(removed)
    }
}
