//! Submission persistence
//!
//! Holds at most one submission per user, in insertion order. Every
//! operation is serialized against every other one; see `JsonFileStore`.

mod json_file;
mod submission;

pub use json_file::JsonFileStore;
pub use submission::{GameMode, NewSubmission, Submission, SubmissionStats, UserId};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode submissions: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("No submission at position {position} (store holds {len})")]
    OutOfRange { position: usize, len: usize },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable collection of submissions, keyed by user
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Replace the caller's existing record in place, or append a new one.
    /// Stamps `created_at` with the current time in the display timezone.
    async fn upsert(&self, record: NewSubmission) -> StoreResult<Submission>;

    /// All records in stored order
    async fn list_all(&self) -> StoreResult<Vec<Submission>>;

    async fn delete_all(&self) -> StoreResult<()>;

    /// Remove the record at a 0-based position and return it
    async fn delete_at(&self, position: usize) -> StoreResult<Submission>;

    async fn stats(&self) -> StoreResult<SubmissionStats> {
        let records = self.list_all().await?;
        Ok(SubmissionStats::from_records(&records))
    }
}

#[async_trait]
impl<T: SubmissionStore + ?Sized> SubmissionStore for Arc<T> {
    async fn upsert(&self, record: NewSubmission) -> StoreResult<Submission> {
        (**self).upsert(record).await
    }

    async fn list_all(&self) -> StoreResult<Vec<Submission>> {
        (**self).list_all().await
    }

    async fn delete_all(&self) -> StoreResult<()> {
        (**self).delete_all().await
    }

    async fn delete_at(&self, position: usize) -> StoreResult<Submission> {
        (**self).delete_at(position).await
    }

    async fn stats(&self) -> StoreResult<SubmissionStats> {
        (**self).stats().await
    }
}
