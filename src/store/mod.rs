//! Backing store for payment requests
//!
//! The store is the system of record across sessions and the only place
//! request ids are assigned. The engine only talks to it through
//! [`PaymentStore`].

mod file;

pub use file::FileStore;

use crate::error::{Error, Result};
use crate::types::{PaymentRequest, RequestDraft, RequestFilter, RequestPatch};
use async_trait::async_trait;

/// Payment request store operations
///
/// Every call is independently failable and all-or-nothing for the
/// records it touches. No atomicity is assumed across calls.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Fetch records matching a filter
    async fn select(&self, filter: &RequestFilter) -> Result<Vec<PaymentRequest>>;

    /// Apply a patch to every record in `ids`
    ///
    /// Fails without touching anything if any id is unknown. Returns the
    /// number of records updated.
    async fn update(&self, ids: &[String], patch: &RequestPatch) -> Result<usize>;

    /// Insert a new record; fails if the line item already has one
    async fn insert(&self, draft: RequestDraft) -> Result<PaymentRequest>;

    /// Insert a record, or replace the existing one for the same line item
    /// while keeping its id
    async fn upsert(&self, draft: RequestDraft) -> Result<PaymentRequest>;
}

/// Normalize a store failure into [`Error::RemotePersistence`]
pub(crate) fn remote_error(err: Error) -> Error {
    match err {
        Error::RemotePersistence(_) => err,
        other => Error::RemotePersistence(other.to_string()),
    }
}
