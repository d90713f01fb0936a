//! Submission execution - effectful operations
//!
//! Dispatches a [`SubmissionPlan`] against the store and re-reads the
//! authoritative request state afterwards. The store's answer, not the
//! drafts we sent, is what ends up on the items.

use crate::error::{Error, Result};
use crate::notify::{Notice, Notifier};
use crate::store::{PaymentStore, remote_error};
use crate::submit::plan::{SubmissionPlan, create_submission_plan};
use crate::types::{PaymentItem, PaymentRequest, RequestFilter};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

/// Outcome of a fully successful submission
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    /// Number of requests upserted
    pub submitted: usize,
    /// Collection with request state refetched and selection cleared
    pub items: Vec<PaymentItem>,
}

/// Execute the submission plan (EFFECTFUL)
///
/// All upserts run concurrently. Nothing is rolled back on failure: if
/// every upsert failed the first message comes back as
/// [`Error::RemotePersistence`], if only some failed as
/// [`Error::PartialSubmission`].
pub async fn execute_submission(
    plan: &SubmissionPlan,
    store: &dyn PaymentStore,
    notifier: &dyn Notifier,
) -> Result<Vec<PaymentRequest>> {
    let results = join_all(
        plan.operations
            .iter()
            .cloned()
            .map(|draft| store.upsert(draft)),
    )
    .await;

    let mut persisted = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (draft, result) in plan.operations.iter().zip(results) {
        match result {
            Ok(request) => persisted.push(request),
            Err(e) => {
                warn!(line_item = %draft.line_item_id, error = %e, "Upsert failed");
                failures.push(remote_error(e));
            }
        }
    }

    let Some(first) = failures.first() else {
        info!(count = persisted.len(), "Submitted payment requests");
        return Ok(persisted);
    };

    let message = match first {
        Error::RemotePersistence(msg) => msg.clone(),
        other => other.to_string(),
    };
    notifier.notify(Notice::error(format!(
        "Submission failed for {} of {} item(s): {message}",
        failures.len(),
        plan.len()
    )));

    if persisted.is_empty() {
        Err(Error::RemotePersistence(message))
    } else {
        Err(Error::PartialSubmission {
            submitted: persisted.len(),
            failed: failures.len(),
            message,
        })
    }
}

/// Copy store-side request state onto items
///
/// Items with a record get its id and rejection reason; items without one
/// are left as they are.
pub fn apply_request_state(items: &[PaymentItem], records: &[PaymentRequest]) -> Vec<PaymentItem> {
    items
        .iter()
        .map(|item| {
            let mut refreshed = item.clone();
            if let Some(record) = records.iter().find(|r| r.line_item_id == item.id) {
                refreshed.request_id = Some(record.id.clone());
                refreshed.rejection_reason.clone_from(&record.rejection_reason);
            }
            refreshed
        })
        .collect()
}

/// Re-read request state for `items` from the store
pub async fn refetch_items(
    items: &[PaymentItem],
    store: &dyn PaymentStore,
) -> Result<Vec<PaymentItem>> {
    let ids = items.iter().map(|i| i.id.clone()).collect();
    let records = store
        .select(&RequestFilter::LineItems(ids))
        .await
        .map_err(remote_error)?;
    Ok(apply_request_state(items, &records))
}

/// Validate, plan, dispatch and refetch in one call
///
/// Validation failures are reported and returned before the store is
/// touched. After a full success the selection flags are cleared and the
/// store is re-read; if that re-read fails the operator is warned and the
/// items keep their previous request state.
pub async fn submit(
    items: &[PaymentItem],
    submitted_at: DateTime<Utc>,
    store: &dyn PaymentStore,
    notifier: &dyn Notifier,
) -> Result<SubmissionReport> {
    let plan = match create_submission_plan(items, submitted_at) {
        Ok(plan) => plan,
        Err(e) => {
            notifier.notify(Notice::error(e.to_string()));
            return Err(e);
        }
    };

    let persisted = execute_submission(&plan, store, notifier).await?;
    let submitted = persisted.len();

    let cleared: Vec<PaymentItem> = items
        .iter()
        .map(|i| PaymentItem {
            selected: false,
            ..i.clone()
        })
        .collect();

    let items = match refetch_items(&cleared, store).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Refetch after submission failed");
            notifier.notify(Notice::warning(format!(
                "Submitted, but refreshing failed: {e}"
            )));
            cleared
        }
    };

    notifier.notify(Notice::success(format!("Submitted {submitted} item(s)")));
    Ok(SubmissionReport { submitted, items })
}
