//! Unmerge execution - effectful operations
//!
//! Persists an [`UnmergePlan`] to the store. Local state is only replaced
//! by the caller after this returns `Ok`, so a failed remote update never
//! leaves the collection diverged from the store.

use crate::error::Result;
use crate::merge::plan::UnmergePlan;
use crate::notify::{Notice, Notifier};
use crate::store::{PaymentStore, remote_error};
use crate::types::RequestPatch;
use tracing::{debug, warn};

/// Execute the remote half of an unmerge (EFFECTFUL)
///
/// Issues two sequential updates: first the non-leaders' records lose
/// their attachments, invoice number and merge membership, then the
/// leader's record loses its merge membership only. Members without a
/// persisted request are skipped. Stops at the first failure.
pub async fn execute_unmerge(
    plan: &UnmergePlan,
    store: &dyn PaymentStore,
    notifier: &dyn Notifier,
) -> Result<()> {
    if !plan.member_request_ids.is_empty() {
        debug!(
            group = %plan.group_id,
            requests = ?plan.member_request_ids,
            "Resetting non-leader payment requests"
        );
        let patch = RequestPatch::clear_artifacts().and_clear_merge();
        if let Err(e) = store.update(&plan.member_request_ids, &patch).await {
            let err = remote_error(e);
            warn!(group = %plan.group_id, error = %err, "Failed to reset non-leader requests");
            notifier.notify(Notice::error(format!("Unmerge failed: {err}")));
            return Err(err);
        }
    }

    if let Some(leader_request) = &plan.leader_request_id {
        debug!(group = %plan.group_id, request = %leader_request, "Clearing leader merge fields");
        let ids = [leader_request.clone()];
        if let Err(e) = store.update(&ids, &RequestPatch::clear_merge()).await {
            let err = remote_error(e);
            warn!(group = %plan.group_id, error = %err, "Failed to clear leader request");
            notifier.notify(Notice::error(format!("Unmerge failed: {err}")));
            return Err(err);
        }
    }

    Ok(())
}
