//! Submission planning - pure functions for building upserts
//!
//! All validation happens here, before anything reaches the store.

use crate::error::{Error, Result};
use crate::merge::group_leader;
use crate::types::{PaymentItem, RequestDraft, VerificationStatus};
use chrono::{DateTime, Utc};

/// Submission plan - one draft per selected item, in collection order
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    /// Upserts to dispatch
    pub operations: Vec<RequestDraft>,
}

impl SubmissionPlan {
    /// Line items covered by this plan
    pub fn line_item_ids(&self) -> Vec<String> {
        self.operations
            .iter()
            .map(|op| op.line_item_id.clone())
            .collect()
    }

    /// Number of upserts
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Resolve where an item's attachments and invoice number come from
///
/// Members of a merge group take them from the group's leader; everything
/// else uses its own. A merged item whose group does not have exactly one
/// leader is a [`Error::Consistency`].
pub fn effective_artifact_source<'a>(
    item: &'a PaymentItem,
    items: &'a [PaymentItem],
) -> Result<&'a PaymentItem> {
    let Some(merge) = &item.merge else {
        return Ok(item);
    };

    let members: Vec<&PaymentItem> = items
        .iter()
        .filter(|i| i.merge_group_id() == Some(merge.group_id.as_str()))
        .collect();
    group_leader(&members, &merge.group_id).map_err(|e| match e {
        Error::Consistency(msg) => Error::Consistency(format!("{msg} (item '{}')", item.id)),
        other => other,
    })
}

/// Create a submission plan (PURE - no I/O, easily testable)
///
/// Fails with [`Error::Validation`] if nothing is selected or any
/// selected item lacks a positive cost. Every draft starts `pending` and
/// clears any earlier rejection.
pub fn create_submission_plan(
    items: &[PaymentItem],
    submitted_at: DateTime<Utc>,
) -> Result<SubmissionPlan> {
    let selected: Vec<&PaymentItem> = items.iter().filter(|i| i.selected).collect();
    if selected.is_empty() {
        return Err(Error::Validation(
            "no items selected for submission".to_string(),
        ));
    }

    if let Some(bad) = selected.iter().find(|i| !i.cost.is_some_and(|c| c > 0.0)) {
        return Err(Error::Validation(format!(
            "item '{}' must have a cost greater than zero",
            bad.id
        )));
    }

    let mut operations = Vec::with_capacity(selected.len());
    for item in selected {
        let source = effective_artifact_source(item, items)?;
        let attachments = if source.attachments.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&source.attachments).map_err(|e| {
                Error::Internal(format!("failed to serialize attachments: {e}"))
            })?)
        };

        operations.push(RequestDraft {
            line_item_id: item.id.clone(),
            submitted_at,
            verification_status: VerificationStatus::Pending,
            cost: item.cost_or_zero(),
            merge: item.merge.clone(),
            attachments,
            invoice_number: source.invoice_number.clone(),
            rejection_reason: None,
            rejected_by: None,
            rejected_at: None,
        });
    }

    Ok(SubmissionPlan { operations })
}
