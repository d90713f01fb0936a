//! Core types for payq

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file attached to a payment item (receipt, invoice scan, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Display file name
    pub name: String,
    /// Public URL for the file
    pub url: String,
    /// Path within blob storage; identifies the file
    pub path: String,
}

/// Bank account a payment is paid into
///
/// Compared structurally: two items may only be merged when every field
/// matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayeeAccount {
    /// Bank name
    pub bank_name: String,
    /// Account number as printed on the passbook
    pub account_number: String,
    /// Account holder name
    pub account_holder: String,
    /// Branch name, if the bank requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Kind of merge linking several items into one payment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeType {
    /// Items paid together because they share a payee account
    Account,
}

impl std::fmt::Display for MergeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account => write!(f, "account"),
        }
    }
}

/// Merge membership of a single item
///
/// Present only while the item belongs to a merge group, so the group id,
/// merge type and color are always set together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeInfo {
    /// Merge type
    pub merge_type: MergeType,
    /// Group id shared by every member
    pub group_id: String,
    /// Whether this member holds the group's attachments and invoice number
    pub is_leader: bool,
    /// Palette token shared by every member
    pub color: String,
}

/// A billable line item awaiting payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentItem {
    /// Stable item id
    pub id: String,
    /// Owning project id (None groups the item under "unknown")
    #[serde(default)]
    pub project_id: Option<String>,
    /// Project display name
    #[serde(default)]
    pub project_name: Option<String>,
    /// Client display name
    #[serde(default)]
    pub client_name: Option<String>,
    /// Payee bank account
    #[serde(default)]
    pub payee: Option<PayeeAccount>,
    /// Cost amount; must be positive to submit
    #[serde(default)]
    pub cost: Option<f64>,
    /// Operator intends to submit this item
    #[serde(default)]
    pub selected: bool,
    /// Attached files
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Invoice number (format `AB-12345678`)
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Reason a previous submission was rejected
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Id of the persisted payment request, once submitted
    #[serde(default)]
    pub request_id: Option<String>,
    /// Merge membership
    #[serde(default)]
    pub merge: Option<MergeInfo>,
}

impl PaymentItem {
    /// Create a bare item with only an id and project
    pub fn new(id: impl Into<String>, project_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            project_id,
            project_name: None,
            client_name: None,
            payee: None,
            cost: None,
            selected: false,
            attachments: Vec::new(),
            invoice_number: None,
            rejection_reason: None,
            request_id: None,
            merge: None,
        }
    }

    /// Merge group id, if the item is merged
    pub fn merge_group_id(&self) -> Option<&str> {
        self.merge.as_ref().map(|m| m.group_id.as_str())
    }

    /// Whether the item leads its merge group
    pub fn is_merge_leader(&self) -> bool {
        self.merge.as_ref().is_some_and(|m| m.is_leader)
    }

    /// Cost, treating a missing amount as zero
    pub fn cost_or_zero(&self) -> f64 {
        self.cost.unwrap_or(0.0)
    }
}

/// Verification state of a persisted payment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Awaiting review
    Pending,
    /// Approved for payment
    Approved,
    /// Rejected; see `rejection_reason`
    Rejected,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A payment request record held by the backing store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    /// Store-assigned id
    pub id: String,
    /// Line item this request pays for
    pub line_item_id: String,
    /// When the request was (re)submitted
    pub submitted_at: DateTime<Utc>,
    /// Review state
    pub verification_status: VerificationStatus,
    /// Amount requested
    pub cost: f64,
    /// Merge membership copied from the item at submission
    #[serde(default)]
    pub merge: Option<MergeInfo>,
    /// Attachments serialized as a JSON array
    #[serde(default)]
    pub attachments: Option<String>,
    /// Invoice number
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Rejection reason
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Who rejected the request
    #[serde(default)]
    pub rejected_by: Option<String>,
    /// When the request was rejected
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
}

/// A payment request without a store id, as sent by `insert`/`upsert`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestDraft {
    /// Line item this request pays for
    pub line_item_id: String,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
    /// Initial review state
    pub verification_status: VerificationStatus,
    /// Amount requested
    pub cost: f64,
    /// Merge membership
    pub merge: Option<MergeInfo>,
    /// Attachments serialized as a JSON array
    pub attachments: Option<String>,
    /// Invoice number
    pub invoice_number: Option<String>,
    /// Rejection reason (always cleared on submission)
    pub rejection_reason: Option<String>,
    /// Rejector (always cleared on submission)
    pub rejected_by: Option<String>,
    /// Rejection time (always cleared on submission)
    pub rejected_at: Option<DateTime<Utc>>,
}

impl RequestDraft {
    /// Materialize a record under the given store id
    pub fn into_request(self, id: String) -> PaymentRequest {
        PaymentRequest {
            id,
            line_item_id: self.line_item_id,
            submitted_at: self.submitted_at,
            verification_status: self.verification_status,
            cost: self.cost,
            merge: self.merge,
            attachments: self.attachments,
            invoice_number: self.invoice_number,
            rejection_reason: self.rejection_reason,
            rejected_by: self.rejected_by,
            rejected_at: self.rejected_at,
        }
    }
}

/// Partial update for payment request records
///
/// `None` leaves a field untouched; `Some(value)` overwrites it (with
/// `Some(None)` clearing it).
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::option_option)]
pub struct RequestPatch {
    /// New attachments value
    pub attachments: Option<Option<String>>,
    /// New invoice number
    pub invoice_number: Option<Option<String>>,
    /// New merge membership
    pub merge: Option<Option<MergeInfo>>,
}

impl RequestPatch {
    /// Patch that drops attachments and invoice number
    #[must_use]
    pub const fn clear_artifacts() -> Self {
        Self {
            attachments: Some(None),
            invoice_number: Some(None),
            merge: None,
        }
    }

    /// Patch that drops merge membership
    #[must_use]
    pub const fn clear_merge() -> Self {
        Self {
            attachments: None,
            invoice_number: None,
            merge: Some(None),
        }
    }

    /// Also drop merge membership
    #[must_use]
    pub fn and_clear_merge(mut self) -> Self {
        self.merge = Some(None);
        self
    }

    /// Apply this patch to a record
    pub fn apply(&self, request: &mut PaymentRequest) {
        if let Some(attachments) = &self.attachments {
            request.attachments.clone_from(attachments);
        }
        if let Some(invoice_number) = &self.invoice_number {
            request.invoice_number.clone_from(invoice_number);
        }
        if let Some(merge) = &self.merge {
            request.merge.clone_from(merge);
        }
    }
}

/// Which records a `select` returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFilter {
    /// Every record
    All,
    /// Records with these store ids
    Ids(Vec<String>),
    /// Records for these line items
    LineItems(Vec<String>),
}

impl RequestFilter {
    /// Whether a record passes the filter
    pub fn matches(&self, request: &PaymentRequest) -> bool {
        match self {
            Self::All => true,
            Self::Ids(ids) => ids.contains(&request.id),
            Self::LineItems(items) => items.contains(&request.line_item_id),
        }
    }
}

/// Read-only aggregate over items sharing a project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectGroup {
    /// Project id (`unknown` for items without one)
    pub project_id: String,
    /// Project display name
    pub project_name: String,
    /// Client display name
    pub client_name: Option<String>,
    /// Member items in input order
    pub items: Vec<PaymentItem>,
    /// Sum of member costs
    pub total_cost: f64,
    /// Members with an attachment or a valid invoice number
    pub ready_items: usize,
    /// Number of members
    pub total_items: usize,
    /// UI expand/collapse flag
    pub expanded: bool,
    /// Whether any member carries a rejection reason
    pub has_rejected: bool,
}

impl ProjectGroup {
    /// Ready share of the group as a rounded percentage
    ///
    /// Returns 0 for an empty group.
    pub fn completion_percentage(&self) -> u32 {
        completion_percentage(self.ready_items, self.total_items)
    }
}

/// `round(ready / total * 100)`, or 0 when `total` is 0
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn completion_percentage(ready: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (ready as f64 / total as f64 * 100.0).round() as u32
}
