//! Shared test fixtures

#![allow(dead_code)]

mod mock_store;

pub use mock_store::{MockPaymentStore, UpdateCall};

use chrono::{TimeZone, Utc};
use payq::notify::{Notice, NoticeLevel, Notifier};
use payq::types::{
    Attachment, MergeInfo, MergeType, PayeeAccount, PaymentItem, PaymentRequest,
    VerificationStatus,
};
use std::sync::Mutex;

/// Notifier that records every notice
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn has_level(&self, level: NoticeLevel) -> bool {
        self.notices().iter().any(|n| n.level == level)
    }

    pub fn assert_error_containing(&self, needle: &str) {
        let notices = self.notices();
        assert!(
            notices
                .iter()
                .any(|n| n.level == NoticeLevel::Error && n.message.contains(needle)),
            "Expected error notice containing '{needle}' but got: {notices:?}"
        );
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Bank account with the given number
pub fn account(number: &str) -> PayeeAccount {
    PayeeAccount {
        bank_name: "First Commercial Bank".to_string(),
        account_number: number.to_string(),
        account_holder: "Lighthouse Studio".to_string(),
        branch: Some("Downtown".to_string()),
    }
}

/// Attachment stored at `path`
pub fn attachment(path: &str) -> Attachment {
    Attachment {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        url: format!("https://files.example.com/{path}"),
        path: path.to_string(),
    }
}

/// Item in project `project` with a display name derived from it
pub fn make_item(id: &str, project: &str, cost: f64) -> PaymentItem {
    let mut item = PaymentItem::new(id, Some(project.to_string()));
    item.project_name = Some(format!("Project {project}"));
    item.cost = Some(cost);
    item
}

/// Item paid into `account_number`
pub fn make_payee_item(id: &str, account_number: &str) -> PaymentItem {
    let mut item = make_item(id, "p1", 100.0);
    item.payee = Some(account(account_number));
    item
}

/// Mark `item` as a member of `group_id`
pub fn in_group(mut item: PaymentItem, group_id: &str, is_leader: bool) -> PaymentItem {
    item.merge = Some(MergeInfo {
        merge_type: MergeType::Account,
        group_id: group_id.to_string(),
        is_leader,
        color: "blue".to_string(),
    });
    item
}

/// Persisted request for `line_item_id` under `id`
pub fn make_request(id: &str, line_item_id: &str) -> PaymentRequest {
    PaymentRequest {
        id: id.to_string(),
        line_item_id: line_item_id.to_string(),
        submitted_at: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
        verification_status: VerificationStatus::Pending,
        cost: 100.0,
        merge: None,
        attachments: None,
        invoice_number: None,
        rejection_reason: None,
        rejected_by: None,
        rejected_at: None,
    }
}
