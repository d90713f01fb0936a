//! Project grouping - pure projection of items into display groups
//!
//! Nothing here mutates or persists. Groups are re-derived from the
//! current item snapshot every time they are needed.

use crate::types::{PaymentItem, ProjectGroup};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Project id used for items without a project
pub const UNKNOWN_PROJECT_ID: &str = "unknown";

/// Display name used for items without a project
pub const UNKNOWN_PROJECT_NAME: &str = "Unknown project";

static INVOICE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}-[0-9]{8}$").expect("invoice pattern is valid"));

/// Check an invoice number against the `AB-12345678` format
pub fn is_valid_invoice_format(invoice_number: &str) -> bool {
    INVOICE_FORMAT.is_match(invoice_number)
}

/// Whether an item is ready for submission
///
/// An item is ready when it has at least one attachment OR a validly
/// formatted invoice number. Either artifact is enough.
pub fn is_ready(item: &PaymentItem) -> bool {
    is_ready_with(item, is_valid_invoice_format)
}

/// [`is_ready`] with a caller-supplied invoice validator
pub fn is_ready_with(item: &PaymentItem, validate_invoice: impl Fn(&str) -> bool) -> bool {
    !item.attachments.is_empty()
        || item
            .invoice_number
            .as_deref()
            .is_some_and(|invoice| validate_invoice(invoice))
}

/// Partition items into project groups (PURE)
///
/// Every item lands in exactly one group; items without a project share
/// the synthetic [`UNKNOWN_PROJECT_ID`] group. Groups containing a
/// rejected item come first, the rest are ordered by project name.
/// Callers should present this order as-is.
pub fn group_by_project(items: &[PaymentItem]) -> Vec<ProjectGroup> {
    group_by_project_with(items, is_valid_invoice_format)
}

/// [`group_by_project`] with a caller-supplied invoice validator
pub fn group_by_project_with(
    items: &[PaymentItem],
    validate_invoice: impl Fn(&str) -> bool,
) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    // Keyed on the raw option so a real project named "unknown" stays
    // apart from the synthetic group.
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for item in items {
        let key = item.project_id.as_deref();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(empty_group(key.unwrap_or(UNKNOWN_PROJECT_ID), item));
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.total_cost += item.cost_or_zero();
        group.total_items += 1;
        if is_ready_with(item, &validate_invoice) {
            group.ready_items += 1;
        }
        if item.rejection_reason.is_some() {
            group.has_rejected = true;
        }
        if group.client_name.is_none() {
            group.client_name.clone_from(&item.client_name);
        }
        group.items.push(item.clone());
    }

    groups.sort_by(compare_groups);
    groups
}

fn empty_group(project_id: &str, first: &PaymentItem) -> ProjectGroup {
    let project_name = if first.project_id.is_none() {
        UNKNOWN_PROJECT_NAME.to_string()
    } else {
        first
            .project_name
            .clone()
            .unwrap_or_else(|| project_id.to_string())
    };

    ProjectGroup {
        project_id: project_id.to_string(),
        project_name,
        client_name: None,
        items: Vec::new(),
        total_cost: 0.0,
        ready_items: 0,
        total_items: 0,
        expanded: false,
        has_rejected: false,
    }
}

/// Lowercased name with accents stripped, so "Écran" sorts with "ecran"
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Rejected groups first, then case- and accent-insensitive name order
fn compare_groups(a: &ProjectGroup, b: &ProjectGroup) -> Ordering {
    b.has_rejected
        .cmp(&a.has_rejected)
        .then_with(|| collation_key(&a.project_name).cmp(&collation_key(&b.project_name)))
        .then_with(|| a.project_name.cmp(&b.project_name))
        .then_with(|| a.project_id.cmp(&b.project_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attachment;

    fn item(id: &str, project: Option<&str>, name: &str) -> PaymentItem {
        let mut item = PaymentItem::new(id, project.map(String::from));
        item.project_name = Some(name.to_string());
        item
    }

    #[test]
    fn test_invoice_format() {
        assert!(is_valid_invoice_format("AB-12345678"));
        assert!(is_valid_invoice_format("xy-00000000"));
        assert!(!is_valid_invoice_format("AB12345678"));
        assert!(!is_valid_invoice_format("AB-1234567"));
        assert!(!is_valid_invoice_format("A1-12345678"));
        assert!(!is_valid_invoice_format(" AB-12345678"));
        // Arabic-Indic and fullwidth digits
        assert!(!is_valid_invoice_format(
            "AB-\u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}\u{668}"
        ));
        assert!(!is_valid_invoice_format("AB-\u{ff11}2345678"));
    }

    #[test]
    fn test_ready_by_attachment_only() {
        let mut it = item("1", Some("p"), "P");
        it.attachments.push(Attachment {
            name: "receipt.pdf".to_string(),
            url: "https://files/receipt.pdf".to_string(),
            path: "p/receipt.pdf".to_string(),
        });
        assert!(is_ready(&it));
    }

    #[test]
    fn test_ready_by_invoice_only() {
        let mut it = item("1", Some("p"), "P");
        it.invoice_number = Some("AB-12345678".to_string());
        assert!(is_ready(&it));
    }

    #[test]
    fn test_not_ready_with_malformed_invoice() {
        let mut it = item("1", Some("p"), "P");
        it.invoice_number = Some("AB-123".to_string());
        assert!(!is_ready(&it));
    }

    #[test]
    fn test_custom_validator_is_used() {
        let mut it = item("1", Some("p"), "P");
        it.invoice_number = Some("anything".to_string());
        assert!(is_ready_with(&it, |_| true));
        assert!(!is_ready_with(&it, |_| false));
    }

    #[test]
    fn test_unknown_project_group() {
        let groups = group_by_project(&[PaymentItem::new("1", None), PaymentItem::new("2", None)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].project_id, UNKNOWN_PROJECT_ID);
        assert_eq!(groups[0].project_name, UNKNOWN_PROJECT_NAME);
        assert_eq!(groups[0].total_items, 2);
    }

    #[test]
    fn test_name_order_ignores_case() {
        let groups = group_by_project(&[
            item("1", Some("b"), "banana"),
            item("2", Some("a"), "Apple"),
            item("3", Some("c"), "Cherry"),
        ]);
        let names: Vec<&str> = groups.iter().map(|g| g.project_name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "banana", "Cherry"]);
    }

    #[test]
    fn test_name_order_ignores_accents() {
        let groups = group_by_project(&[
            item("1", Some("z"), "Zebra"),
            item("2", Some("e"), "Écran"),
            item("3", Some("a"), "atelier"),
        ]);
        let names: Vec<&str> = groups.iter().map(|g| g.project_name.as_str()).collect();
        assert_eq!(names, vec!["atelier", "Écran", "Zebra"]);
    }

    #[test]
    fn test_project_named_unknown_is_not_merged_with_missing_project() {
        let groups = group_by_project(&[
            item("1", Some(UNKNOWN_PROJECT_ID), "Real Project"),
            PaymentItem::new("2", None),
        ]);
        assert_eq!(groups.len(), 2);
        let real = groups.iter().find(|g| g.project_name == "Real Project").unwrap();
        assert_eq!(real.total_items, 1);
        assert_eq!(real.items[0].id, "1");
        let synthetic = groups
            .iter()
            .find(|g| g.project_name == UNKNOWN_PROJECT_NAME)
            .unwrap();
        assert_eq!(synthetic.total_items, 1);
        assert_eq!(synthetic.items[0].id, "2");
    }
}
