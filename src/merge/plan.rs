//! Merge planning - pure functions over an item snapshot
//!
//! No I/O happens here. Each function takes the current collection and
//! returns a new one, leaving the input untouched.

use crate::error::{Error, Result};
use crate::types::{MergeInfo, MergeType, PaymentItem};
use std::collections::HashSet;

/// Pick the color for a new merge group
///
/// Indexes the palette by the number of distinct groups already present,
/// wrapping around. Once there are more groups than colors, unrelated
/// groups can share a color.
pub fn pick_merge_color(items: &[PaymentItem], palette: &[String]) -> Option<String> {
    if palette.is_empty() {
        return None;
    }
    let active: HashSet<&str> = items.iter().filter_map(PaymentItem::merge_group_id).collect();
    Some(palette[active.len() % palette.len()].clone())
}

/// Build the collection after merging `candidates` into one group
///
/// The first candidate becomes leader. Attachments held by the other
/// candidates move onto the leader (skipping storage paths it already
/// has), and the leader adopts the first non-leader invoice number if it
/// has none. Items outside `candidates` are copied unchanged.
pub fn apply_merge(
    items: &[PaymentItem],
    candidates: &[String],
    merge_type: MergeType,
    group_id: &str,
    color: &str,
) -> Vec<PaymentItem> {
    let mut moved_attachments = Vec::new();
    let mut moved_invoice = None;
    for id in candidates.iter().skip(1) {
        if let Some(item) = items.iter().find(|i| &i.id == id) {
            moved_attachments.extend(item.attachments.iter().cloned());
            if moved_invoice.is_none() {
                moved_invoice.clone_from(&item.invoice_number);
            }
        }
    }

    items
        .iter()
        .map(|item| {
            let Some(position) = candidates.iter().position(|c| c == &item.id) else {
                return item.clone();
            };

            let mut merged = item.clone();
            let is_leader = position == 0;
            if is_leader {
                for attachment in &moved_attachments {
                    if !merged.attachments.iter().any(|a| a.path == attachment.path) {
                        merged.attachments.push(attachment.clone());
                    }
                }
                if merged.invoice_number.is_none() {
                    merged.invoice_number.clone_from(&moved_invoice);
                }
            } else {
                merged.attachments.clear();
                merged.invoice_number = None;
            }

            merged.merge = Some(MergeInfo {
                merge_type,
                group_id: group_id.to_string(),
                is_leader,
                color: color.to_string(),
            });
            merged
        })
        .collect()
}

/// Unmerge plan - what to persist and what the collection becomes
#[derive(Debug, Clone)]
pub struct UnmergePlan {
    /// Group being dissolved
    pub group_id: String,
    /// Leader item id
    pub leader_id: String,
    /// Leader's persisted request, if it has been submitted
    pub leader_request_id: Option<String>,
    /// Non-leader item ids
    pub member_ids: Vec<String>,
    /// Persisted requests of non-leaders that have been submitted
    pub member_request_ids: Vec<String>,
    /// Collection after the unmerge
    pub items: Vec<PaymentItem>,
}

impl UnmergePlan {
    /// Whether any remote record needs updating
    pub const fn touches_store(&self) -> bool {
        self.leader_request_id.is_some() || !self.member_request_ids.is_empty()
    }
}

/// The single leader among a group's `members`
///
/// Zero or several leaders is an [`Error::Consistency`].
pub(crate) fn group_leader<'a>(
    members: &[&'a PaymentItem],
    group_id: &str,
) -> Result<&'a PaymentItem> {
    let mut leaders = members.iter().copied().filter(|i| i.is_merge_leader());
    match (leaders.next(), leaders.count()) {
        (Some(leader), 0) => Ok(leader),
        (None, _) => Err(Error::Consistency(format!(
            "merge group '{group_id}' has no leader"
        ))),
        (Some(_), rest) => Err(Error::Consistency(format!(
            "merge group '{group_id}' has {} leaders",
            rest + 1
        ))),
    }
}

/// Plan dissolving a merge group (PURE)
///
/// Fails with [`Error::MergeGroupNotFound`] if no item carries `group_id`
/// and with [`Error::Consistency`] unless exactly one member is leader.
pub fn plan_unmerge(items: &[PaymentItem], group_id: &str) -> Result<UnmergePlan> {
    let members: Vec<&PaymentItem> = items
        .iter()
        .filter(|i| i.merge_group_id() == Some(group_id))
        .collect();

    if members.is_empty() {
        return Err(Error::MergeGroupNotFound(group_id.to_string()));
    }

    let leader = group_leader(&members, group_id)?;

    let non_leaders: Vec<&PaymentItem> = members
        .iter()
        .copied()
        .filter(|i| i.id != leader.id)
        .collect();

    let result = items
        .iter()
        .map(|item| {
            if item.merge_group_id() != Some(group_id) {
                return item.clone();
            }
            let mut released = item.clone();
            released.merge = None;
            if released.id != leader.id {
                released.attachments.clear();
                released.invoice_number = None;
            }
            released
        })
        .collect();

    Ok(UnmergePlan {
        group_id: group_id.to_string(),
        leader_id: leader.id.clone(),
        leader_request_id: leader.request_id.clone(),
        member_ids: non_leaders.iter().map(|i| i.id.clone()).collect(),
        member_request_ids: non_leaders
            .iter()
            .filter_map(|i| i.request_id.clone())
            .collect(),
        items: result,
    })
}
