//! Merge coordinator - selection state and the editing session's items

use crate::error::{Error, Result};
use crate::grouping::group_by_project;
use crate::merge::execute::execute_unmerge;
use crate::merge::plan::{apply_merge, pick_merge_color, plan_unmerge};
use crate::notify::{Notice, Notifier};
use crate::store::PaymentStore;
use crate::submit::{SubmissionReport, refetch_items, submit};
use crate::types::{MergeType, PaymentItem, ProjectGroup};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Colors cycled through for new merge groups
pub const DEFAULT_MERGE_PALETTE: [&str; 6] = ["blue", "green", "purple", "orange", "pink", "teal"];

/// Owner of the in-memory item collection during an editing session
///
/// Holds merge-candidate selection and merge mode. The collection is only
/// ever replaced wholesale, so a snapshot taken with [`items`] is never
/// observed half-updated.
///
/// [`items`]: Self::items
#[derive(Debug, Clone)]
pub struct MergeCoordinator {
    items: Arc<Vec<PaymentItem>>,
    selected_for_merge: Vec<String>,
    merge_mode: bool,
    merge_type: MergeType,
    palette: Vec<String>,
}

impl MergeCoordinator {
    /// Create a coordinator over `items` using the default palette
    pub fn new(items: Vec<PaymentItem>) -> Self {
        let palette = DEFAULT_MERGE_PALETTE.iter().map(ToString::to_string).collect();
        Self::with_palette(items, palette)
    }

    /// Create a coordinator with a custom palette
    ///
    /// An empty palette falls back to [`DEFAULT_MERGE_PALETTE`].
    pub fn with_palette(items: Vec<PaymentItem>, palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_MERGE_PALETTE.iter().map(ToString::to_string).collect()
        } else {
            palette
        };
        Self {
            items: Arc::new(items),
            selected_for_merge: Vec::new(),
            merge_mode: false,
            merge_type: MergeType::Account,
            palette,
        }
    }

    /// Snapshot of the current collection
    pub fn items(&self) -> Arc<Vec<PaymentItem>> {
        Arc::clone(&self.items)
    }

    /// Project groups derived from the current collection
    pub fn groups(&self) -> Vec<ProjectGroup> {
        group_by_project(&self.items)
    }

    /// Look up an item by id
    pub fn item(&self, item_id: &str) -> Option<&PaymentItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Whether merge mode is on
    pub const fn merge_mode(&self) -> bool {
        self.merge_mode
    }

    /// Merge candidates in selection order
    pub fn selected_for_merge(&self) -> &[String] {
        &self.selected_for_merge
    }

    /// Install a freshly fetched collection
    ///
    /// Merge candidates that no longer exist are dropped.
    pub fn replace_items(&mut self, items: Vec<PaymentItem>) {
        self.selected_for_merge
            .retain(|id| items.iter().any(|i| &i.id == id));
        self.items = Arc::new(items);
    }

    /// Flip merge mode; always clears merge candidates
    pub fn toggle_merge_mode(&mut self) {
        self.merge_mode = !self.merge_mode;
        self.selected_for_merge.clear();
        debug!(merge_mode = self.merge_mode, "Toggled merge mode");
    }

    /// Add or remove a merge candidate
    ///
    /// Compatibility is not checked here; callers gate eligibility with
    /// [`can_merge_with`](Self::can_merge_with).
    pub fn toggle_candidate(&mut self, item_id: &str, included: bool) {
        let present = self.selected_for_merge.iter().any(|id| id == item_id);
        if included && !present {
            self.selected_for_merge.push(item_id.to_string());
        } else if !included {
            self.selected_for_merge.retain(|id| id != item_id);
        }
        debug!(item = item_id, included, "Toggled merge candidate");
    }

    /// Whether `item` may join the current candidate set
    ///
    /// Always true with merge mode off or no candidates yet. Otherwise the
    /// item's payee account must equal the first candidate's; a missing
    /// account on either side is never compatible.
    pub fn can_merge_with(&self, item: &PaymentItem) -> bool {
        if !self.merge_mode {
            return true;
        }
        let Some(first_id) = self.selected_for_merge.first() else {
            return true;
        };
        let first_payee = self.item(first_id).and_then(|first| first.payee.as_ref());

        match (first_payee, item.payee.as_ref()) {
            (Some(first), Some(candidate)) => first == candidate,
            _ => false,
        }
    }

    /// Merge the selected candidates into a new group
    ///
    /// The first candidate becomes leader. On success candidates and merge
    /// mode are cleared and the new group id is returned. On failure
    /// nothing changes.
    pub fn merge(&mut self) -> Result<String> {
        if self.selected_for_merge.len() < 2 {
            return Err(Error::Validation(
                "select at least two items to merge".to_string(),
            ));
        }

        let mut candidates = Vec::with_capacity(self.selected_for_merge.len());
        for id in &self.selected_for_merge {
            let item = self
                .item(id)
                .ok_or_else(|| Error::ItemNotFound(id.clone()))?;
            if let Some(group) = item.merge_group_id() {
                return Err(Error::Validation(format!(
                    "item '{id}' already belongs to merge group '{group}'"
                )));
            }
            candidates.push(item);
        }

        let Some(payee) = candidates[0].payee.as_ref() else {
            return Err(Error::Validation(format!(
                "item '{}' has no payee account",
                candidates[0].id
            )));
        };
        if let Some(mismatch) = candidates.iter().find(|c| c.payee.as_ref() != Some(payee)) {
            return Err(Error::Validation(format!(
                "item '{}' is paid to a different account",
                mismatch.id
            )));
        }

        let group_id = self.new_group_id();
        let color = pick_merge_color(&self.items, &self.palette)
            .ok_or_else(|| Error::Internal("merge palette is empty".to_string()))?;
        debug!(group = %group_id, color = %color, "Assigned merge color");

        let merged = apply_merge(
            &self.items,
            &self.selected_for_merge,
            self.merge_type,
            &group_id,
            &color,
        );

        info!(
            group = %group_id,
            leader = %self.selected_for_merge[0],
            members = self.selected_for_merge.len(),
            "Merged payment items"
        );

        self.items = Arc::new(merged);
        self.selected_for_merge.clear();
        self.merge_mode = false;
        Ok(group_id)
    }

    fn new_group_id(&self) -> String {
        loop {
            let candidate = format!("merge-{}", Uuid::new_v4());
            if !self
                .items
                .iter()
                .any(|i| i.merge_group_id() == Some(candidate.as_str()))
            {
                return candidate;
            }
        }
    }

    /// Dissolve a merge group
    ///
    /// Remote records are updated first; the collection is only replaced
    /// once every store call has succeeded. Any failure is reported to
    /// `notifier` and returned, leaving the collection as it was.
    pub async fn unmerge(
        &mut self,
        group_id: &str,
        store: &dyn PaymentStore,
        notifier: &dyn Notifier,
    ) -> Result<()> {
        let plan = match plan_unmerge(&self.items, group_id) {
            Ok(plan) => plan,
            Err(e) => {
                notifier.notify(Notice::error(format!("Cannot unmerge: {e}")));
                return Err(e);
            }
        };

        execute_unmerge(&plan, store, notifier).await?;

        info!(
            group = %group_id,
            leader = %plan.leader_id,
            members = plan.member_ids.len() + 1,
            "Unmerged payment items"
        );
        self.items = Arc::new(plan.items);
        self.selected_for_merge.clear();
        notifier.notify(Notice::success(format!(
            "Unmerged {} item(s)",
            plan.member_ids.len() + 1
        )));
        Ok(())
    }

    /// Set the submission flag on an item
    pub fn set_selected(&mut self, item_id: &str, selected: bool) -> Result<()> {
        if self.item(item_id).is_none() {
            return Err(Error::ItemNotFound(item_id.to_string()));
        }
        let items = self
            .items
            .iter()
            .map(|i| {
                let mut item = i.clone();
                if item.id == item_id {
                    item.selected = selected;
                }
                item
            })
            .collect();
        self.items = Arc::new(items);
        Ok(())
    }

    /// Clear every submission flag
    pub fn clear_selection(&mut self) {
        let items = self
            .items
            .iter()
            .map(|i| PaymentItem {
                selected: false,
                ..i.clone()
            })
            .collect();
        self.items = Arc::new(items);
    }

    /// Submit selected items and install the refreshed collection
    ///
    /// On partial failure the collection is left as it was; call
    /// [`refresh`](Self::refresh) to pick up what did land.
    pub async fn submit(
        &mut self,
        store: &dyn PaymentStore,
        notifier: &dyn Notifier,
    ) -> Result<usize> {
        let SubmissionReport { submitted, items } =
            submit(&self.items, chrono::Utc::now(), store, notifier).await?;
        self.replace_items(items);
        Ok(submitted)
    }

    /// Re-read request state for every item from the store
    pub async fn refresh(&mut self, store: &dyn PaymentStore) -> Result<()> {
        let items = refetch_items(&self.items, store).await?;
        self.replace_items(items);
        Ok(())
    }

    /// [`refresh`](Self::refresh), reporting a failure to `notifier`
    ///
    /// Returns whether the collection was refreshed. On failure it is left
    /// as it was.
    pub async fn refresh_or_warn(
        &mut self,
        store: &dyn PaymentStore,
        notifier: &dyn Notifier,
    ) -> bool {
        match self.refresh(store).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Refresh from store failed");
                notifier.notify(Notice::warning(format!(
                    "Could not refresh from the store: {e}"
                )));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PayeeAccount;

    fn account(number: &str) -> PayeeAccount {
        PayeeAccount {
            bank_name: "First Bank".to_string(),
            account_number: number.to_string(),
            account_holder: "Studio Ltd".to_string(),
            branch: None,
        }
    }

    fn item(id: &str, payee: Option<PayeeAccount>) -> PaymentItem {
        let mut item = PaymentItem::new(id, Some("p1".to_string()));
        item.payee = payee;
        item
    }

    #[test]
    fn test_toggle_merge_mode_clears_candidates() {
        let mut coordinator = MergeCoordinator::new(vec![item("a", None)]);
        coordinator.toggle_merge_mode();
        coordinator.toggle_candidate("a", true);
        coordinator.toggle_merge_mode();
        assert!(!coordinator.merge_mode());
        assert!(coordinator.selected_for_merge().is_empty());
    }

    #[test]
    fn test_toggle_candidate_keeps_insertion_order_without_duplicates() {
        let mut coordinator = MergeCoordinator::new(vec![]);
        coordinator.toggle_candidate("b", true);
        coordinator.toggle_candidate("a", true);
        coordinator.toggle_candidate("b", true);
        assert_eq!(coordinator.selected_for_merge(), ["b", "a"]);
        coordinator.toggle_candidate("b", false);
        assert_eq!(coordinator.selected_for_merge(), ["a"]);
    }

    #[test]
    fn test_first_pick_is_unconstrained() {
        let mut coordinator = MergeCoordinator::new(vec![item("a", None)]);
        coordinator.toggle_merge_mode();
        assert!(coordinator.can_merge_with(&item("a", None)));
    }

    #[test]
    fn test_empty_palette_falls_back_to_default() {
        let coordinator = MergeCoordinator::with_palette(vec![], vec![]);
        assert_eq!(coordinator.palette.len(), DEFAULT_MERGE_PALETTE.len());
    }

    #[test]
    fn test_merge_rejects_missing_payee() {
        let mut coordinator = MergeCoordinator::new(vec![item("a", None), item("b", None)]);
        coordinator.toggle_merge_mode();
        coordinator.toggle_candidate("a", true);
        coordinator.toggle_candidate("b", true);
        let err = coordinator.merge().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(coordinator.items().iter().all(|i| i.merge.is_none()));
    }

    #[test]
    fn test_set_selected_unknown_item() {
        let mut coordinator = MergeCoordinator::new(vec![item("a", Some(account("1")))]);
        assert!(matches!(
            coordinator.set_selected("zzz", true),
            Err(Error::ItemNotFound(_))
        ));
        coordinator.set_selected("a", true).unwrap();
        assert!(coordinator.item("a").unwrap().selected);
        coordinator.clear_selection();
        assert!(!coordinator.item("a").unwrap().selected);
    }
}
