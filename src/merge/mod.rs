//! Merge engine for payment items
//!
//! Merging links items paid into the same bank account so they travel as a
//! single payment request, tracked through a leader item.
//!
//! Same three-phase shape as submission:
//! 1. Select - candidates are toggled on a [`MergeCoordinator`]
//! 2. Plan - pure functions compute the resulting collection
//! 3. Execute - unmerge persists to the store before local state changes

mod coordinator;
mod execute;
mod plan;

pub use coordinator::{DEFAULT_MERGE_PALETTE, MergeCoordinator};
pub use execute::execute_unmerge;
pub(crate) use plan::group_leader;
pub use plan::{UnmergePlan, apply_merge, pick_merge_color, plan_unmerge};
