//! Submission engine for payment items
//!
//! Three-phase pattern matching merge/:
//! 1. Validate - selection and cost preconditions (pure)
//! 2. Plan - one upsert per selected item, artifacts taken from the merge
//!    leader (pure, testable)
//! 3. Execute - concurrent upserts, then refetch (effectful)

mod execute;
mod plan;

pub use execute::{
    SubmissionReport, apply_request_state, execute_submission, refetch_items, submit,
};
pub use plan::{SubmissionPlan, create_submission_plan, effective_artifact_source};
