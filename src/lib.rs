//! payq - payment-item grouping and merge reconciliation
//!
//! Partitions billable line items into project groups with readiness
//! metrics, merges items that share a payee bank account into a single
//! payment request led by one item, and submits or unmerges them against
//! a backing store without letting local and remote state drift apart.

pub mod config;
pub mod error;
pub mod grouping;
pub mod merge;
pub mod notify;
pub mod session;
pub mod store;
pub mod submit;
pub mod types;
