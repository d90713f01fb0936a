//! Mock payment store for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use payq::error::{Error, Result};
use payq::store::PaymentStore;
use payq::types::{PaymentRequest, RequestDraft, RequestFilter, RequestPatch};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `update`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCall {
    pub ids: Vec<String>,
    pub patch: RequestPatch,
}

/// In-memory mock store
///
/// Features:
/// - Auto-incrementing request ids (`req-1`, `req-2`, ...)
/// - Call tracking for verification
/// - Error injection per operation, or per line item for upserts
pub struct MockPaymentStore {
    next_id: AtomicU64,
    records: Mutex<Vec<PaymentRequest>>,
    // Call tracking
    select_calls: Mutex<Vec<RequestFilter>>,
    update_calls: Mutex<Vec<UpdateCall>>,
    upsert_calls: Mutex<Vec<RequestDraft>>,
    // Error injection
    error_on_select: Mutex<Option<String>>,
    error_on_update: Mutex<Option<String>>,
    error_on_update_call: Mutex<Option<(usize, String)>>,
    error_on_upsert_for: Mutex<Vec<(String, String)>>,
}

impl MockPaymentStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            records: Mutex::new(Vec::new()),
            select_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            upsert_calls: Mutex::new(Vec::new()),
            error_on_select: Mutex::new(None),
            error_on_update: Mutex::new(None),
            error_on_update_call: Mutex::new(None),
            error_on_upsert_for: Mutex::new(Vec::new()),
        }
    }

    /// Seed an existing record
    pub fn seed(&self, record: PaymentRequest) {
        self.records.lock().unwrap().push(record);
    }

    // === Error injection methods ===

    /// Make every `select` fail
    pub fn fail_select(&self, msg: &str) {
        *self.error_on_select.lock().unwrap() = Some(msg.to_string());
    }

    /// Make every `update` fail
    pub fn fail_update(&self, msg: &str) {
        *self.error_on_update.lock().unwrap() = Some(msg.to_string());
    }

    /// Make only the nth (0-based) `update` call fail
    pub fn fail_update_call(&self, index: usize, msg: &str) {
        *self.error_on_update_call.lock().unwrap() = Some((index, msg.to_string()));
    }

    /// Make `upsert` fail for one line item
    pub fn fail_upsert_for(&self, line_item_id: &str, msg: &str) {
        self.error_on_upsert_for
            .lock()
            .unwrap()
            .push((line_item_id.to_string(), msg.to_string()));
    }

    // === Call verification methods ===

    /// All stored records
    pub fn records(&self) -> Vec<PaymentRequest> {
        self.records.lock().unwrap().clone()
    }

    /// Record for a line item
    pub fn record_for(&self, line_item_id: &str) -> Option<PaymentRequest> {
        self.records()
            .into_iter()
            .find(|r| r.line_item_id == line_item_id)
    }

    /// All `select` calls
    pub fn get_select_calls(&self) -> Vec<RequestFilter> {
        self.select_calls.lock().unwrap().clone()
    }

    /// All `update` calls
    pub fn get_update_calls(&self) -> Vec<UpdateCall> {
        self.update_calls.lock().unwrap().clone()
    }

    /// All `upsert` calls
    pub fn get_upsert_calls(&self) -> Vec<RequestDraft> {
        self.upsert_calls.lock().unwrap().clone()
    }

    /// Assert that the store was never written to
    pub fn assert_no_writes(&self) {
        let updates = self.get_update_calls();
        let upserts = self.get_upsert_calls();
        assert!(
            updates.is_empty() && upserts.is_empty(),
            "Expected no writes but got updates: {updates:?}, upserts: {upserts:?}"
        );
    }
}

#[async_trait]
impl PaymentStore for MockPaymentStore {
    async fn select(&self, filter: &RequestFilter) -> Result<Vec<PaymentRequest>> {
        self.select_calls.lock().unwrap().push(filter.clone());

        if let Some(msg) = self.error_on_select.lock().unwrap().as_ref() {
            return Err(Error::RemotePersistence(msg.clone()));
        }

        let records = self.records.lock().unwrap();
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn update(&self, ids: &[String], patch: &RequestPatch) -> Result<usize> {
        let call_index = {
            let mut calls = self.update_calls.lock().unwrap();
            calls.push(UpdateCall {
                ids: ids.to_vec(),
                patch: patch.clone(),
            });
            calls.len() - 1
        };

        if let Some(msg) = self.error_on_update.lock().unwrap().as_ref() {
            return Err(Error::RemotePersistence(msg.clone()));
        }
        if let Some((index, msg)) = self.error_on_update_call.lock().unwrap().as_ref() {
            if *index == call_index {
                return Err(Error::RemotePersistence(msg.clone()));
            }
        }

        let mut records = self.records.lock().unwrap();
        if let Some(missing) = ids.iter().find(|id| !records.iter().any(|r| &r.id == *id)) {
            return Err(Error::RemotePersistence(format!(
                "payment request '{missing}' does not exist"
            )));
        }
        let mut updated = 0;
        for record in records.iter_mut().filter(|r| ids.contains(&r.id)) {
            patch.apply(record);
            updated += 1;
        }
        Ok(updated)
    }

    async fn insert(&self, draft: RequestDraft) -> Result<PaymentRequest> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.line_item_id == draft.line_item_id) {
            return Err(Error::RemotePersistence(format!(
                "line item '{}' already has a payment request",
                draft.line_item_id
            )));
        }
        let id = format!("req-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = draft.into_request(id);
        records.push(record.clone());
        Ok(record)
    }

    async fn upsert(&self, draft: RequestDraft) -> Result<PaymentRequest> {
        self.upsert_calls.lock().unwrap().push(draft.clone());

        if let Some((_, msg)) = self
            .error_on_upsert_for
            .lock()
            .unwrap()
            .iter()
            .find(|(item, _)| *item == draft.line_item_id)
        {
            return Err(Error::RemotePersistence(msg.clone()));
        }

        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.line_item_id == draft.line_item_id)
        {
            *existing = draft.into_request(existing.id.clone());
            return Ok(existing.clone());
        }
        let id = format!("req-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = draft.into_request(id);
        records.push(record.clone());
        Ok(record)
    }
}
