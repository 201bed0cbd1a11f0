use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::{
    domain::{AlertIdentity, NotificationRecord, SubjectId},
    errors::DeliveryError,
};

use super::NotificationSink;

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<NotificationRecord>,
    attempts: usize,
    fail_all: bool,
    failing: HashSet<AlertIdentity>,
}

/// Notification store kept in process memory, with switchable failures.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    state: Mutex<StoreState>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.lock().records.clone()
    }

    pub fn records_for(&self, subject: &SubjectId) -> Vec<NotificationRecord> {
        self.lock()
            .records
            .iter()
            .filter(|record| &record.recipient == subject)
            .cloned()
            .collect()
    }

    pub fn identities(&self) -> Vec<AlertIdentity> {
        self.lock()
            .records
            .iter()
            .map(|record| record.identity.clone())
            .collect()
    }

    /// Number of delivery calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().fail_all = unreachable;
    }

    pub fn reject_identity(&self, identity: AlertIdentity) {
        self.lock().failing.insert(identity);
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.fail_all = false;
        state.failing.clear();
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationStore {
    async fn deliver(&self, record: &NotificationRecord) -> Result<(), DeliveryError> {
        let mut state = self.lock();
        state.attempts += 1;
        if state.fail_all {
            return Err(DeliveryError::Unreachable("in-memory store offline".into()));
        }
        if state.failing.contains(&record.identity) {
            return Err(DeliveryError::Rejected(format!(
                "write refused for {}",
                record.identity
            )));
        }
        state.records.push(record.clone());
        Ok(())
    }
}
