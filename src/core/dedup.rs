//! Per-subject record of which alerts already fired this period.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AlertCandidate, AlertIdentity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupState {
    pub period_start: DateTime<Utc>,
    pub fired: BTreeSet<AlertIdentity>,
}

impl DedupState {
    pub fn new(period_start: DateTime<Utc>) -> Self {
        Self {
            period_start,
            fired: BTreeSet::new(),
        }
    }
}

/// Sole authority on whether an alert was already reported in the current period.
///
/// A gate belongs to exactly one subject and is never shared.
#[derive(Debug, Clone)]
pub struct DedupGate {
    state: DedupState,
}

impl DedupGate {
    pub fn new(period_start: DateTime<Utc>) -> Self {
        Self {
            state: DedupState::new(period_start),
        }
    }

    pub fn period_start(&self) -> DateTime<Utc> {
        self.state.period_start
    }

    pub fn state(&self) -> &DedupState {
        &self.state
    }

    /// Returns true and records the identity when it has not fired this period.
    pub fn should_fire(&mut self, candidate: &AlertCandidate) -> bool {
        self.state.fired.insert(candidate.identity.clone())
    }

    pub fn has_fired(&self, identity: &AlertIdentity) -> bool {
        self.state.fired.contains(identity)
    }

    pub fn record(&mut self, identity: AlertIdentity) {
        self.state.fired.insert(identity);
    }

    pub fn reset(&mut self, new_period_start: DateTime<Utc>) {
        self.state.fired.clear();
        self.state.period_start = new_period_start;
    }

    /// Resets when `period_start` lies after the tracked period. Returns whether it did.
    pub fn advance_to(&mut self, period_start: DateTime<Utc>) -> bool {
        if period_start > self.state.period_start {
            self.reset(period_start);
            true
        } else {
            false
        }
    }
}
