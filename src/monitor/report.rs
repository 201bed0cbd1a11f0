use chrono::{DateTime, Utc};

use crate::{
    domain::{AlertIdentity, SubjectId},
    errors::DeliveryError,
};

/// Outcome of one evaluation pass for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub subject: SubjectId,
    pub period_start: DateTime<Utc>,
    /// True when the expense list was empty and nothing was evaluated.
    pub skipped: bool,
    pub candidates: Vec<AlertIdentity>,
    /// Delivered successfully during this pass.
    pub fired: Vec<AlertIdentity>,
    /// Already reported earlier in the period.
    pub suppressed: Vec<AlertIdentity>,
    pub failed: Vec<(AlertIdentity, DeliveryError)>,
}

impl EvaluationReport {
    pub(crate) fn new(subject: SubjectId, period_start: DateTime<Utc>) -> Self {
        Self {
            subject,
            period_start,
            skipped: false,
            candidates: Vec::new(),
            fired: Vec::new(),
            suppressed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn delivery_attempts(&self) -> usize {
        self.fired.len() + self.failed.len()
    }

    pub fn fired_identity(&self, identity: &str) -> bool {
        self.fired.iter().any(|fired| fired.as_str() == identity)
    }
}
