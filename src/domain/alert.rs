//! Alert candidates and the notification records built from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{category::Category, common::SubjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold condition an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    OverallApproaching,
    OverallExceeded,
    CategoryExceeded(Category),
    PerformingWell,
    SavingTip,
}

impl AlertKind {
    /// Stable deduplication key for this condition within a period.
    pub fn identity(&self) -> AlertIdentity {
        match self {
            AlertKind::OverallApproaching => AlertIdentity::new("overall-80"),
            AlertKind::OverallExceeded => AlertIdentity::new("overall-100"),
            AlertKind::CategoryExceeded(category) => {
                AlertIdentity::new(format!("{category}-100"))
            }
            AlertKind::PerformingWell => AlertIdentity::new("performing-well"),
            AlertKind::SavingTip => AlertIdentity::new("saving-tip"),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::OverallApproaching
            | AlertKind::OverallExceeded
            | AlertKind::CategoryExceeded(_) => Severity::Warning,
            AlertKind::PerformingWell => Severity::Success,
            AlertKind::SavingTip => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertIdentity(String);

impl AlertIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for AlertIdentity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A computed, not yet deduplicated potential alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCandidate {
    pub identity: AlertIdentity,
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl AlertCandidate {
    pub fn new(kind: AlertKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            identity: kind.identity(),
            kind,
            severity: kind.severity(),
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn to_record(&self, recipient: &SubjectId, created_at: DateTime<Utc>) -> NotificationRecord {
        NotificationRecord {
            recipient: recipient.clone(),
            identity: self.identity.clone(),
            title: self.title.clone(),
            message: self.body.clone(),
            severity: self.severity,
            created_at,
        }
    }
}

/// Row handed to the notification store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub recipient: SubjectId,
    pub identity: AlertIdentity,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}
