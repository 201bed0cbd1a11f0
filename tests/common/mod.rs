#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use budget_monitor::{
    config::MonitorConfig,
    core::{Clock, ManualClock},
    domain::{BudgetConfig, Category, Expense, SubjectId},
    monitor::MonitorSession,
    notifications::{InMemoryNotificationStore, NotificationSink},
};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that survives until the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// Noon on the given day, far from any period edge.
pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    at(year, month, day, 12, 0)
}

pub fn expense(amount: f64, category: Category, date: DateTime<Utc>) -> Expense {
    Expense::new(amount, category, date).expect("valid expense")
}

pub fn budget_1000() -> BudgetConfig {
    BudgetConfig::new(1000.0)
}

pub struct Harness {
    pub subject: SubjectId,
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryNotificationStore>,
    pub session: MonitorSession,
}

/// Starts a session for `user-1` backed by an in-memory store and a manual clock.
pub fn start_session(now: DateTime<Utc>, config: MonitorConfig) -> Harness {
    let subject = SubjectId::new("user-1");
    let clock = Arc::new(ManualClock::new(now));
    let store = Arc::new(InMemoryNotificationStore::new());
    let sink: Arc<dyn NotificationSink> = store.clone();
    let session_clock: Arc<dyn Clock> = clock.clone();
    let session = MonitorSession::start(subject.clone(), sink, session_clock, config)
        .expect("start monitoring session");
    Harness {
        subject,
        clock,
        store,
        session,
    }
}
