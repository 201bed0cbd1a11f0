#![doc(test(attr(deny(warnings))))]

//! Budget Monitor watches a subject's expenses against monthly budget limits
//! and raises each threshold alert at most once per calendar month.
//!
//! A host application starts a [`monitor::MonitorSession`] (or lets a
//! [`monitor::MonitorRegistry`] do it) per user and reports every change to the
//! expense list or budget. Each change runs aggregation, threshold evaluation,
//! deduplication, and delivery to a [`notifications::NotificationSink`]. Dedup
//! state clears on the calendar boundary, driven by the session's own timer.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod monitor;
pub mod notifications;
pub mod utils;

use std::sync::Once;

pub use errors::{DeliveryError, MonitorError, MonitorResult};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Monitor tracing initialized.");
    });
}
