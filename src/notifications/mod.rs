//! Delivery of fired alerts to the external notification store.

pub mod json_store;
pub mod memory;

use async_trait::async_trait;

use crate::{domain::NotificationRecord, errors::DeliveryError};

/// Persists or forwards one notification.
///
/// Each call stands alone: a failure for one record must not affect others.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, record: &NotificationRecord) -> Result<(), DeliveryError>;
}

pub use json_store::JsonNotificationStore;
pub use memory::InMemoryNotificationStore;
