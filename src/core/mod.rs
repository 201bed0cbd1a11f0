//! Period math, deduplication, and the pure evaluation services.

pub mod clock;
pub mod dedup;
pub mod period;
pub mod services;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dedup::{DedupGate, DedupState};
pub use period::{CalendarMode, MonitoringPeriod, PeriodClock};
