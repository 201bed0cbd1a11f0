//! Per-subject monitoring sessions and the registry that owns them.

mod pipeline;
pub mod registry;
pub mod report;
pub mod session;

pub use registry::MonitorRegistry;
pub use report::EvaluationReport;
pub use session::{MonitorSession, SessionHandle};
