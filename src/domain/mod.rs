pub mod alert;
pub mod budget;
pub mod category;
pub mod common;
pub mod expense;

pub use alert::{AlertCandidate, AlertIdentity, AlertKind, NotificationRecord, Severity};
pub use budget::{BudgetConfig, CategoryLimit};
pub use category::Category;
pub use common::SubjectId;
pub use expense::Expense;
