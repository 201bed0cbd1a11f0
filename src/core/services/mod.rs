pub mod aggregator;
pub mod evaluator;
pub mod status_service;

pub use aggregator::{Aggregator, PeriodAggregate};
pub use evaluator::ThresholdEvaluator;
pub use status_service::{BudgetHealth, BudgetStatusReport, BudgetStatusService, CategoryStatus};
