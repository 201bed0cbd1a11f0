use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    core::period::{MonitoringPeriod, PeriodClock},
    domain::{Category, Expense},
};

/// Period-scoped spending totals, rebuilt from scratch on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub period_start: DateTime<Utc>,
    pub overall_total: f64,
    pub per_category_total: BTreeMap<Category, f64>,
}

impl PeriodAggregate {
    pub fn empty(period_start: DateTime<Utc>) -> Self {
        Self {
            period_start,
            overall_total: 0.0,
            per_category_total: BTreeMap::new(),
        }
    }

    pub fn category_total(&self, category: Category) -> f64 {
        self.per_category_total
            .get(&category)
            .copied()
            .unwrap_or(0.0)
    }

    /// Category with the largest total; ties go to the earliest category in enumeration order.
    pub fn top_category(&self) -> Option<(Category, f64)> {
        let mut top: Option<(Category, f64)> = None;
        for (category, total) in &self.per_category_total {
            match top {
                Some((_, best)) if *total <= best => {}
                _ => top = Some((*category, *total)),
            }
        }
        top
    }
}

pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(
        expenses: &[Expense],
        clock: &PeriodClock,
        now: DateTime<Utc>,
    ) -> PeriodAggregate {
        Self::aggregate_period(expenses, clock.period_containing(now))
    }

    pub fn aggregate_period(expenses: &[Expense], period: MonitoringPeriod) -> PeriodAggregate {
        let mut aggregate = PeriodAggregate::empty(period.start);
        for expense in expenses.iter().filter(|e| period.contains(e.date)) {
            if !expense.amount.is_finite() {
                tracing::warn!(expense = %expense.id, "skipping expense with non-finite amount");
                continue;
            }
            aggregate.overall_total += expense.amount;
            *aggregate
                .per_category_total
                .entry(expense.category)
                .or_insert(0.0) += expense.amount;
        }
        aggregate
    }
}
