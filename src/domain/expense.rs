use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::category::Category, errors::MonitorError};

/// A dated, categorized spending record read from the expense store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
}

impl Expense {
    pub fn new(amount: f64, category: Category, date: DateTime<Utc>) -> Result<Self, MonitorError> {
        Self::with_id(Uuid::new_v4(), amount, category, date)
    }

    pub fn with_id(
        id: Uuid,
        amount: f64,
        category: Category,
        date: DateTime<Utc>,
    ) -> Result<Self, MonitorError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(MonitorError::InvalidExpense(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }
        Ok(Self {
            id,
            amount,
            category,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_negative_amounts() {
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        let err = Expense::new(-5.0, Category::Food, date).expect_err("negative amount");
        assert!(matches!(err, MonitorError::InvalidExpense(_)));
    }

    #[test]
    fn rejects_nan_amounts() {
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        assert!(Expense::new(f64::NAN, Category::Food, date).is_err());
    }

    #[test]
    fn accepts_zero_amounts() {
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        let expense = Expense::new(0.0, Category::Other, date).expect("zero is allowed");
        assert_eq!(expense.amount, 0.0);
    }
}
