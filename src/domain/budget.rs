//! Budget limits supplied fresh on every evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{domain::category::Category, errors::MonitorError};

/// Limit assigned to a single category.
///
/// `Unset` and `Zero` both leave the category unmonitored, but stay distinct so
/// callers can tell "no budget assigned" apart from "budget is literally zero".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryLimit {
    #[default]
    Unset,
    Zero,
    Amount(f64),
}

impl CategoryLimit {
    /// Maps a raw amount coming from a form or store onto the tri-state.
    pub fn from_amount(amount: f64) -> Self {
        if amount == 0.0 {
            CategoryLimit::Zero
        } else {
            CategoryLimit::Amount(amount)
        }
    }

    /// Returns the limit only when it is a positive, finite amount.
    pub fn active(&self) -> Option<f64> {
        match self {
            CategoryLimit::Amount(amount) if amount.is_finite() && *amount > 0.0 => Some(*amount),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, CategoryLimit::Unset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub overall: f64,
    #[serde(default)]
    pub per_category: BTreeMap<Category, CategoryLimit>,
}

impl BudgetConfig {
    pub fn new(overall: f64) -> Self {
        Self {
            overall,
            per_category: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: Category, amount: f64) -> Self {
        self.set_category(category, CategoryLimit::from_amount(amount));
        self
    }

    pub fn set_category(&mut self, category: Category, limit: CategoryLimit) {
        if limit.is_set() {
            self.per_category.insert(category, limit);
        } else {
            self.per_category.remove(&category);
        }
    }

    pub fn category_limit(&self, category: Category) -> CategoryLimit {
        self.per_category
            .get(&category)
            .copied()
            .unwrap_or_default()
    }

    /// Positive overall budget, if one is configured.
    pub fn active_overall(&self) -> Option<f64> {
        if self.overall.is_finite() && self.overall > 0.0 {
            Some(self.overall)
        } else {
            None
        }
    }

    /// Sum of every positive category limit.
    pub fn total_category_budget(&self) -> f64 {
        self.per_category
            .values()
            .filter_map(CategoryLimit::active)
            .sum()
    }

    /// Guards budget edits before they are persisted.
    ///
    /// Evaluation never calls this; overall-based rules rely on their own
    /// positivity guard instead.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.active_overall().is_none() {
            return Err(MonitorError::ConfigurationInvalid(format!(
                "overall budget must be a positive number, got {}",
                self.overall
            )));
        }
        for (category, limit) in &self.per_category {
            if let CategoryLimit::Amount(amount) = limit {
                if !amount.is_finite() || *amount < 0.0 {
                    return Err(MonitorError::ConfigurationInvalid(format!(
                        "{category} budget must be zero or positive, got {amount}"
                    )));
                }
            }
        }
        Ok(())
    }
}
