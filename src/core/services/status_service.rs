use serde::{Deserialize, Serialize};

use crate::{
    core::services::aggregator::PeriodAggregate,
    domain::{BudgetConfig, Category, CategoryLimit},
};

const HEALTHY_PERCENT: f64 = 50.0;
const NEAR_LIMIT_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetHealth {
    NoBudget,
    Healthy,
    OnTrack,
    NearLimit,
    Exceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub spent: f64,
    pub limit: CategoryLimit,
    pub percent_used: Option<f64>,
}

/// Display-ready view of where the current period stands against the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatusReport {
    pub spent: f64,
    pub budget: f64,
    pub remaining: f64,
    pub percent_used: Option<f64>,
    pub health: BudgetHealth,
    pub categories: Vec<CategoryStatus>,
    pub total_category_budget: f64,
}

pub struct BudgetStatusService;

impl BudgetStatusService {
    pub fn summarize(aggregate: &PeriodAggregate, budget: &BudgetConfig) -> BudgetStatusReport {
        let spent = aggregate.overall_total;
        let percent_used = budget
            .active_overall()
            .map(|overall| (spent / overall) * 100.0);
        let health = match percent_used {
            None => BudgetHealth::NoBudget,
            Some(pct) if pct >= 100.0 => BudgetHealth::Exceeded,
            Some(pct) if pct > NEAR_LIMIT_PERCENT => BudgetHealth::NearLimit,
            Some(pct) if pct <= HEALTHY_PERCENT && spent > 0.0 => BudgetHealth::Healthy,
            Some(_) => BudgetHealth::OnTrack,
        };
        let categories = Category::ALL
            .iter()
            .map(|category| {
                let limit = budget.category_limit(*category);
                let category_spent = aggregate.category_total(*category);
                CategoryStatus {
                    category: *category,
                    spent: category_spent,
                    limit,
                    percent_used: limit.active().map(|amount| (category_spent / amount) * 100.0),
                }
            })
            .collect();

        BudgetStatusReport {
            spent,
            budget: budget.overall,
            remaining: budget.overall - spent,
            percent_used,
            health,
            categories,
            total_category_budget: budget.total_category_budget(),
        }
    }
}
