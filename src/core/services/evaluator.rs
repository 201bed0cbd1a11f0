//! Maps period totals and budget limits to alert candidates.
//!
//! The evaluator is pure: it never consults alert history, so running it twice
//! on the same inputs yields the same candidates in the same order.

use crate::{
    config::{MonitorConfig, ThresholdConfig},
    core::services::aggregator::PeriodAggregate,
    domain::{AlertCandidate, AlertKind, BudgetConfig},
};

#[derive(Debug, Clone)]
pub struct ThresholdEvaluator {
    thresholds: ThresholdConfig,
    currency_symbol: String,
}

impl Default for ThresholdEvaluator {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

impl ThresholdEvaluator {
    pub fn new(thresholds: ThresholdConfig, currency_symbol: impl Into<String>) -> Self {
        Self {
            thresholds,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.thresholds.clone(), config.currency_symbol.clone())
    }

    /// Candidates in emission order: overall approaching, overall exceeded,
    /// per-category exceeded, performing well, saving tip.
    pub fn evaluate(
        &self,
        aggregate: &PeriodAggregate,
        budget: &BudgetConfig,
        day_of_period: u32,
    ) -> Vec<AlertCandidate> {
        let mut candidates = Vec::new();
        let t = &self.thresholds;
        let spent = aggregate.overall_total;
        let overall_ratio = budget.active_overall().map(|overall| (overall, spent / overall));

        if let Some((overall, ratio)) = overall_ratio {
            if ratio >= t.warning_ratio && ratio < t.exceeded_ratio {
                candidates.push(AlertCandidate::new(
                    AlertKind::OverallApproaching,
                    "Budget Alert",
                    format!(
                        "You've used {:.0}% of your monthly budget ({} of {}).",
                        ratio * 100.0,
                        self.money(spent),
                        self.money(overall)
                    ),
                ));
            }
            if ratio >= t.exceeded_ratio {
                candidates.push(AlertCandidate::new(
                    AlertKind::OverallExceeded,
                    "Budget Exceeded",
                    format!(
                        "You've exceeded your monthly budget! Spent {} of {}.",
                        self.money(spent),
                        self.money(overall)
                    ),
                ));
            }
        }

        for (category, limit) in &budget.per_category {
            let Some(limit) = limit.active() else {
                continue;
            };
            let category_spent = aggregate.category_total(*category);
            if category_spent / limit >= t.exceeded_ratio {
                candidates.push(AlertCandidate::new(
                    AlertKind::CategoryExceeded(*category),
                    format!("{category} Budget Exceeded"),
                    format!(
                        "You've spent {} on {category}, exceeding your {} budget.",
                        self.money(category_spent),
                        self.money(limit)
                    ),
                ));
            }
        }

        if let Some((_, ratio)) = overall_ratio {
            if day_of_period >= t.performing_well_min_day
                && ratio < t.performing_well_ratio
                && spent > 0.0
            {
                candidates.push(AlertCandidate::new(
                    AlertKind::PerformingWell,
                    "Great Job!",
                    format!(
                        "You're doing amazing! You've only used {:.0}% of your budget halfway through the month.",
                        ratio * 100.0
                    ),
                ));
            }
            if ratio >= t.saving_tip_ratio && ratio < t.warning_ratio {
                if let Some((category, total)) = aggregate.top_category() {
                    candidates.push(AlertCandidate::new(
                        AlertKind::SavingTip,
                        "Saving Tip",
                        format!(
                            "You're approaching your budget limit. Consider reducing {category} spending ({} this month).",
                            self.money(total)
                        ),
                    ));
                }
            }
        }

        candidates
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlertIdentity, Category};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn aggregate(overall: f64, categories: &[(Category, f64)]) -> PeriodAggregate {
        PeriodAggregate {
            period_start: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            overall_total: overall,
            per_category_total: categories.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    fn identities(candidates: &[AlertCandidate]) -> Vec<AlertIdentity> {
        candidates.iter().map(|c| c.identity.clone()).collect()
    }

    #[test]
    fn approaching_limit_message_reports_usage() {
        let evaluator = ThresholdEvaluator::default();
        let candidates = evaluator.evaluate(
            &aggregate(850.0, &[(Category::Food, 850.0)]),
            &BudgetConfig::new(1000.0),
            5,
        );
        assert_eq!(identities(&candidates), vec![AlertIdentity::new("overall-80")]);
        assert_eq!(candidates[0].title, "Budget Alert");
        assert_eq!(
            candidates[0].body,
            "You've used 85% of your monthly budget ($850.00 of $1000.00)."
        );
    }

    #[test]
    fn exactly_at_warning_ratio_fires_warning() {
        let evaluator = ThresholdEvaluator::default();
        let candidates = evaluator.evaluate(
            &aggregate(800.0, &[(Category::Rent, 800.0)]),
            &BudgetConfig::new(1000.0),
            3,
        );
        assert_eq!(identities(&candidates), vec![AlertIdentity::new("overall-80")]);
    }

    #[test]
    fn exactly_at_budget_counts_as_exceeded() {
        let evaluator = ThresholdEvaluator::default();
        let candidates = evaluator.evaluate(
            &aggregate(1000.0, &[(Category::Rent, 1000.0)]),
            &BudgetConfig::new(1000.0),
            3,
        );
        assert_eq!(identities(&candidates), vec![AlertIdentity::new("overall-100")]);
    }

    #[test]
    fn emission_order_is_stable() {
        let evaluator = ThresholdEvaluator::default();
        let budget = BudgetConfig::new(1000.0)
            .with_category(Category::Travel, 100.0)
            .with_category(Category::Food, 100.0);
        let candidates = evaluator.evaluate(
            &aggregate(1200.0, &[(Category::Food, 600.0), (Category::Travel, 600.0)]),
            &budget,
            20,
        );
        assert_eq!(
            identities(&candidates),
            vec![
                AlertIdentity::new("overall-100"),
                AlertIdentity::new("Food-100"),
                AlertIdentity::new("Travel-100"),
            ]
        );
    }

    #[test]
    fn performing_well_waits_for_min_day() {
        let evaluator = ThresholdEvaluator::default();
        let spent = aggregate(300.0, &[(Category::Food, 300.0)]);
        let budget = BudgetConfig::new(1000.0);
        assert!(evaluator.evaluate(&spent, &budget, 13).is_empty());
        let candidates = evaluator.evaluate(&spent, &budget, 14);
        assert_eq!(identities(&candidates), vec![AlertIdentity::new("performing-well")]);
        assert_eq!(candidates[0].title, "Great Job!");
        assert_eq!(
            candidates[0].body,
            "You're doing amazing! You've only used 30% of your budget halfway through the month."
        );
    }

    #[test]
    fn performing_well_requires_some_spending() {
        let evaluator = ThresholdEvaluator::default();
        let candidates = evaluator.evaluate(&aggregate(0.0, &[]), &BudgetConfig::new(1000.0), 25);
        assert!(candidates.is_empty());
    }

    #[test]
    fn zero_category_limit_is_skipped() {
        let evaluator = ThresholdEvaluator::default();
        let budget = BudgetConfig::new(10_000.0).with_category(Category::Shopping, 0.0);
        let candidates = evaluator.evaluate(
            &aggregate(50.0, &[(Category::Shopping, 50.0)]),
            &budget,
            2,
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn category_rule_survives_missing_overall_budget() {
        let evaluator = ThresholdEvaluator::default();
        let budget = BudgetConfig::new(0.0).with_category(Category::Food, 200.0);
        let candidates = evaluator.evaluate(
            &aggregate(250.0, &[(Category::Food, 250.0)]),
            &budget,
            20,
        );
        assert_eq!(identities(&candidates), vec![AlertIdentity::new("Food-100")]);
    }

    #[test]
    fn custom_currency_symbol_is_used() {
        let evaluator = ThresholdEvaluator::new(ThresholdConfig::default(), "€");
        let candidates = evaluator.evaluate(
            &aggregate(1500.0, &[(Category::Rent, 1500.0)]),
            &BudgetConfig::new(1000.0),
            1,
        );
        assert_eq!(
            candidates[0].body,
            "You've exceeded your monthly budget! Spent €1500.00 of €1000.00."
        );
    }
}
