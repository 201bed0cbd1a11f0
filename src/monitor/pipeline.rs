//! One subject's evaluation pipeline: aggregate, evaluate, dedup, deliver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};

use crate::{
    config::{DeliveryPolicy, MonitorConfig},
    core::{
        services::{Aggregator, ThresholdEvaluator},
        Clock, DedupGate, DedupState, PeriodClock,
    },
    domain::{AlertCandidate, AlertIdentity, BudgetConfig, Expense, NotificationRecord, SubjectId},
    errors::DeliveryError,
    monitor::report::EvaluationReport,
    notifications::NotificationSink,
};

type DeliveryOutcome = (AlertIdentity, Result<(), DeliveryError>);

pub(crate) struct MonitorPipeline {
    subject: SubjectId,
    gate: DedupGate,
    evaluator: ThresholdEvaluator,
    periods: PeriodClock,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    delivery: DeliveryPolicy,
    concurrent_delivery: bool,
}

impl MonitorPipeline {
    pub(crate) fn new(
        subject: SubjectId,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: &MonitorConfig,
    ) -> Self {
        let periods = PeriodClock::new(config.calendar);
        let gate = DedupGate::new(periods.current_period_start(clock.now()));
        Self {
            subject,
            gate,
            evaluator: ThresholdEvaluator::from_config(config),
            periods,
            clock,
            sink,
            delivery: config.delivery,
            concurrent_delivery: config.concurrent_delivery,
        }
    }

    pub(crate) fn periods(&self) -> &PeriodClock {
        &self.periods
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn dedup_state(&self) -> DedupState {
        self.gate.state().clone()
    }

    /// Boundary the rollover timer waits for first.
    pub(crate) fn first_boundary(&self) -> DateTime<Utc> {
        self.periods.next_period_start(self.gate.period_start())
    }

    pub(crate) fn rollover(&mut self, boundary: DateTime<Utc>) {
        if self.gate.advance_to(boundary) {
            info!(subject = %self.subject, period_start = %boundary, "monitoring period rolled over");
        } else {
            debug!(subject = %self.subject, period_start = %boundary, "period already advanced");
        }
    }

    pub(crate) async fn evaluate(
        &mut self,
        expenses: Vec<Expense>,
        budget: BudgetConfig,
    ) -> EvaluationReport {
        let now = self.clock.now();
        let period = self.periods.period_containing(now);
        if self.gate.advance_to(period.start) {
            info!(
                subject = %self.subject,
                period_start = %period.start,
                "evaluation observed a new period before the rollover timer"
            );
        }

        let mut report = EvaluationReport::new(self.subject.clone(), period.start);
        if expenses.is_empty() {
            report.skipped = true;
            debug!(subject = %self.subject, "no expenses; evaluation skipped");
            return report;
        }

        let aggregate = Aggregator::aggregate_period(&expenses, period);
        let day = self.periods.day_of_period(now);
        let candidates = self.evaluator.evaluate(&aggregate, &budget, day);

        let mut pending = Vec::new();
        for candidate in candidates {
            report.candidates.push(candidate.identity.clone());
            if self.admit(&candidate) {
                pending.push(candidate.to_record(&self.subject, now));
            } else {
                trace!(subject = %self.subject, identity = %candidate.identity, "alert already reported");
                report.suppressed.push(candidate.identity);
            }
        }

        let outcomes = if self.concurrent_delivery {
            self.deliver_concurrently(pending).await
        } else {
            self.deliver_sequentially(pending).await
        };

        for (identity, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    if self.delivery == DeliveryPolicy::AtLeastOnce {
                        self.gate.record(identity.clone());
                    }
                    report.fired.push(identity);
                }
                Err(err) => {
                    warn!(
                        subject = %self.subject,
                        identity = %identity,
                        error = %err,
                        "failed to deliver budget notification"
                    );
                    report.failed.push((identity, err));
                }
            }
        }

        debug!(
            subject = %self.subject,
            period_start = %report.period_start,
            total = aggregate.overall_total,
            candidates = report.candidates.len(),
            fired = report.fired.len(),
            failed = report.failed.len(),
            "evaluation pass finished"
        );
        report
    }

    // At-most-once marks the identity before the delivery attempt.
    fn admit(&mut self, candidate: &AlertCandidate) -> bool {
        match self.delivery {
            DeliveryPolicy::AtMostOnce => self.gate.should_fire(candidate),
            DeliveryPolicy::AtLeastOnce => !self.gate.has_fired(&candidate.identity),
        }
    }

    async fn deliver_sequentially(&self, records: Vec<NotificationRecord>) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            let outcome = self.sink.deliver(&record).await;
            outcomes.push((record.identity, outcome));
        }
        outcomes
    }

    async fn deliver_concurrently(&self, records: Vec<NotificationRecord>) -> Vec<DeliveryOutcome> {
        let mut tasks = JoinSet::new();
        for (index, record) in records.iter().cloned().enumerate() {
            let sink = Arc::clone(&self.sink);
            tasks.spawn(async move { (index, sink.deliver(&record).await) });
        }

        let mut results: Vec<Option<Result<(), DeliveryError>>> = vec![None; records.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => results[index] = Some(outcome),
                Err(err) => warn!(subject = %self.subject, error = %err, "delivery task aborted"),
            }
        }

        records
            .into_iter()
            .zip(results)
            .map(|(record, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    Err(DeliveryError::Unreachable("delivery task aborted".into()))
                });
                (record.identity, outcome)
            })
            .collect()
    }
}
