use std::{sync::Arc, time::Duration as StdDuration};

use chrono::{DateTime, Utc};
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    config::MonitorConfig,
    core::{Clock, DedupState},
    domain::{BudgetConfig, Expense, SubjectId},
    errors::{MonitorError, MonitorResult},
    monitor::{pipeline::MonitorPipeline, report::EvaluationReport},
    notifications::NotificationSink,
};

const COMMAND_BUFFER: usize = 32;

enum Command {
    Evaluate {
        expenses: Vec<Expense>,
        budget: BudgetConfig,
        reply: oneshot::Sender<EvaluationReport>,
    },
    Snapshot {
        reply: oneshot::Sender<DedupState>,
    },
}

/// Cloneable sender side of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    subject: SubjectId,
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Reports a change to the subject's expenses or budget and waits for the pass to finish.
    pub async fn on_change(
        &self,
        expenses: Vec<Expense>,
        budget: BudgetConfig,
    ) -> MonitorResult<EvaluationReport> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Evaluate {
            expenses,
            budget,
            reply,
        })
        .await?;
        response.await.map_err(|_| self.closed())
    }

    pub async fn dedup_state(&self) -> MonitorResult<DedupState> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        response.await.map_err(|_| self.closed())
    }

    async fn send(&self, command: Command) -> MonitorResult<()> {
        self.commands.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> MonitorError {
        MonitorError::SessionClosed(self.subject.clone())
    }
}

/// Monitoring session owning one subject's dedup state and rollover timer.
///
/// Evaluations and rollovers run on a single task, so they never interleave.
/// Dropping the session aborts that task and releases the timer.
pub struct MonitorSession {
    handle: SessionHandle,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl MonitorSession {
    pub fn start(
        subject: SubjectId,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: MonitorConfig,
    ) -> MonitorResult<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|err| MonitorError::Runtime(err.to_string()))?;
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (stop, stopped) = watch::channel(false);
        let pipeline = MonitorPipeline::new(subject.clone(), sink, clock, &config);
        info!(subject = %subject, "monitoring session started");
        let task = runtime.spawn(run(pipeline, receiver, stopped));
        Ok(Self {
            handle: SessionHandle { subject, commands },
            stop,
            task: Some(task),
        })
    }

    pub fn subject(&self) -> &SubjectId {
        &self.handle.subject
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    pub async fn on_change(
        &self,
        expenses: Vec<Expense>,
        budget: BudgetConfig,
    ) -> MonitorResult<EvaluationReport> {
        self.handle.on_change(expenses, budget).await
    }

    pub async fn dedup_state(&self) -> MonitorResult<DedupState> {
        self.handle.dedup_state().await
    }

    /// Stops the session, cancelling any pass still waiting on the notification store.
    ///
    /// Changes that were queued or in flight are answered with `SessionClosed`.
    pub async fn shutdown(mut self) {
        self.stop.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(subject = %self.handle.subject, error = %err, "monitor task failed");
            }
        }
        info!(subject = %self.handle.subject, "monitoring session ended");
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    mut pipeline: MonitorPipeline,
    mut commands: mpsc::Receiver<Command>,
    mut stopped: watch::Receiver<bool>,
) {
    let mut boundary = pipeline.first_boundary();
    let timer = sleep_until(deadline_for(boundary, pipeline.now()));
    tokio::pin!(timer);

    loop {
        tokio::select! {
            biased;
            _ = stopped.changed() => break,
            _ = &mut timer => {
                pipeline.rollover(boundary);
                boundary = pipeline.periods().next_period_start(boundary);
                timer.as_mut().reset(deadline_for(boundary, pipeline.now()));
            }
            command = commands.recv() => match command {
                Some(Command::Evaluate { expenses, budget, reply }) => {
                    tokio::select! {
                        biased;
                        _ = stopped.changed() => {
                            debug!("evaluation cancelled by shutdown");
                            break;
                        }
                        report = pipeline.evaluate(expenses, budget) => {
                            let _ = reply.send(report);
                        }
                    }
                }
                Some(Command::Snapshot { reply }) => {
                    let _ = reply.send(pipeline.dedup_state());
                }
                None => break,
            },
        }
    }
    debug!("monitor task stopped");
}

fn deadline_for(boundary: DateTime<Utc>, now: DateTime<Utc>) -> Instant {
    let wait = (boundary - now).to_std().unwrap_or(StdDuration::ZERO);
    Instant::now() + wait
}
