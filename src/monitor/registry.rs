use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use tracing::info;

use crate::{
    config::MonitorConfig,
    core::Clock,
    domain::{BudgetConfig, Expense, SubjectId},
    errors::MonitorResult,
    monitor::{
        report::EvaluationReport,
        session::{MonitorSession, SessionHandle},
    },
    notifications::NotificationSink,
};

/// Keeps one monitoring session per subject, started on the subject's first change.
pub struct MonitorRegistry {
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
    sessions: Mutex<HashMap<SubjectId, MonitorSession>>,
}

impl MonitorRegistry {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: MonitorConfig,
    ) -> MonitorResult<Self> {
        config.validate()?;
        Ok(Self {
            sink,
            clock,
            config,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Routes a data change to the subject's session.
    ///
    /// The registry lock is released before the evaluation runs, so subjects never wait on each other.
    pub async fn on_change(
        &self,
        subject: &SubjectId,
        expenses: Vec<Expense>,
        budget: BudgetConfig,
    ) -> MonitorResult<EvaluationReport> {
        let handle = self.session(subject).await?;
        handle.on_change(expenses, budget).await
    }

    pub async fn session(&self, subject: &SubjectId) -> MonitorResult<SessionHandle> {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(subject) {
            if existing.is_running() {
                return Ok(existing.handle());
            }
            info!(subject = %subject, "restarting stopped monitoring session");
        }
        let session = MonitorSession::start(
            subject.clone(),
            Arc::clone(&self.sink),
            Arc::clone(&self.clock),
            self.config.clone(),
        )?;
        let handle = session.handle();
        sessions.insert(subject.clone(), session);
        Ok(handle)
    }

    pub async fn end_session(&self, subject: &SubjectId) -> bool {
        let session = self.sessions.lock().await.remove(subject);
        match session {
            Some(session) => {
                session.shutdown().await;
                true
            }
            None => false,
        }
    }

    pub async fn active_subjects(&self) -> Vec<SubjectId> {
        let mut subjects: Vec<SubjectId> = self.sessions.lock().await.keys().cloned().collect();
        subjects.sort();
        subjects
    }

    pub async fn shutdown(&self) {
        let drained: Vec<MonitorSession> = self
            .sessions
            .lock()
            .await
            .drain()
            .map(|(_, session)| session)
            .collect();
        for session in drained {
            session.shutdown().await;
        }
    }
}
