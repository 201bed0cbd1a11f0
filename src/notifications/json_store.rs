use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    core::utils::{canonical_name, ensure_dir, PathResolver},
    domain::{NotificationRecord, SubjectId},
    errors::{DeliveryError, MonitorError},
};

use super::NotificationSink;

const RECORD_EXTENSION: &str = "jsonl";

/// Append-only notification store writing one JSON object per line per subject.
#[derive(Debug, Clone)]
pub struct JsonNotificationStore {
    dir: PathBuf,
}

impl JsonNotificationStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self, MonitorError> {
        let base = PathResolver::resolve_base(root);
        let dir = PathResolver::notifications_dir_in(&base);
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn subject_path(&self, subject: &SubjectId) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            canonical_name(subject.as_str()),
            RECORD_EXTENSION
        ))
    }

    pub async fn list(&self, subject: &SubjectId) -> Result<Vec<NotificationRecord>, MonitorError> {
        let path = self.subject_path(subject);
        if !fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path).await?;
        let mut records = Vec::new();
        for line in data.lines().filter(|line| !line.trim().is_empty()) {
            let record: NotificationRecord = serde_json::from_str(line)?;
            if &record.recipient == subject {
                records.push(record);
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl NotificationSink for JsonNotificationStore {
    async fn deliver(&self, record: &NotificationRecord) -> Result<(), DeliveryError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        fs::create_dir_all(&self.dir).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.subject_path(&record.recipient))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
