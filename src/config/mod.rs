use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        period::CalendarMode,
        utils::{ensure_dir, PathResolver},
    },
    errors::MonitorError,
};

const TMP_SUFFIX: &str = "tmp";

/// Ratios and day gates used by the threshold evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Overall share of budget that raises the approaching-limit warning.
    pub warning_ratio: f64,
    /// Overall share of budget treated as exceeded; also used per category.
    pub exceeded_ratio: f64,
    pub saving_tip_ratio: f64,
    pub performing_well_ratio: f64,
    pub performing_well_min_day: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warning_ratio: 0.80,
            exceeded_ratio: 1.00,
            saving_tip_ratio: 0.75,
            performing_well_ratio: 0.70,
            performing_well_min_day: 14,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<(), MonitorError> {
        let ratios = [
            ("warning_ratio", self.warning_ratio),
            ("exceeded_ratio", self.exceeded_ratio),
            ("saving_tip_ratio", self.saving_tip_ratio),
            ("performing_well_ratio", self.performing_well_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value <= 0.0 {
                return Err(MonitorError::ConfigurationInvalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.saving_tip_ratio >= self.warning_ratio {
            return Err(MonitorError::ConfigurationInvalid(
                "saving_tip_ratio must be below warning_ratio".into(),
            ));
        }
        if self.warning_ratio >= self.exceeded_ratio {
            return Err(MonitorError::ConfigurationInvalid(
                "warning_ratio must be below exceeded_ratio".into(),
            ));
        }
        if !(1..=31).contains(&self.performing_well_min_day) {
            return Err(MonitorError::ConfigurationInvalid(format!(
                "performing_well_min_day must be within 1..=31, got {}",
                self.performing_well_min_day
            )));
        }
        Ok(())
    }
}

/// When an alert identity is marked as fired relative to its delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Mark before delivering; a failed delivery is not retried this period.
    #[default]
    AtMostOnce,
    /// Mark after a successful delivery; failures are re-offered on the next change.
    AtLeastOnce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub thresholds: ThresholdConfig,
    pub calendar: CalendarMode,
    pub delivery: DeliveryPolicy,
    pub concurrent_delivery: bool,
    pub currency_symbol: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            calendar: CalendarMode::Utc,
            delivery: DeliveryPolicy::AtMostOnce,
            concurrent_delivery: false,
            currency_symbol: "$".into(),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), MonitorError> {
        self.thresholds.validate()
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, MonitorError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, MonitorError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, MonitorError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<MonitorConfig, MonitorError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: MonitorConfig = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(MonitorConfig::default())
        }
    }

    pub fn save(&self, config: &MonitorConfig) -> Result<(), MonitorError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), MonitorError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
