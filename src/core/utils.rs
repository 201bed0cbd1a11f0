use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::MonitorError;

const DEFAULT_DIR_NAME: &str = ".budget_monitor";
const HOME_ENV: &str = "BUDGET_MONITOR_HOME";
const CONFIG_FILE: &str = "config.json";
const NOTIFICATIONS_DIR: &str = "notifications";

/// Resolves the on-disk layout used by the config manager and the JSON notification store.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.budget_monitor`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn notifications_dir_in(base: &Path) -> PathBuf {
        base.join(NOTIFICATIONS_DIR)
    }
}

pub fn ensure_dir(path: &Path) -> Result<(), MonitorError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// File name that is safe to use for an arbitrary subject token.
///
/// Lowercase ASCII letters, digits and `-` are kept; every other byte becomes
/// `_` followed by two lowercase hex digits. Distinct tokens never share a name,
/// even on case-insensitive file systems.
pub fn canonical_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::from("_");
    }
    let mut name = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("_{byte:02x}"));
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_escapes_path_characters() {
        assert_eq!(canonical_name("../user 1"), "_2e_2e_2fuser_201");
        assert_eq!(canonical_name("abc-DEF_9"), "abc-_44_45_46_5f9");
        assert_eq!(canonical_name(""), "_");
    }

    #[test]
    fn canonical_name_keeps_lookalike_tokens_apart() {
        let names = ["a.b@x.com", "a_b_x_com", "A_B_X_COM", "a_2eb", " a", "a"];
        let encoded: std::collections::HashSet<String> =
            names.iter().map(|raw| canonical_name(raw)).collect();
        assert_eq!(encoded.len(), names.len());
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
