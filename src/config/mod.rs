use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::services::{
        summary_service::{DEFAULT_DASHBOARD_MONTHS, DEFAULT_RECENT_LIMIT, DEFAULT_REPORT_MONTHS},
        DashboardOptions, SortKey,
    },
    errors::ConfigError,
    utils::paths::{config_file_in, ensure_dir, resolve_base},
};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences persisted next to the transaction snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub dashboard_months: usize,
    pub report_months: usize,
    pub recent_limit: usize,
    #[serde(with = "sort_key_tag")]
    pub default_sort: SortKey,
    pub autosave: bool,
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            dashboard_months: DEFAULT_DASHBOARD_MONTHS,
            report_months: DEFAULT_REPORT_MONTHS,
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_sort: SortKey::default(),
            autosave: true,
            backup_retention: DEFAULT_BACKUP_RETENTION,
        }
    }
}

impl Config {
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            months: self.dashboard_months,
            recent_limit: self.recent_limit,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(base: Option<PathBuf>) -> Result<Self, ConfigError> {
        let base = resolve_base(base);
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored preferences, falling back to defaults when none exist.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}

mod sort_key_tag {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::core::services::SortKey;

    pub fn serialize<S: Serializer>(key: &SortKey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(key.tag())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SortKey, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{}", TMP_SUFFIX));
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
