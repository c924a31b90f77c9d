use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read suggestion data at {data_path}: {source}")]
    DataFileReadError {
        data_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse suggestion data at {data_path}: {source}")]
    DataFileParseError {
        data_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Markup template with `__id__`, `__display__` and `__type__` placeholders.
    #[serde(default = "default_markup")]
    pub markup: String,
    #[serde(default = "default_true")]
    pub treat_mention_as_unit: bool,
    #[serde(default)]
    pub mentions: Vec<MentionSourceConfig>,
}

/// One `[[mentions]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionSourceConfig {
    pub kind: String,
    #[serde(default = "default_trigger")]
    pub trigger: String,
    #[serde(default)]
    pub append_space_on_add: bool,
    /// TOML file with an `entries` array, read in addition to `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(default)]
    entries: Vec<Entry>,
}

fn default_markup() -> String {
    "@[__display__](__id__)".to_string()
}

fn default_trigger() -> String {
    "@".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markup: default_markup(),
            treat_mention_as_unit: true,
            mentions: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in data file paths
        for source in &mut config.mentions {
            source.data_file = source
                .data_file
                .take()
                .map(|path| Self::expand_path(&path).unwrap_or(path));
        }

        Ok(Some(config))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mentions-input");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

impl MentionSourceConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            trigger: default_trigger(),
            append_space_on_add: false,
            data_file: None,
            data: Vec::new(),
        }
    }

    /// Inline entries followed by those from `data_file`.
    pub fn entries(&self) -> Result<Vec<Entry>, ConfigError> {
        let mut entries = self.data.clone();
        if let Some(data_path) = &self.data_file {
            let content = std::fs::read_to_string(data_path).map_err(|source| {
                ConfigError::DataFileReadError {
                    data_path: data_path.clone(),
                    source,
                }
            })?;
            let file: DataFile =
                toml::from_str(&content).map_err(|source| ConfigError::DataFileParseError {
                    data_path: data_path.clone(),
                    source,
                })?;
            entries.extend(file.entries);
        }
        Ok(entries)
    }
}
