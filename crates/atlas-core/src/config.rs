use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the per-type artifact directories, relative to the project.
    #[serde(default = "default_backlog_dir")]
    pub backlog_dir: String,
    /// Default cap on `list` output. `None` lists everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_limit: Option<usize>,
    /// Longest title slug kept in artifact file names.
    #[serde(default = "default_slug_max_len")]
    pub slug_max_len: usize,
}

fn default_backlog_dir() -> String {
    paths::DEFAULT_BACKLOG_DIR.to_string()
}

fn default_slug_max_len() -> usize {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backlog_dir: default_backlog_dir(),
            list_limit: None,
            slug_max_len: default_slug_max_len(),
        }
    }
}

impl Config {
    /// Load `.atlas/config.yaml`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.backlog_dir.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "backlog_dir is empty; artifacts would be written to the project root"
                    .to_string(),
            });
        }
        if Path::new(&self.backlog_dir).is_absolute() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "backlog_dir '{}' is absolute; stored artifact paths will not be portable",
                    self.backlog_dir
                ),
            });
        }
        if self.slug_max_len == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "slug_max_len is 0; artifact names will carry the ID only".to_string(),
            });
        }
        if self.list_limit == Some(0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "list_limit is 0; list will print nothing by default".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
