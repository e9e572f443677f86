use crate::error::{GtdError, Result};
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
// RankingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// How many projects the quick-pick list offers.
    #[serde(default = "default_quick_picks")]
    pub quick_picks: usize,
}

fn default_quick_picks() -> usize {
    6
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            quick_picks: default_quick_picks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            ranking: RankingConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(GtdError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != default_version() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "unsupported config version {} (expected {})",
                    self.version,
                    default_version()
                ),
            });
        }

        if self.ranking.quick_picks == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "ranking.quick_picks is 0: the popular project list will always be empty"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.ranking.quick_picks, 6);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(parsed.ranking.quick_picks, 6);
        let parsed: Config = serde_yaml::from_str("ranking:\n  quick_picks: 3\n").unwrap();
        assert_eq!(parsed.ranking.quick_picks, 3);
    }

    #[test]
    fn validate_flags_zero_picks_and_bad_version() {
        let mut cfg = Config::default();
        assert!(cfg.validate().is_empty());

        cfg.ranking.quick_picks = 0;
        cfg.version = 9;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
        assert!(warnings.iter().any(|w| w.message.contains("quick_picks")));
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(Config::load(dir.path()), Err(GtdError::NotInitialized)));
        Config::default().save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().ranking.quick_picks, 6);
    }
}
