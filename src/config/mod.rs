//! Configuration management for BuildForge
//!
//! Loads the TOML configuration (catalog locations, rule file override and
//! per-list result budgets), applies environment overrides and validates it.

use crate::error::{BuildForgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Where the pre-normalized catalogs live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub skills_file: String,
    pub uniques_file: String,
    pub passives_file: String,
    pub runes_file: String,
}

impl CatalogConfig {
    pub fn skills_path(&self) -> PathBuf {
        self.data_dir.join(&self.skills_file)
    }

    pub fn uniques_path(&self) -> PathBuf {
        self.data_dir.join(&self.uniques_file)
    }

    pub fn passives_path(&self) -> PathBuf {
        self.data_dir.join(&self.passives_file)
    }

    pub fn runes_path(&self) -> PathBuf {
        self.data_dir.join(&self.runes_file)
    }
}

/// Pattern configuration - optional replacement for the embedded tag rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
}

/// Result budgets for each list handed to the downstream prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Candidate pool drawn from the skill catalog
    pub skills: usize,
    /// Active skills kept after class narrowing
    pub active_skills: usize,
    pub support_gems: usize,
    pub unique_items: usize,
    pub passives: usize,
    pub runes: usize,
    pub slot_items: usize,
    /// Nodes shown per ascendancy
    pub ascendancy_nodes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            skills: 40,
            active_skills: 25,
            support_gems: 15,
            unique_items: 25,
            passives: 30,
            runes: 15,
            slot_items: 5,
            ascendancy_nodes: 5,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BuildForgeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BuildForgeError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(
            "Config file not found, using defaults. Run 'buildforge config init' to create one."
        );
        Config::default().finalize()
    }

    /// Parse, apply environment overrides and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.finalize()
    }

    /// Apply environment overrides, then validate the result
    pub fn finalize(mut self) -> Result<Self> {
        self.apply_env_overrides();

        ConfigValidator::validate(&self)?;

        Ok(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| BuildForgeError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: BUILDFORGE_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("BUILDFORGE_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    /// Set a single value addressed as `SECTION__KEY`
    pub fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "CATALOG__DATA_DIR" => {
                self.catalog.data_dir = PathBuf::from(value);
            }
            "PATTERNS__RULES_FILE" => {
                self.patterns.rules_file = Some(PathBuf::from(value));
            }
            _ => {
                if let Some(limit) = path.strip_prefix("LIMITS__") {
                    let parsed = parse_limit(path, value)?;
                    let slot = self.limits.slot_mut(limit).ok_or_else(|| {
                        BuildForgeError::InvalidConfigValue {
                            path: path.to_string(),
                            message: "Unknown limit".to_string(),
                        }
                    })?;
                    *slot = parsed;
                } else {
                    tracing::debug!("Unknown env config key: {}", path);
                }
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            BuildForgeError::Config("Cannot determine config directory".to_string())
        })?;

        Ok(config_dir.join("buildforge").join("config.toml"))
    }

    /// Get the default catalog directory
    pub fn default_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            BuildForgeError::Config("Cannot determine data directory".to_string())
        })?;

        Ok(data_dir.join("buildforge").join("poe2"))
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| BuildForgeError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            BuildForgeError::Config("Cannot determine home directory".to_string())
        })?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}

impl CatalogConfig {
    /// Copy with `data_dir` home-expanded
    pub fn resolved(&self) -> Result<Self> {
        Ok(Self {
            data_dir: expand_path(&self.data_dir)?,
            ..self.clone()
        })
    }
}

impl LimitsConfig {
    fn slot_mut(&mut self, key: &str) -> Option<&mut usize> {
        match key {
            "SKILLS" => Some(&mut self.skills),
            "ACTIVE_SKILLS" => Some(&mut self.active_skills),
            "SUPPORT_GEMS" => Some(&mut self.support_gems),
            "UNIQUE_ITEMS" => Some(&mut self.unique_items),
            "PASSIVES" => Some(&mut self.passives),
            "RUNES" => Some(&mut self.runes),
            "SLOT_ITEMS" => Some(&mut self.slot_items),
            "ASCENDANCY_NODES" => Some(&mut self.ascendancy_nodes),
            _ => None,
        }
    }
}

fn parse_limit(path: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| BuildForgeError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}' as a result count", value),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            catalog: CatalogConfig {
                data_dir: PathBuf::from("~/.local/share/buildforge/poe2"),
                skills_file: "skills.json".to_string(),
                uniques_file: "unique_items.json".to_string(),
                passives_file: "passive_tree.json".to_string(),
                runes_file: "runes.json".to_string(),
            },
            patterns: PatternsConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();

        assert_eq!(parsed.catalog.skills_file, "skills.json");
        assert_eq!(parsed.limits.skills, 40);
    }

    #[test]
    fn test_limits_default_when_section_missing() {
        let text = r#"
[_meta]
schema_version = "1.0.0"

[catalog]
data_dir = "/tmp/poe2"
skills_file = "skills.json"
uniques_file = "unique_items.json"
passives_file = "passive_tree.json"
runes_file = "runes.json"
"#;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.limits.passives, 30);
        assert!(config.patterns.rules_file.is_none());
        assert_eq!(
            config.catalog.runes_path(),
            PathBuf::from("/tmp/poe2/runes.json")
        );
    }

    #[test]
    fn test_set_limit_from_env_key() {
        let mut config = Config::default();
        config.set_value_from_env("LIMITS__RUNES", "7").unwrap();
        assert_eq!(config.limits.runes, 7);

        let err = config.set_value_from_env("LIMITS__RUNES", "many");
        assert!(matches!(
            err,
            Err(BuildForgeError::InvalidConfigValue { .. })
        ));

        let err = config.set_value_from_env("LIMITS__FLASKS", "3");
        assert!(err.is_err());
    }

    #[test]
    fn test_expand_path() {
        let absolute = expand_path(Path::new("/srv/poe2")).unwrap();
        assert_eq!(absolute, PathBuf::from("/srv/poe2"));

        let home = expand_path(Path::new("~/poe2")).unwrap();
        assert!(home.ends_with("poe2"));
        assert!(!home.starts_with("~"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(config.limits.skills, 40);
        assert_eq!(config.catalog.passives_file, "passive_tree.json");
    }

    #[test]
    fn test_finalize_rejects_invalid_limits() {
        let mut config = Config::default();
        config.limits.runes = 0;

        let result = config.finalize();
        assert!(matches!(result, Err(BuildForgeError::ConfigValidation { .. })));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = Config::load(Path::new("/definitely/not/here/config.toml"));
        assert!(matches!(result, Err(BuildForgeError::ConfigNotFound { .. })));
    }
}
