use crate::config::Config;
use crate::error::{BuildForgeError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every problem before failing
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_catalog(config, &mut errors);
        Self::validate_patterns(config, &mut errors);
        Self::validate_limits(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BuildForgeError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_catalog(config: &Config, errors: &mut Vec<ValidationError>) {
        // Existence is checked by the loader; the data dir may contain ~
        if config.catalog.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "catalog.data_dir",
                "Catalog data directory cannot be empty",
            ));
        }

        let files = [
            ("catalog.skills_file", &config.catalog.skills_file),
            ("catalog.uniques_file", &config.catalog.uniques_file),
            ("catalog.passives_file", &config.catalog.passives_file),
            ("catalog.runes_file", &config.catalog.runes_file),
        ];

        for (path, file) in files {
            if file.trim().is_empty() {
                errors.push(ValidationError::new(path, "Catalog file name cannot be empty"));
            } else if !file.ends_with(".json") {
                errors.push(ValidationError::new(
                    path,
                    format!("Catalog files must be JSON, got '{}'", file),
                ));
            }
        }
    }

    fn validate_patterns(config: &Config, errors: &mut Vec<ValidationError>) {
        if let Some(rules_file) = &config.patterns.rules_file {
            if rules_file.as_os_str().is_empty() {
                errors.push(ValidationError::new(
                    "patterns.rules_file",
                    "Rules file path cannot be empty when set",
                ));
            }
        }
    }

    fn validate_limits(config: &Config, errors: &mut Vec<ValidationError>) {
        let limits = &config.limits;
        let all = [
            ("limits.skills", limits.skills),
            ("limits.active_skills", limits.active_skills),
            ("limits.support_gems", limits.support_gems),
            ("limits.unique_items", limits.unique_items),
            ("limits.passives", limits.passives),
            ("limits.runes", limits.runes),
            ("limits.slot_items", limits.slot_items),
            ("limits.ascendancy_nodes", limits.ascendancy_nodes),
        ];

        for (path, value) in all {
            if value == 0 {
                errors.push(ValidationError::new(path, "Limit must be greater than 0"));
            }
        }

        // Actives are narrowed from the skill candidate pool
        if limits.active_skills > limits.skills {
            errors.push(ValidationError::new(
                "limits.active_skills",
                format!(
                    "Active skill limit ({}) cannot exceed skill candidate limit ({})",
                    limits.active_skills, limits.skills
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_rules_path() {
        let mut config = Config::default();
        config.patterns.rules_file = Some(PathBuf::new());
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_zero_limit() {
        let mut config = Config::default();
        config.limits.runes = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = Config::default();
        config.meta.schema_version = "9.9.9".to_string();
        config.catalog.skills_file = "skills.lua".to_string();
        config.limits.active_skills = 100;

        match ConfigValidator::validate(&config) {
            Err(BuildForgeError::ConfigValidation { errors }) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
