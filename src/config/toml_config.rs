use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub group: GroupConfig,
    pub source: Option<SourceConfig>,
    pub roster: Option<RosterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub api_base: Option<String>,
    pub group_id: Option<String>,
    pub access_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    pub file: Option<String>,
    pub goal_hours: Option<f64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RosterError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RosterError::Config {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source(&self) -> SourceConfig {
        self.source.clone().unwrap_or_default()
    }

    pub fn roster(&self) -> RosterConfig {
        self.roster.clone().unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("group.name", &self.group.name)?;
        validation::validate_single_line("group.name", &self.group.name)?;

        let source = self.source();
        if let Some(api_base) = &source.api_base {
            validation::validate_url("source.api_base", api_base)?;
        }
        if let Some(timeout) = source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        let roster = self.roster();
        if let Some(file) = &roster.file {
            validation::validate_path("roster.file", file)?;
        }
        if let Some(goal) = roster.goal_hours {
            validation::validate_hours_range("roster.goal_hours", goal, 0.0, 10_000.0)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[group]
name = "Key Club"

[source]
api_base = "https://api.groupme.com/v3"
group_id = "109951712"
access_token = "abc"
timeout_seconds = 10

[roster]
file = "rosters/key_club.txt"
goal_hours = 20
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.group.name, "Key Club");
        assert_eq!(config.source().group_id.as_deref(), Some("109951712"));
        assert_eq!(config.source().timeout_seconds, Some(10));
        assert_eq!(config.roster().goal_hours, Some(20.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections() {
        let config = TomlConfig::from_toml_str("[group]\nname = \"Band\"\n").unwrap();
        assert!(config.source().group_id.is_none());
        assert!(config.roster().file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SERVICE_HOURS_TEST_TOKEN", "from-env");

        let toml_content = r#"
[group]
name = "Key Club"

[source]
group_id = "1"
access_token = "${SERVICE_HOURS_TEST_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source().access_token.as_deref(), Some("from-env"));

        std::env::remove_var("SERVICE_HOURS_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[group]
name = "Key Club"

[source]
api_base = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let blank_group = TomlConfig::from_toml_str("[group]\nname = \"  \"\n").unwrap();
        assert!(blank_group.validate().is_err());

        let split_group =
            TomlConfig::from_toml_str("[group]\nname = \"Key\\nClub\"\n").unwrap();
        assert_eq!(split_group.group.name, "Key\nClub");
        assert!(split_group.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[group\nname=");
        assert!(matches!(result, Err(RosterError::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[group]\nname = \"File Group\"\n\n[roster]\ngoal_hours = 12.5\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.group.name, "File Group");
        assert_eq!(config.roster().goal_hours, Some(12.5));
    }
}
