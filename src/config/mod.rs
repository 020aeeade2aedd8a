pub mod cli;
pub mod toml_config;

use crate::core::codec::RosterCodec;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::TomlConfig;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.groupme.com/v3";
pub const DEFAULT_GROUP_NAME: &str = "Service Group";
pub const DEFAULT_GOAL_HOURS: f64 = 15.0;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_GOAL_HOURS: f64 = 10_000.0;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "service-hours")]
#[command(about = "Track community-service hours for a group roster")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Roster file to load and save (defaults to the group name with .txt)
    #[arg(long)]
    pub roster_file: Option<String>,

    #[arg(long)]
    pub group_name: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,

    #[arg(long)]
    pub group_id: Option<String>,

    #[arg(long, env = "GROUPME_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Members below this many hours are reported by `view below`
    #[arg(long)]
    pub goal_hours: Option<f64>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

/// Effective configuration handed to the command loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub group_name: String,
    pub roster_file: Option<String>,
    pub api_base: String,
    pub group_id: Option<String>,
    pub access_token: Option<String>,
    pub goal_hours: f64,
    pub timeout_seconds: u64,
    roster_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            group_name: DEFAULT_GROUP_NAME.to_string(),
            roster_file: None,
            api_base: DEFAULT_API_BASE.to_string(),
            group_id: None,
            access_token: None,
            goal_hours: DEFAULT_GOAL_HOURS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            roster_path: String::new(),
        };
        settings.refresh_roster_path();
        settings
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Self::default();
        settings.apply_toml(config);
        settings
    }

    pub fn apply_toml(&mut self, config: &TomlConfig) {
        let source = config.source();
        let roster = config.roster();

        self.group_name = config.group.name.clone();
        if let Some(api_base) = source.api_base {
            self.api_base = api_base;
        }
        self.group_id = source.group_id.or(self.group_id.take());
        self.access_token = source.access_token.or(self.access_token.take());
        if let Some(timeout) = source.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        self.roster_file = roster.file.or(self.roster_file.take());
        if let Some(goal) = roster.goal_hours {
            self.goal_hours = goal;
        }
        self.refresh_roster_path();
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(name) = &cli.group_name {
            self.group_name = name.clone();
        }
        if let Some(api_base) = &cli.api_base {
            self.api_base = api_base.clone();
        }
        if cli.group_id.is_some() {
            self.group_id = cli.group_id.clone();
        }
        if cli.access_token.is_some() {
            self.access_token = cli.access_token.clone();
        }
        if let Some(timeout) = cli.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if cli.roster_file.is_some() {
            self.roster_file = cli.roster_file.clone();
        }
        if let Some(goal) = cli.goal_hours {
            self.goal_hours = goal;
        }
        self.refresh_roster_path();
    }

    pub fn set_group_name(&mut self, name: impl Into<String>) {
        self.group_name = name.into();
        self.refresh_roster_path();
    }

    pub fn set_roster_file(&mut self, path: impl Into<String>) {
        self.roster_file = Some(path.into());
        self.refresh_roster_path();
    }

    fn refresh_roster_path(&mut self) {
        self.roster_path = self
            .roster_file
            .clone()
            .unwrap_or_else(|| RosterCodec::default_file_name(&self.group_name));
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ConfigProvider for Settings {
    fn group_name(&self) -> &str {
        &self.group_name
    }

    fn roster_path(&self) -> &str {
        &self.roster_path
    }

    fn goal_hours(&self) -> f64 {
        self.goal_hours
    }

    fn members_url(&self) -> Option<String> {
        let group_id = self.group_id.as_deref()?;
        let mut url = Url::parse(&self.api_base).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("groups")
            .push(group_id);
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Some(url.to_string())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("group.name", &self.group_name)?;
        validation::validate_single_line("group.name", &self.group_name)?;
        validation::validate_url("source.api_base", &self.api_base)?;
        validation::validate_path("roster.file", &self.roster_path)?;
        validation::validate_hours_range("roster.goal_hours", self.goal_hours, 0.0, MAX_GOAL_HOURS)?;
        validation::validate_positive_number("source.timeout_seconds", self.timeout_seconds, 1)?;
        if self.group_id.is_some() {
            validation::validate_required_field("source.access_token", &self.access_token)?;
        }
        Ok(())
    }
}
