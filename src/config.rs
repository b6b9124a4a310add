use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{ContactPolicy, OutreachPolicy, WorkflowState};
use crate::models::{CampaignId, SearchParameters};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub outreach: OutreachSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String { "http://localhost:8000/api".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_results")]
    pub default_max_results: i64,
    #[serde(default = "default_min_fit_score")]
    pub default_min_fit_score: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_max_results: default_max_results(),
            default_min_fit_score: default_min_fit_score(),
        }
    }
}

fn default_max_results() -> i64 { 20 }
fn default_min_fit_score() -> f64 { 0.3 }

#[derive(Debug, Clone, Deserialize)]
pub struct OutreachSettings {
    #[serde(default = "default_campaign_id")]
    pub default_campaign_id: CampaignId,
    #[serde(default)]
    pub policy: ContactPolicy,
    #[serde(default)]
    pub mark_contacted: bool,
    #[serde(default)]
    pub require_targets: bool,
}

impl Default for OutreachSettings {
    fn default() -> Self {
        Self {
            default_campaign_id: default_campaign_id(),
            policy: ContactPolicy::default(),
            mark_contacted: false,
            require_targets: false,
        }
    }
}

fn default_campaign_id() -> CampaignId { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCOUT__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCOUT__BACKEND__BASE_URL -> backend.base_url
            .add_source(
                Environment::with_prefix("SCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn search_defaults(&self) -> SearchParameters {
        SearchParameters {
            max_results: self.search.default_max_results,
            min_fit_score: self.search.default_min_fit_score,
        }
    }

    pub fn outreach_policy(&self) -> OutreachPolicy {
        OutreachPolicy {
            policy: self.outreach.policy,
            mark_contacted: self.outreach.mark_contacted,
            default_campaign_id: self.outreach.default_campaign_id,
            require_targets: self.outreach.require_targets,
        }
    }

    /// Fresh session state seeded from these settings
    pub fn initial_state(&self) -> WorkflowState {
        WorkflowState::new(self.search_defaults(), self.outreach_policy())
    }

    pub fn timeout_secs(&self) -> u64 {
        self.backend.timeout_secs.unwrap_or(30)
    }
}

/// `BACKEND_URL` wins over every file and prefixed variable
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("BACKEND_URL") {
        Ok(url) if !url.trim().is_empty() => Config::builder()
            .add_source(settings)
            .set_override("backend.base_url", url)?
            .build(),
        _ => Ok(settings),
    }
}
