use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the service, read from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bearer token for the record store. Without it every fetch comes back empty.
    pub airtable_api_key: Option<String>,
    #[serde(default = "default_base_id")]
    pub airtable_base_id: String,
    #[serde(default = "default_projects_table")]
    pub airtable_projects_table: String,
    #[serde(default = "default_clients_table")]
    pub airtable_clients_table: String,
    #[serde(default = "default_api_url")]
    pub airtable_api_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_window_days")]
    pub completed_window_days: i64,
    #[serde(default = "default_true")]
    pub wip_include_completed: bool,
    #[serde(default = "default_true")]
    pub wip_client_lookup: bool,
    /// Extra display names, `CODE=Name;CODE=Name`
    pub wip_client_names: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

fn default_base_id() -> String {
    "app8CI7NAZqhQ4G1Y".to_string()
}

fn default_projects_table() -> String {
    "Projects".to_string()
}

fn default_clients_table() -> String {
    "Clients".to_string()
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_window_days() -> i64 {
    42
}

fn default_true() -> bool {
    true
}

/// Display names for client codes whose store records carry no usable name
const BUILTIN_CLIENT_NAMES: &[(&str, &str)] = &[("ONE", "One NZ")];

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if one exists.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Code to display name map: the built-in entries, overridden by `WIP_CLIENT_NAMES`
    pub fn client_names(&self) -> HashMap<String, String> {
        let mut names: HashMap<String, String> = BUILTIN_CLIENT_NAMES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();

        // Configured entries win over built-in ones
        if let Some(raw) = &self.wip_client_names {
            for entry in raw.split(';') {
                let Some((code, name)) = entry.split_once('=') else {
                    continue;
                };
                let (code, name) = (code.trim(), name.trim());
                if !code.is_empty() && !name.is_empty() {
                    names.insert(code.to_string(), name.to_string());
                }
            }
        }

        names
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Load the configuration
    let config = Config::load()?;

    // Never log the API key itself
    tracing::debug!(
        base_id = %config.airtable_base_id,
        projects_table = %config.airtable_projects_table,
        api_key_present = config.airtable_api_key.is_some(),
        "configuration loaded"
    );

    Ok(config)
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        airtable_api_key: Some("key".to_string()),
        airtable_base_id: default_base_id(),
        airtable_projects_table: default_projects_table(),
        airtable_clients_table: default_clients_table(),
        airtable_api_url: default_api_url(),
        port: default_port(),
        request_timeout_secs: default_timeout_secs(),
        completed_window_days: default_window_days(),
        wip_include_completed: true,
        wip_client_lookup: true,
        wip_client_names: None,
        smtp_host: None,
        smtp_username: None,
        smtp_password: None,
        smtp_from: None,
    }
}
