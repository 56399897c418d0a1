use std::env;

use anyhow::Result;
use tracing::{error, info};

/// Process-wide configuration, read once from the environment at startup
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the completion service deployment.
    pub endpoint: String,
    /// Model (deployment) identifier for completion requests.
    pub model: String,
    /// API version query parameter expected by the completion service.
    pub api_version: String,
    /// Credential for the completion service.
    pub subscription_key: String,
    /// Optional credential for the hosting API; unauthenticated calls work
    /// for public repositories, with lower rate limits.
    pub github_token: Option<String>,
}

impl Config {
    /// Load all settings from the environment. Required variables fail fast
    /// so no network call is attempted with a partial configuration.
    pub fn from_env() -> Result<Self> {
        let endpoint = require_var("ENDPOINT")?;
        let model = require_var("MODEL")?;
        let api_version = require_var("API_VERSION")?;
        let subscription_key = require_var("SUBSCRIPTION_KEY")?;
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(Config {
            endpoint,
            model,
            api_version,
            subscription_key,
            github_token,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.endpoint,
            model = %self.model,
            api_version = %self.api_version,
            subscription_key_len = self.subscription_key.len(),
            github_token_set = self.github_token.is_some(),
            "Loaded Config"
        );
    }
}

fn require_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => {
            error!(var = name, "Environment variable is set but empty");
            Err(anyhow::anyhow!("{name} environment variable is empty"))
        }
        Err(e) => {
            error!(var = name, "Environment variable not set");
            Err(anyhow::anyhow!("{name} environment variable not set: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        env::set_var("ENDPOINT", "https://example.invalid");
        env::set_var("MODEL", "test-model");
        env::set_var("API_VERSION", "2024-02-15-preview");
        env::set_var("SUBSCRIPTION_KEY", "test-key");
    }

    #[test]
    #[serial]
    fn loads_all_settings_from_env() {
        set_required_vars();
        env::remove_var("GITHUB_TOKEN");

        let config = Config::from_env().expect("config loads");
        assert_eq!(config.endpoint, "https://example.invalid");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.api_version, "2024-02-15-preview");
        assert_eq!(config.subscription_key, "test-key");
        assert!(config.github_token.is_none());
    }

    #[test]
    #[serial]
    fn optional_token_is_picked_up() {
        set_required_vars();
        env::set_var("GITHUB_TOKEN", "ghp_example");

        let config = Config::from_env().expect("config loads");
        assert_eq!(config.github_token.as_deref(), Some("ghp_example"));

        env::remove_var("GITHUB_TOKEN");
    }

    #[test]
    #[serial]
    fn missing_required_var_is_an_error() {
        set_required_vars();
        env::remove_var("SUBSCRIPTION_KEY");

        let err = Config::from_env().expect_err("missing key must fail");
        assert!(err.to_string().contains("SUBSCRIPTION_KEY"));
    }
}
