//! Configuration handling.
//!
//! Configuration is stored in `.deskbox/config.yaml` and includes:
//! - The helpdesk API base URL and access token
//! - The acting agent (id, name, profile)
//! - The greeting template sent after a ticket is accepted

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::types::{Actor, DESKBOX_DIR, Profile};

pub const API_URL_ENV: &str = "DESKBOX_API_URL";
pub const API_TOKEN_ENV: &str = "DESKBOX_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `{{ms}}` and `{{name}}` are expanded by the server; `{actor}` is expanded here.
pub const DEFAULT_GREETING_TEMPLATE: &str =
    "{{ms}} *{{name}}*, my name is {actor} and I'll be handling your request from here!";

const GREETING_PREFIX: &str = "Automated message:";

pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.token",
    "api.timeout_secs",
    "actor.id",
    "actor.name",
    "actor.profile",
    "greeting.template",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,

    #[serde(default)]
    pub greeting: GreetingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GreetingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Automated greeting sent to the contact after an accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    template: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING_TEMPLATE)
    }
}

impl Greeting {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Message body for a greeting sent on behalf of `actor_name`
    pub fn render(&self, actor_name: &str) -> String {
        let text = self.template.replace("{actor}", actor_name);
        format!("{GREETING_PREFIX}\n{}", text.trim())
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(DESKBOX_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// API base URL from environment variable or config file
    pub fn api_base_url(&self) -> Option<String> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }

        self.api.base_url.clone()
    }

    /// API token from environment variable or config file
    pub fn api_token(&self) -> Option<String> {
        if let Ok(token) = env::var(API_TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }

        self.api.token.clone()
    }

    /// A zero timeout in a hand-edited file falls back to the default
    pub fn timeout(&self) -> Duration {
        let secs = self
            .api
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// The configured agent, required for any ticket transition
    pub fn actor(&self) -> Result<Actor> {
        match &self.actor {
            Some(actor) if actor.id != 0 && !actor.name.trim().is_empty() => Ok(actor.clone()),
            Some(actor) if actor.id == 0 => Err(DeskError::Config(
                "actor.id not configured. Run: deskbox config set actor.id <id>".to_string(),
            )),
            Some(_) => Err(DeskError::Config(
                "actor.name not configured. Run: deskbox config set actor.name <name>".to_string(),
            )),
            None => Err(DeskError::Config(
                "actor not configured. Run: deskbox config set actor.id <id> and deskbox config set actor.name <name>"
                    .to_string(),
            )),
        }
    }

    pub fn greeting(&self) -> Greeting {
        self.greeting
            .template
            .as_deref()
            .map(Greeting::new)
            .unwrap_or_default()
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value)?;
                self.api.base_url = Some(value.to_string());
            }
            "api.token" => self.api.token = Some(value.to_string()),
            "api.timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        DeskError::Config(format!(
                            "invalid timeout '{value}', expected a positive number of seconds"
                        ))
                    })?;
                self.api.timeout_secs = Some(secs);
            }
            "actor.id" => {
                let id = value
                    .parse::<u64>()
                    .map_err(|_| DeskError::Config(format!("invalid actor id '{value}'")))?;
                self.actor.get_or_insert_with(Actor::default).id = id;
            }
            "actor.name" => {
                self.actor.get_or_insert_with(Actor::default).name = value.to_string();
            }
            "actor.profile" => {
                let profile: Profile = value.parse()?;
                self.actor.get_or_insert_with(Actor::default).profile = profile;
            }
            "greeting.template" => self.greeting.template = Some(value.to_string()),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Get a value by dotted key. Secrets are returned as stored.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.base_url" => self.api_base_url(),
            "api.token" => self.api_token(),
            "api.timeout_secs" => Some(self.timeout().as_secs().to_string()),
            "actor.id" => self.actor.as_ref().map(|a| a.id.to_string()),
            "actor.name" => self.actor.as_ref().map(|a| a.name.clone()),
            "actor.profile" => self.actor.as_ref().map(|a| a.profile.to_string()),
            "greeting.template" => Some(
                self.greeting
                    .template
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GREETING_TEMPLATE.to_string()),
            ),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }
}

fn unknown_key(key: &str) -> DeskError {
    DeskError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api.base_url.is_none());
        assert!(config.actor.is_none());
        assert!(config.actor().is_err());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".deskbox").join("config.yaml");

        let mut config = Config::default();
        config.set("api.base_url", "https://desk.example.com/api").unwrap();
        config.set("actor.id", "3").unwrap();
        config.set("actor.name", "Ana").unwrap();
        config.set("actor.profile", "admin").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(
            loaded.api.base_url.as_deref(),
            Some("https://desk.example.com/api")
        );
        let actor = loaded.actor().unwrap();
        assert_eq!(actor.id, 3);
        assert_eq!(actor.name, "Ana");
        assert!(actor.is_admin());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert!(config.actor.is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("api.base_url", "not a url").is_err());
        assert!(config.set("actor.id", "abc").is_err());
        assert!(config.set("actor.profile", "root").is_err());
        assert!(config.set("api.timeout_secs", "-1").is_err());
        assert!(config.set("unknown.key", "x").is_err());
    }

    #[test]
    fn test_partial_actor_is_not_usable() {
        let mut config = Config::default();
        config.set("actor.name", "Ana").unwrap();
        let err = config.actor().unwrap_err();
        assert!(err.to_string().contains("actor.id"), "{err}");

        let mut config = Config::default();
        config.set("actor.id", "5").unwrap();
        let err = config.actor().unwrap_err();
        assert!(err.to_string().contains("actor.name"), "{err}");

        config.set("actor.name", "Ana").unwrap();
        assert_eq!(config.actor().unwrap().id, 5);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = Config::default();
        assert!(config.set("api.timeout_secs", "0").is_err());
        assert_eq!(config.timeout(), Duration::from_secs(30));

        config.api.timeout_secs = Some(0);
        assert_eq!(config.timeout(), Duration::from_secs(30));

        config.set("api.timeout_secs", "5").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_greeting_render() {
        let greeting = Greeting::default();
        let body = greeting.render("Ana");
        assert!(body.starts_with("Automated message:\n"));
        assert!(body.contains("my name is Ana"));
        assert!(body.contains("{{name}}"));
    }

    #[test]
    fn test_custom_greeting_template() {
        let mut config = Config::default();
        config.set("greeting.template", "  Hi, {actor} here.  ").unwrap();
        assert_eq!(
            config.greeting().render("Bruno"),
            "Automated message:\nHi, Bruno here."
        );
    }
}
