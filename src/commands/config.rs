//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a value by dotted key

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn or_unset(value: Option<String>) -> String {
    value.unwrap_or_else(|| "not configured".dimmed().to_string())
}

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let token = config.api_token().map(|t| mask_sensitive_value(&t));

    let json_output = json!({
        "api": {
            "base_url": config.api_base_url(),
            "token_configured": token.is_some(),
            "timeout_secs": config.timeout().as_secs(),
        },
        "actor": config.actor,
        "greeting": {
            "template": config.get("greeting.template")?,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());

    text.push_str(&format!("{}:\n", "api".cyan()));
    text.push_str(&format!("  base_url: {}\n", or_unset(config.api_base_url())));
    text.push_str(&format!("  token: {}\n", or_unset(token)));
    text.push_str(&format!("  timeout_secs: {}\n\n", config.timeout().as_secs()));

    text.push_str(&format!("{}:\n", "actor".cyan()));
    match &config.actor {
        Some(actor) => {
            text.push_str(&format!("  id: {}\n", actor.id));
            text.push_str(&format!("  name: {}\n", actor.name));
            text.push_str(&format!("  profile: {}\n\n", actor.profile));
        }
        None => text.push_str(&format!("  {}\n\n", "not configured".dimmed())),
    }

    text.push_str(&format!("{}:\n", "greeting".cyan()));
    text.push_str(&format!(
        "  template: {}\n\n",
        or_unset(config.get("greeting.template")?)
    ));

    text.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text)
        .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "api.token" {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(output_json)
}

/// Print a configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value.unwrap_or_default())
    .print(output_json)
}
