//! CLI command implementations.
//!
//! Every command builds a JSON value and a human-readable rendering and lets
//! [`CommandOutput`] pick one based on `--json`.

mod config;
mod inbox;
mod ls;
mod peek;
mod transition;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use inbox::cmd_inbox;
pub use ls::{cmd_ls, cmd_show};
pub use peek::cmd_peek;
pub use transition::{cmd_select, cmd_transition};

use serde_json::Value;

use crate::api::HttpApi;
use crate::config::Config;
use crate::error::Result;
use crate::types::TicketStatus;

/// Output of a command in both machine and human form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form (falling back to JSON)
    pub fn print(self, output_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !output_json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Load the config file and open an API client from it
fn connect() -> Result<(Config, HttpApi)> {
    let config = Config::load()?;
    let api = HttpApi::from_config(&config)?;
    Ok((config, api))
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<TicketStatus>> {
    status.map(str::parse).transpose()
}
