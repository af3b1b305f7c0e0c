use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chef_engine::AssistantSettings;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assistant_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub tick_millis: u64,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let assistant = AssistantSettings::default();
        Self {
            assistant_base_url: assistant.base_url,
            connect_timeout_secs: assistant.connect_timeout.as_secs(),
            request_timeout_secs: assistant.request_timeout.as_secs(),
            tick_millis: 1000,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn assistant_settings(&self) -> AssistantSettings {
        AssistantSettings {
            base_url: self.assistant_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}

/// Reads the config file. A missing file yields defaults; an unreadable or
/// malformed one is an error.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };

    ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
