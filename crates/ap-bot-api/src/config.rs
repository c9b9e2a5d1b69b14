//! Bot server configuration, loaded from TOML with secrets from the environment.

use serde::Deserialize;

use ap_assistant::{AssistantConfig, CompletionConfig, HistoryConfig, LinksConfig, SearchConfig};
use ap_sheets::SheetsConfig;

pub const SHEETS_API_KEY_VAR: &str = "SHEETS_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Top-level configuration for the bot server.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Inventory sheet. An empty `spreadsheet_id` selects the built-in sample inventory.
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl BotConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Fill API keys from `SHEETS_API_KEY` and `OPENAI_API_KEY`.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty(SHEETS_API_KEY_VAR) {
            self.sheets.api_key = Some(key);
        }
        if let Some(key) = non_empty(OPENAI_API_KEY_VAR) {
            self.completion.api_key = Some(key);
        }
    }

    /// Whether a real spreadsheet is configured.
    pub fn uses_sheet(&self) -> bool {
        !self.sheets.spreadsheet_id.trim().is_empty()
    }

    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            search: self.search.clone(),
            links: self.links.clone(),
            history: self.history.clone(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sheets: SheetsConfig::default(),
            completion: CompletionConfig::default(),
            history: HistoryConfig::default(),
            search: SearchConfig::default(),
            links: LinksConfig::default(),
        }
    }
}
