//! Assistant configuration sections.

use serde::Deserialize;

use ap_protocol::SearchMode;
use ap_search::QueryEngine;

use crate::history::HistoryConfig;

/// Search behaviour for plain-text messages.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Maximum records returned per message.
    #[serde(default = "default_cap")]
    pub cap: usize,
    /// Modes tried in order; the first one with matches wins.
    #[serde(default = "default_order")]
    pub order: Vec<SearchMode>,
}

fn default_cap() -> usize {
    QueryEngine::DEFAULT_CAP
}
fn default_order() -> Vec<SearchMode> {
    vec![SearchMode::FreeText, SearchMode::Structured]
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cap: default_cap(),
            order: default_order(),
        }
    }
}

/// Outbound links rendered into buttons.
#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    /// Car page on the public site; `?id=<ID>` is appended.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Telegram username of the sales manager (without `@`).
    #[serde(default = "default_manager_username")]
    pub manager_username: String,
}

fn default_site_url() -> String {
    "https://autopick.github.io/autopick-site/car.html".into()
}
fn default_manager_username() -> String {
    "autopick_sales".into()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            manager_username: default_manager_username(),
        }
    }
}

/// Everything the dialogue layer needs besides its collaborators.
#[derive(Debug, Clone, Default)]
pub struct AssistantConfig {
    pub search: SearchConfig,
    pub links: LinksConfig,
    pub history: HistoryConfig,
}
