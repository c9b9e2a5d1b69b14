//! AutoPick bot API: HTTP front for the car-selection assistant.
//!
//! A chat transport (Telegram webhook relay, web widget) posts user
//! messages here and delivers the returned `BotReply` messages.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ap_assistant::{ChatCompletionResponder, FallbackResponder};
use ap_bot_api::config::BotConfig;
use ap_bot_api::routes;
use ap_bot_api::state::AppState;
use ap_sheets::{MockRecordSource, RecordSource, SheetsSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ap-bot-api starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/autopick/bot.toml".to_string());

    let mut config = if std::path::Path::new(&config_path).exists() {
        BotConfig::from_file(&config_path)?
    } else {
        tracing::warn!(path = %config_path, "config file not found, using defaults");
        BotConfig::default()
    };
    config.apply_env();

    // ── Record source ───────────────────────────────────────────
    let records: Arc<dyn RecordSource> = if config.uses_sheet() {
        if config.sheets.api_key.is_none() {
            tracing::warn!("SHEETS_API_KEY not set, sheet must be publicly readable");
        }
        tracing::info!(
            worksheet = %config.sheets.worksheet,
            "reading inventory from google sheets"
        );
        Arc::new(SheetsSource::new(config.sheets.clone())?)
    } else {
        tracing::warn!("no spreadsheet_id configured, serving sample inventory");
        Arc::new(MockRecordSource::with_sample_inventory())
    };

    // ── Fallback completion ─────────────────────────────────────
    if config.completion.enabled {
        if config.completion.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, fallback replies will fail");
        }
        tracing::info!(model = %config.completion.model, "fallback completion enabled");
    } else {
        tracing::info!("fallback completion disabled");
    }
    let responder: Arc<dyn FallbackResponder> =
        Arc::new(ChatCompletionResponder::new(config.completion.clone())?);

    let state = AppState::new(records, responder, config.assistant_config());
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
