//! Dialogue orchestration: one inbound message in, one `BotReply` out.
//!
//! Flow for plain text: fetch inventory, try each configured search mode in
//! order, and fall back to the completion service with the user's history
//! when nothing matched. A fallback reply that signals uncertainty gets an
//! extra message with a manager handoff button.

use std::sync::Arc;

use serde::Serialize;

use ap_protocol::{
    BotReply, FilterSpec, IncomingMessage, OutgoingMessage, Record, ReplySource, SearchMode, Turn,
};
use ap_search::{QueryEngine, extract, needs_escalation};
use ap_sheets::{RecordSource, SheetResult};

use crate::completion::FallbackResponder;
use crate::config::{AssistantConfig, LinksConfig};
use crate::history::ConversationStore;
use crate::render;

const DEEP_LINK_PREFIX: &str = "id_";

/// Slash commands understood by the assistant.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    /// `/start`, optionally with a deep-link payload.
    Start(Option<&'a str>),
    Help,
    /// Any other `/…` text.
    Unknown,
}

impl<'a> Command<'a> {
    /// `None` for ordinary text. Accepts the `/cmd@botname` form.
    fn parse(text: &'a str) -> Option<Self> {
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or(head);
        let command = match name.to_lowercase().as_str() {
            "start" => Self::Start(Some(args).filter(|a| !a.is_empty())),
            "help" => Self::Help,
            _ => Self::Unknown,
        };
        Some(command)
    }
}

/// Extraction and matching result for the search preview route.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPreview {
    pub mode: SearchMode,
    pub criteria: FilterSpec,
    pub matches: Vec<Record>,
}

/// The chat assistant. Cheap to share behind an `Arc`; every message is
/// handled independently.
pub struct Assistant {
    records: Arc<dyn RecordSource>,
    responder: Arc<dyn FallbackResponder>,
    history: ConversationStore,
    engine: QueryEngine,
    search_order: Vec<SearchMode>,
    links: LinksConfig,
}

impl Assistant {
    pub fn new(
        records: Arc<dyn RecordSource>,
        responder: Arc<dyn FallbackResponder>,
        config: AssistantConfig,
    ) -> Self {
        let search_order = if config.search.order.is_empty() {
            vec![SearchMode::Structured]
        } else {
            config.search.order
        };
        Self {
            records,
            responder,
            history: ConversationStore::new(&config.history),
            engine: QueryEngine::new(config.search.cap),
            search_order,
            links: config.links,
        }
    }

    pub fn history(&self) -> &ConversationStore {
        &self.history
    }

    /// Answer one inbound message. Never fails: collaborator errors become
    /// an empty inventory or an apology.
    pub async fn handle(&self, message: &IncomingMessage) -> BotReply {
        let user_id = message.user_id;
        let text = message.text.trim();
        tracing::info!(
            user_id,
            username = message.username.as_deref().unwrap_or(""),
            text_len = text.len(),
            "message received"
        );

        if text.is_empty() {
            return Self::command_reply(user_id, OutgoingMessage::text(render::HELP));
        }

        match Command::parse(text) {
            Some(Command::Start(Some(payload))) => self.deep_link(user_id, payload).await,
            Some(Command::Start(None)) => {
                Self::command_reply(user_id, OutgoingMessage::text(render::GREETING))
            }
            Some(Command::Help | Command::Unknown) => {
                Self::command_reply(user_id, OutgoingMessage::text(render::HELP))
            }
            None => self.answer_query(user_id, text).await,
        }
    }

    /// Look up one car by its sheet ID.
    pub async fn car_by_id(&self, id: &str) -> SheetResult<Option<Record>> {
        self.records.find_by_id(id).await
    }

    /// Run one search mode without fallback, for diagnostics.
    pub async fn preview(&self, text: &str, mode: SearchMode) -> SheetResult<SearchPreview> {
        let records = self.records.fetch_all().await?;
        let matches = self
            .engine
            .run(mode, text, &records)
            .into_iter()
            .cloned()
            .collect();
        Ok(SearchPreview {
            mode,
            criteria: extract(text),
            matches,
        })
    }

    fn command_reply(user_id: i64, message: OutgoingMessage) -> BotReply {
        BotReply::new(user_id, ReplySource::Command, vec![message])
    }

    async fn deep_link(&self, user_id: i64, payload: &str) -> BotReply {
        let Some(car_id) = payload.strip_prefix(DEEP_LINK_PREFIX) else {
            return Self::command_reply(user_id, OutgoingMessage::text(render::GREETING));
        };
        let message = match self.car_by_id(car_id).await {
            Ok(Some(record)) => render::car_details_message(&record, &self.links),
            Ok(None) => OutgoingMessage::text(render::CAR_NOT_FOUND),
            Err(e) => {
                tracing::warn!(
                    user_id,
                    car_id,
                    source = self.records.source_name(),
                    error = %e,
                    "car lookup failed"
                );
                OutgoingMessage::text(render::CAR_NOT_FOUND)
            }
        };
        Self::command_reply(user_id, message)
    }

    async fn answer_query(&self, user_id: i64, text: &str) -> BotReply {
        let records = self.load_records(user_id).await;

        for mode in &self.search_order {
            let found = match mode {
                SearchMode::FreeText => self.engine.free_text(text, &records),
                SearchMode::Structured => {
                    // No criteria would match the whole inventory.
                    let spec = extract(text);
                    if spec.is_empty() {
                        continue;
                    }
                    self.engine.with_spec(&spec, &records)
                }
            };
            if found.is_empty() {
                continue;
            }
            tracing::info!(
                user_id,
                mode = mode.as_str(),
                match_count = found.len(),
                "inventory matched"
            );
            let messages = found
                .iter()
                .map(|r| render::car_message(r, &self.links))
                .collect();
            let source = match mode {
                SearchMode::FreeText => ReplySource::FreeText,
                SearchMode::Structured => ReplySource::Structured,
            };
            return BotReply::new(user_id, source, messages);
        }

        tracing::debug!(user_id, scanned = records.len(), "no inventory match, falling back");
        self.fallback(user_id, text).await
    }

    /// Inventory for this message; a failing source reads as empty.
    async fn load_records(&self, user_id: i64) -> Vec<Record> {
        match self.records.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    source = self.records.source_name(),
                    error = %e,
                    "record source failed, treating inventory as empty"
                );
                Vec::new()
            }
        }
    }

    async fn fallback(&self, user_id: i64, text: &str) -> BotReply {
        let earlier = self.history.history(user_id).await;
        // The query is kept even if completion fails, so a later manager
        // handoff still carries it.
        self.history.append(user_id, Turn::user(text)).await;

        let reply = match self.responder.complete(text, &earlier).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    responder = self.responder.responder_name(),
                    error = %e,
                    "fallback completion failed"
                );
                return BotReply::new(
                    user_id,
                    ReplySource::Apology,
                    vec![OutgoingMessage::text(render::APOLOGY)],
                );
            }
        };

        self.history
            .append(user_id, Turn::assistant(reply.clone()))
            .await;

        let escalated = needs_escalation(&reply);
        let mut messages = vec![OutgoingMessage::text(reply)];
        if escalated {
            let queries = self.history.user_queries(user_id).await;
            messages.push(render::manager_message(&self.links, &queries));
            tracing::info!(user_id, "manager handoff offered");
        }

        let mut bot_reply = BotReply::new(user_id, ReplySource::Fallback, messages);
        bot_reply.escalated = escalated;
        bot_reply
    }
}
