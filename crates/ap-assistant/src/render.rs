//! Outgoing message rendering: car cards, fixed texts and link buttons.

use reqwest::Url;

use ap_protocol::{MISSING_PLACEHOLDER, OutgoingMessage, Record};

use crate::config::LinksConfig;

pub const DETAILS_LABEL: &str = "📩 Подробнее";
pub const MANAGER_LABEL: &str = "Связаться с менеджером";

pub const GREETING: &str = "Привет! Напишите, какой автомобиль ищете, например: «BMW X1 до 2,5 млн».";

pub const HELP: &str = "👋 Я помогу подобрать автомобиль из наличия.\n\
Напишите, что ищете, например:\n\
«седан автомат от 2019 до 2022» или «Kia Rio бензин».\n\n\
Можно указать бюджет («до 1,5 млн»), год и пробег («до 80 тыс км»).\n\
Если не получится определиться, я предложу связаться с менеджером.";

pub const CAR_NOT_FOUND: &str = "Автомобиль с таким ID не найден 😕";

pub const APOLOGY: &str =
    "Помощник пока недоступен. Попробуйте уточнить запрос или спросить о другой машине.";

pub const MANAGER_PROMPT: &str = "Менеджер ответит на ваши вопросы в Telegram:";

const MANAGER_GREETING: &str = "Здравствуйте! Хочу обсудить подбор автомобиля.";

/// `key: value` lines in sheet column order; blank cells show a placeholder.
pub fn record_text(record: &Record) -> String {
    record
        .iter()
        .map(|(key, value)| {
            let value = value.trim();
            let value = if value.is_empty() {
                MISSING_PLACEHOLDER
            } else {
                value
            };
            format!("{key}: {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A car card with a details button when the record has an ID.
pub fn car_message(record: &Record, links: &LinksConfig) -> OutgoingMessage {
    attach_details(OutgoingMessage::text(record_text(record)), record, links)
}

/// Full card for a `/start id_…` deep link.
pub fn car_details_message(record: &Record, links: &LinksConfig) -> OutgoingMessage {
    let text = format!("Информация по выбранному авто:\n\n{}", record_text(record));
    attach_details(OutgoingMessage::text(text), record, links)
}

fn attach_details(message: OutgoingMessage, record: &Record, links: &LinksConfig) -> OutgoingMessage {
    match record.id().and_then(|id| details_url(&links.site_url, id)) {
        Some(url) => message.with_button(DETAILS_LABEL, url),
        None => message,
    }
}

/// `<site_url>?id=<id>`, or `None` when `site_url` is not a valid URL.
pub fn details_url(site_url: &str, id: &str) -> Option<String> {
    match Url::parse_with_params(site_url, [("id", id)]) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            tracing::warn!(error = %e, site_url, "invalid site url, details button dropped");
            None
        }
    }
}

/// Telegram deep link to the manager with a prefilled greeting and the
/// user's earlier queries.
pub fn manager_url(manager_username: &str, queries: &[String]) -> String {
    let mut text = MANAGER_GREETING.to_string();
    if !queries.is_empty() {
        text.push_str("\n\nМои запросы:\n");
        text.push_str(&queries.join("\n"));
    }
    format!(
        "https://t.me/{}?text={}",
        manager_username.trim_start_matches('@'),
        urlencoding::encode(&text)
    )
}

pub fn manager_message(links: &LinksConfig, queries: &[String]) -> OutgoingMessage {
    OutgoingMessage::text(MANAGER_PROMPT)
        .with_button(MANAGER_LABEL, manager_url(&links.manager_username, queries))
}
