//! Shared test harness for E2E integration tests.
//!
//! Runs the real bot API router against the real Google Sheets source and
//! chat completion client, each pointed at its own wiremock server.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ap_assistant::ChatCompletionResponder;
use ap_bot_api::config::BotConfig;
use ap_bot_api::routes::build_router;
use ap_bot_api::state::AppState;
use ap_sheets::SheetsSource;

pub const SPREADSHEET_ID: &str = "e2e-sheet";
pub const SHEETS_KEY: &str = "sheet-key";
pub const OPENAI_KEY: &str = "sk-e2e";
pub const SITE_URL: &str = "https://dealer.example/car.html";
pub const MANAGER: &str = "dealer_sales";

/// End-to-end harness: bot API + mocked sheet + mocked completion service.
pub struct TestHarness {
    pub sheet_server: MockServer,
    pub completion_server: MockServer,
    pub state: AppState,
    pub router: Router,
}

impl TestHarness {
    /// Harness with no mocks mounted; every upstream call gets a 404.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Harness whose config can be adjusted before the state is built.
    pub async fn start_with(adjust: impl FnOnce(&mut BotConfig)) -> Self {
        let sheet_server = MockServer::start().await;
        let completion_server = MockServer::start().await;

        let mut config = BotConfig::default();
        config.sheets.spreadsheet_id = SPREADSHEET_ID.into();
        config.sheets.base_url = sheet_server.uri();
        config.sheets.timeout_secs = 2;
        config.sheets.api_key = Some(SHEETS_KEY.into());
        config.completion.base_url = completion_server.uri();
        config.completion.timeout_secs = 2;
        config.completion.api_key = Some(OPENAI_KEY.into());
        config.links.site_url = SITE_URL.into();
        config.links.manager_username = MANAGER.into();
        adjust(&mut config);

        let records = Arc::new(SheetsSource::new(config.sheets.clone()).unwrap());
        let responder = Arc::new(ChatCompletionResponder::new(config.completion.clone()).unwrap());
        let state = AppState::new(records, responder, config.assistant_config());
        let router = build_router(state.clone());

        Self {
            sheet_server,
            completion_server,
            state,
            router,
        }
    }

    /// Harness with the standard inventory mounted.
    pub async fn with_inventory() -> Self {
        let h = Self::start().await;
        h.mount_sheet(inventory_rows()).await;
        h
    }

    /// Serve `rows` (header first) from the values endpoint.
    pub async fn mount_sheet(&self, rows: Value) {
        Mock::given(method("GET"))
            .and(path_regex(format!(r"^/v4/spreadsheets/{SPREADSHEET_ID}/values/.+$")))
            .and(query_param("key", SHEETS_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "'Наличие'!A1:J100",
                "majorDimension": "ROWS",
                "values": rows,
            })))
            .mount(&self.sheet_server)
            .await;
    }

    pub async fn mount_sheet_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.sheet_server)
            .await;
    }

    pub async fn mount_sheet_delay(&self, delay: Duration) {
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"values": inventory_rows()}))
                    .set_delay(delay),
            )
            .mount(&self.sheet_server)
            .await;
    }

    /// Answer every completion request with `content`.
    pub async fn mount_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", format!("Bearer {OPENAI_KEY}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-e2e",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }]
            })))
            .mount(&self.completion_server)
            .await;
    }

    pub async fn mount_completion_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.completion_server)
            .await;
    }

    /// Bodies of every completion request received so far.
    pub async fn completion_requests(&self) -> Vec<Value> {
        self.completion_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// POST /api/v1/messages. Returns (HTTP status, response JSON).
    pub async fn send_message(&self, user_id: i64, text: &str) -> (StatusCode, Value) {
        self.post(
            "/api/v1/messages",
            json!({"user_id": user_id, "username": "e2e", "text": text}),
        )
        .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.call(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// Inventory sheet rows, header first, as the values API returns them.
pub fn inventory_rows() -> Value {
    json!([
        ["ID", "Марка", "Модель", "Год", "Цена", "Пробег", "КПП", "Двигатель", "Кузов", "Цвет"],
        ["001", "BMW", "X1", "2019", "450000", "88 000", "Автомат", "Бензин", "Кроссовер", "Белый"],
        ["002", "BMW", "X1", "2020", "600000", "61 000", "Автомат", "Дизель", "Кроссовер", "Чёрный"],
        ["003", "Kia", "Rio", "2019", "1 150 000", "68 000", "Автомат", "Бензин", "Седан", "Синий"],
        ["004", "Hyundai", "Solaris", "2017", "890 000", "95 000", "Механика", "Бензин", "Седан"],
        ["005", "Toyota", "Camry", "2022", "3 650 000", "18 000", "Автомат", "Гибрид", "Седан", "Чёрный"],
        ["006", "Lada", "Vesta", "2021", "по запросу", "30 000", "Механика", "Бензин", "Седан", "Серый"]
    ])
}

/// Message texts of a `BotReply` JSON body.
pub fn texts(reply: &Value) -> Vec<String> {
    reply["messages"]
        .as_array()
        .map(|msgs| {
            msgs.iter()
                .filter_map(|m| m["text"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// IDs linked from the details buttons of a `BotReply` JSON body.
pub fn linked_ids(reply: &Value) -> Vec<String> {
    reply["messages"]
        .as_array()
        .map(|msgs| {
            msgs.iter()
                .filter_map(|m| m["buttons"][0]["url"].as_str())
                .filter(|url| url.starts_with(SITE_URL))
                .filter_map(|url| url.rsplit("id=").next().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
