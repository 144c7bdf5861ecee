use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::{ProviderKind, ResponseProvider};
use crate::state::ChatTurn;

/// Reply used when the service answers successfully but without any text
pub const NO_RESPONSE: &str = "No response received";

/// Field names the service may put its reply under, in priority order
const REPLY_FIELDS: [&str; 3] = ["response", "message", "text"];

#[derive(Serialize)]
struct HistoryEntry<'a> {
    role: &'static str,
    text: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    user_id: &'a str,
    history: Vec<HistoryEntry<'a>>,
}

/// Remote advisor service reached with a single JSON request/response
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    endpoint: String,
    user_id: String,
}

impl HttpProvider {
    pub fn new(endpoint: &str, user_id: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

#[async_trait]
impl ResponseProvider for HttpProvider {
    async fn respond(&self, message: &str, history: &[ChatTurn]) -> Result<String, ProviderError> {
        let request = ChatRequest {
            message,
            user_id: &self.user_id,
            history: history
                .iter()
                .map(|turn| HistoryEntry {
                    role: turn.role().as_str(),
                    text: turn.text(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, %body, "advisor service rejected request");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        Ok(extract_reply(&payload))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Http
    }
}

/// First non-empty string among the accepted reply fields, or [`NO_RESPONSE`]
pub fn extract_reply(payload: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| payload.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(NO_RESPONSE)
        .to_string()
}
