use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::ai::{CannedProvider, HttpProvider};
use crate::config::Config;
use crate::error::ProviderError;
use crate::state::ChatTurn;

/// Produces the next assistant reply for a user message.
///
/// `history` holds the turns that preceded `message`, oldest first.
/// Implementations may take any amount of time; the session wraps every call
/// in its own timeout.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    async fn respond(&self, message: &str, history: &[ChatTurn]) -> Result<String, ProviderError>;

    fn kind(&self) -> ProviderKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Canned,
    Http,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Canned => "canned",
            ProviderKind::Http => "http",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Canned => "Offline preview",
            ProviderKind::Http => "Advisor service",
        }
    }
}

/// Pick the remote provider when an endpoint is configured, the canned
/// stand-in otherwise.
pub fn from_config(config: &Config) -> Arc<dyn ResponseProvider> {
    match config.endpoint() {
        Some(endpoint) => {
            tracing::info!(%endpoint, "using remote response provider");
            Arc::new(HttpProvider::new(endpoint, config.user_id()))
        }
        None => {
            tracing::info!("no endpoint configured, using canned responses");
            Arc::new(CannedProvider::new(Duration::from_millis(config.stub_delay_ms())))
        }
    }
}
