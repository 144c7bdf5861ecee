//! Conversation session: turn-taking between the user and a response provider
//!
//! A session owns its message store and at most one outstanding provider
//! call. The call runs as a tokio task so the caller keeps rendering while it
//! is in flight; [`ConversationSession::settle`] applies the result once it
//! arrives. Dropping the session aborts the task, so a late reply can never
//! land in a conversation that no longer exists.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ProviderError;
use crate::provider::{ProviderKind, ResponseProvider};
use crate::state::ChatTurn;
use crate::store::MessageStore;

pub const GREETING: &str = "Hey User, how's the quarter going?";

/// Shown in place of a reply when the provider fails in any way
pub const PROVIDER_APOLOGY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

/// Shown when the provider task itself dies (panic or abort)
pub const INTERNAL_APOLOGY: &str = "I'm sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    AwaitingResponse,
    /// The last provider call failed; new submissions are still accepted
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// Input was empty after trimming
    Ignored,
    /// A provider call is already outstanding
    Busy,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub response_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            response_timeout: config.response_timeout(),
        }
    }
}

type ProviderTask = JoinHandle<Result<String, ProviderError>>;

pub struct ConversationSession {
    id: Uuid,
    store: MessageStore,
    status: SessionStatus,
    provider: Arc<dyn ResponseProvider>,
    options: SessionOptions,
    in_flight: Option<ProviderTask>,
}

impl ConversationSession {
    /// Begin a session seeded with the greeting turn
    pub fn start(provider: Arc<dyn ResponseProvider>, options: SessionOptions) -> Self {
        let mut store = MessageStore::new();
        store.append(ChatTurn::assistant(GREETING));

        let id = Uuid::new_v4();
        tracing::info!(session = %id, provider = provider.kind().as_str(), "conversation started");

        Self {
            id,
            store,
            status: SessionStatus::Idle,
            provider,
            options,
            in_flight: None,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        self.store.all()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == SessionStatus::AwaitingResponse
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Append the user's message and start the provider call.
    ///
    /// Must be called from within a tokio runtime. Never fails: empty input
    /// and submissions while a call is outstanding are no-ops, reported
    /// through the returned outcome.
    pub fn submit_user_message(&mut self, raw_text: &str) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.in_flight.is_some() {
            tracing::debug!(session = %self.id, "submission ignored while awaiting response");
            return SubmitOutcome::Busy;
        }

        let history = self.store.all().to_vec();
        self.store.append(ChatTurn::user(text));
        self.status = SessionStatus::AwaitingResponse;

        let provider = Arc::clone(&self.provider);
        let timeout = self.options.response_timeout;
        let message = text.to_string();
        self.in_flight = Some(tokio::spawn(async move {
            match tokio::time::timeout(timeout, provider.respond(&message, &history)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(timeout.as_secs())),
            }
        }));

        tracing::debug!(session = %self.id, turns = self.store.len(), "user message submitted");
        SubmitOutcome::Sent
    }

    /// Wait for the outstanding provider call and append its reply.
    ///
    /// Returns `None` immediately when nothing is outstanding. Cancel-safe:
    /// dropping this future before it completes leaves the call in flight for
    /// the next `settle`.
    pub async fn settle(&mut self) -> Option<&ChatTurn> {
        let task = self.in_flight.as_mut()?;
        let joined = task.await;

        debug_assert_eq!(self.status, SessionStatus::AwaitingResponse);
        self.in_flight = None;

        let (text, status) = match joined {
            Ok(Ok(reply)) => (reply, SessionStatus::Idle),
            Ok(Err(err)) => {
                tracing::warn!(session = %self.id, error = %err, "response provider failed");
                (PROVIDER_APOLOGY.to_string(), SessionStatus::Errored)
            }
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "response task did not complete");
                (INTERNAL_APOLOGY.to_string(), SessionStatus::Errored)
            }
        };

        self.store.append(ChatTurn::assistant(text));
        self.status = status;
        tracing::debug!(session = %self.id, turns = self.store.len(), "assistant turn appended");

        self.store.last()
    }

    /// End the session, discarding any reply still in flight
    pub fn close(self) {
        tracing::info!(session = %self.id, turns = self.store.len(), "conversation closed");
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
            tracing::debug!(session = %self.id, "outstanding response discarded");
        }
    }
}
