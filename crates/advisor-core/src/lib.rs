pub mod ai;
pub mod config;
pub mod error;
pub mod provider;
pub mod session;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use ai::{CannedProvider, HttpProvider};
pub use config::Config;
pub use error::{ConfigError, ProviderError};
pub use provider::{ProviderKind, ResponseProvider};
pub use session::{ConversationSession, SessionOptions, SessionStatus, SubmitOutcome};
pub use state::{ChatRole, ChatTurn, TurnId};
pub use store::MessageStore;
