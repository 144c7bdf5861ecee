use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::error::ProviderError;
use crate::provider::{ProviderKind, ResponseProvider};
use crate::state::ChatTurn;

const CANNED_RESPONSES: [&str; 5] = [
    "I can totally help with that User! I can see that you've completed the CSE 12X series as well as your math requirements, which opens the doors to many classes you can take this year. Are there any classes you have planned to take or requirements you want to complete? I can accommodate many of your preferences!",
    "That sounds like a great plan! Let me help you create a balanced schedule that meets your academic goals while keeping your workload manageable.",
    "I understand you want to complete CSE 332 and CSE 421 this year while maintaining a light workload. Let me help you plan a balanced schedule that meets your requirements.",
    "Great question! Based on your academic progress, I can suggest several options that would work well for your sophomore year planning.",
    "I'd be happy to help you plan your course schedule! What specific requirements or interests do you have in mind for this year?",
];

/// Stand-in provider used when no advisor endpoint is configured.
///
/// Waits `delay`, then answers with one of a fixed set of replies chosen
/// uniformly at random.
#[derive(Clone)]
pub struct CannedProvider {
    delay: Duration,
    responses: Vec<String>,
}

impl CannedProvider {
    pub fn new(delay: Duration) -> Self {
        Self::with_responses(delay, CANNED_RESPONSES.iter().map(|r| r.to_string()).collect())
    }

    pub fn with_responses(delay: Duration, responses: Vec<String>) -> Self {
        Self { delay, responses }
    }
}

#[async_trait]
impl ResponseProvider for CannedProvider {
    async fn respond(&self, _message: &str, _history: &[ChatTurn]) -> Result<String, ProviderError> {
        tokio::time::sleep(self.delay).await;

        self.responses
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ProviderError::Other("no canned responses available".to_string()))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Canned
    }
}
