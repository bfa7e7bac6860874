//! Chat-completion providers used to write recipes.
//!
//! The handler only sees [`ChatProvider`], so tests can swap in [`FakeProvider`]
//! instead of calling out to the network.

mod fake;
mod openai;

pub use fake::FakeProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use thiserror::Error;

pub const SYSTEM_PROMPT: &str =
    "You are a professional chef assistant. Explain cooking steps clearly, step-by-step.";

/// Everything that can go wrong between building the prompt and reading the completion.
///
/// These stay separate inside the server and only become plain text in the response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("No API key configured for the chat-completion provider (set OPENAI_API_KEY)")]
    MissingCredential,
    #[error("Connection error: {0}")]
    Transport(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Could not build completion request: {0}")]
    InvalidRequest(String),
    #[error("No response from LLM")]
    EmptyCompletion,
}

/// The two messages sent for every recipe: a fixed system instruction and the user's ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePrompt {
    pub system: String,
    pub user: String,
}

impl RecipePrompt {
    pub fn for_dish(dish: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.into(),
            user: format!("Give me a step-by-step recipe for {dish}."),
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the prompt and wait for the whole completion text.
    async fn complete(&self, prompt: &RecipePrompt) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}
