use async_trait::async_trait;

use super::{ChatProvider, LlmError, RecipePrompt};

/// A provider that never leaves the process: it answers every prompt the same way.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    reply: Result<String, LlmError>,
}

impl FakeProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self { reply: Err(error) }
    }
}

#[async_trait]
impl ChatProvider for FakeProvider {
    async fn complete(&self, prompt: &RecipePrompt) -> Result<String, LlmError> {
        tracing::debug!("Fake completion for: {}", prompt.user);
        self.reply.clone()
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}
