#[derive(Clone, Debug)]
pub struct Config {
    pub llm: LlmConfig,
}

impl Config {
    /// Load the configuration from the environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    /// A missing `OPENAI_API_KEY` is not fatal here; each request reports it instead.
    pub fn from_env() -> Self {
        let defaults = LlmConfig::default();
        let llm = LlmConfig {
            api_key: dotenvy::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            api_base: dotenvy::var("OPENAI_API_BASE").ok(),
            model: dotenvy::var("CHEF_MODEL").unwrap_or(defaults.model),
            ..defaults
        };
        Config { llm }
    }
}

#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Overrides the provider's default base URL, e.g. for an OpenAI-compatible local server
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "gpt-4".into(),
            temperature: 0.5,
            max_tokens: 500,
        }
    }
}

// Keep the key out of logs
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
