use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use super::{ChatProvider, LlmError, RecipePrompt};
use crate::config::LlmConfig;

/// Chat completions from OpenAI, or any server that speaks its API.
#[derive(Clone)]
pub struct OpenAiProvider {
    // None when no key was configured; every call then fails with MissingCredential
    client: Option<Client<OpenAIConfig>>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            let mut openai_config = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = &config.api_base {
                openai_config = openai_config.with_api_base(base);
            }
            // One attempt only: a 429 is reported like any other upstream error
            Client::with_config(openai_config).with_backoff(
                backoff::ExponentialBackoffBuilder::new()
                    .with_max_elapsed_time(Some(Duration::ZERO))
                    .build(),
            )
        });
        if client.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set, recipe requests will report an error");
        }
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Build the non-streamed completion request for a prompt.
    pub fn build_request(
        &self,
        prompt: &RecipePrompt,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system.as_str())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user.as_str())
                .build()?
                .into(),
        ];
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
    }
}

impl From<OpenAIError> for LlmError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::Reqwest(e) => LlmError::Transport(e.to_string()),
            OpenAIError::ApiError(e) => LlmError::Upstream(e.message),
            OpenAIError::JSONDeserialize(e) => LlmError::Upstream(e.to_string()),
            OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg),
            other => LlmError::Upstream(other.to_string()),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(&self, prompt: &RecipePrompt) -> Result<String, LlmError> {
        let client = self.client.as_ref().ok_or(LlmError::MissingCredential)?;
        let request = self.build_request(prompt)?;
        tracing::debug!("Prompt: {}", prompt.user);
        let text = client
            .chat()
            .create(request)
            .await?
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyCompletion)?
            .message
            .content
            .ok_or(LlmError::EmptyCompletion)?;
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    /// Read one HTTP request, headers and body, off the stream.
    async fn read_request(stream: &mut TcpStream) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|len| len.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return Ok(());
                }
            }
        }
    }

    /// Serve the same canned reply to every request; returns the API base and a hit counter.
    async fn canned_upstream(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    if read_request(&mut stream).await.is_err() {
                        return;
                    }
                    let reply = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(reply.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        (format!("http://{addr}/v1"), hits)
    }

    async fn complete_against(api_base: String) -> Result<String, LlmError> {
        let provider = OpenAiProvider::new(&LlmConfig {
            api_key: Some("sk-test".into()),
            api_base: Some(api_base),
            ..Default::default()
        });
        provider.complete(&RecipePrompt::for_dish("pancakes")).await
    }

    #[tokio::test]
    async fn completion_text_is_returned() {
        let (base, _) = canned_upstream(
            "200 OK",
            r#"{"id":"c1","object":"chat.completion","created":1,"model":"gpt-4","choices":[{"index":0,"message":{"role":"assistant","content":"1. Mix\n\n2. Fry"},"finish_reason":"stop"}]}"#,
        )
        .await;
        assert_eq!(complete_against(base).await.unwrap(), "1. Mix\n\n2. Fry");
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let (base, hits) = canned_upstream(
            "429 Too Many Requests",
            r#"{"error":{"message":"Rate limit reached","type":"requests","param":null,"code":"rate_limit_exceeded"}}"#,
        )
        .await;
        let result = tokio::time::timeout(Duration::from_secs(5), complete_against(base))
            .await
            .expect("rate-limited call should fail promptly");
        assert_eq!(result.unwrap_err(), LlmError::Upstream("Rate limit reached".into()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn api_error_body_is_an_upstream_error() {
        let (base, _) = canned_upstream(
            "401 Unauthorized",
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","param":null,"code":"invalid_api_key"}}"#,
        )
        .await;
        assert_eq!(
            complete_against(base).await.unwrap_err(),
            LlmError::Upstream("Incorrect API key provided".into())
        );
    }

    #[tokio::test]
    async fn non_json_body_is_an_upstream_error() {
        let (base, _) = canned_upstream("502 Bad Gateway", "<html>bad gateway</html>").await;
        let err = complete_against(base).await.unwrap_err();
        assert!(matches!(err, LlmError::Upstream(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn no_choices_is_an_empty_completion() {
        let (base, _) = canned_upstream(
            "200 OK",
            r#"{"id":"c1","object":"chat.completion","created":1,"model":"gpt-4","choices":[]}"#,
        )
        .await;
        assert_eq!(complete_against(base).await.unwrap_err(), LlmError::EmptyCompletion);
    }

    #[tokio::test]
    async fn missing_content_is_an_empty_completion() {
        let (base, _) = canned_upstream(
            "200 OK",
            r#"{"id":"c1","object":"chat.completion","created":1,"model":"gpt-4","choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#,
        )
        .await;
        assert_eq!(complete_against(base).await.unwrap_err(), LlmError::EmptyCompletion);
    }

    #[tokio::test]
    async fn malformed_success_body_is_an_upstream_error() {
        let (base, _) = canned_upstream("200 OK", r#"{"unexpected": true}"#).await;
        let err = complete_against(base).await.unwrap_err();
        assert!(matches!(err, LlmError::Upstream(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let provider = OpenAiProvider::new(&LlmConfig::default());
        let err = provider
            .complete(&RecipePrompt::for_dish("pancakes"))
            .await
            .unwrap_err();
        assert_eq!(err, LlmError::MissingCredential);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let provider = OpenAiProvider::new(&LlmConfig {
            api_key: Some("sk-test".into()),
            // Nothing listens on the discard port
            api_base: Some("http://127.0.0.1:9/v1".into()),
            ..Default::default()
        });
        let err = provider
            .complete(&RecipePrompt::for_dish("pancakes"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn request_carries_fixed_parameters() {
        let provider = OpenAiProvider::new(&LlmConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        });
        let request = provider
            .build_request(&RecipePrompt::for_dish("tacos"))
            .unwrap();
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.temperature, Some(0.5));
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(provider.model_name(), "gpt-4");
    }
}
