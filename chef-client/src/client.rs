use anyhow::{Context, Result};
use chef::basic_models::{RecipeRequest, RecipeResponse};

/// Talks to a running chef server.
#[derive(Clone, Debug)]
pub struct RecipeClient {
    http: reqwest::Client,
    server: String,
}

impl RecipeClient {
    pub fn new(server: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            server: server.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/get-recipe", self.server)
    }

    /// Ask the server for the steps of a dish.
    ///
    /// Any reply from the server that has no steps comes back as `Ok(RecipeResponse::Error)`,
    /// including a non-2xx rejection of the request body.
    /// `Err` means the server could not be reached or sent something undecodable.
    pub async fn get_steps(&self, dish: &str) -> Result<RecipeResponse> {
        let url = self.endpoint();
        tracing::debug!("POST {}", url);
        let resp = self
            .http
            .post(&url)
            .json(&RecipeRequest { dish: dish.into() })
            .send()
            .await
            .with_context(|| format!("Connecting to {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("Recipe request failed with {}: {}", status, body);
            return Ok(RecipeResponse::Error {
                error: format!("Recipe request failed with {status}: {body}"),
            });
        }
        resp.json::<RecipeResponse>()
            .await
            .context("Decoding recipe response")
    }
}
