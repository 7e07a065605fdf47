// SPDX-License-Identifier: GPL-3.0-only

//! Transport seam between the generation client and the remote service

use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::constants::generation::{API_KEY_HEADER, DEFAULT_ENDPOINT};
use crate::errors::GenerationError;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

/// Maximum characters of an error body kept in a transport error
const ERROR_BODY_CHARS: usize = 200;

/// Sends one `generateContent` request
#[cfg_attr(test, mockall::automock)]
pub trait GenerationTransport: Send + Sync {
    fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: GenerateContentRequest,
    ) -> BoxFuture<'static, Result<GenerateContentResponse, GenerationError>>;
}

/// HTTPS transport built on `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Full URL for a model
    pub fn url_for(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl GenerationTransport for HttpTransport {
    fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: GenerateContentRequest,
    ) -> BoxFuture<'static, Result<GenerateContentResponse, GenerationError>> {
        let client = self.client.clone();
        let url = self.url_for(model);
        let api_key = api_key.to_string();

        async move {
            debug!(url = %url, "Sending generateContent request");

            let response = client
                .post(&url)
                .header(API_KEY_HEADER, api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| GenerationError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let body: String = body.chars().take(ERROR_BODY_CHARS).collect();
                return Err(GenerationError::Transport(format!("HTTP {}: {}", status, body)));
            }

            response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| GenerationError::InvalidPayload(e.to_string()))
        }
        .boxed()
    }
}
