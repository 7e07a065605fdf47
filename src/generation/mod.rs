// SPDX-License-Identifier: GPL-3.0-only

//! Image generation client
//!
//! Sends the filtered photo to a remote generative-image service together
//! with an instruction to keep the subject and replace the background with
//! one of the festive [`SCENARIOS`]. A single attempt is made; there is no
//! retry and no timeout.

mod prompt;
mod scenarios;
mod transport;
mod wire;

pub use prompt::build_prompt;
pub use scenarios::{SCENARIOS, ScenarioPicker};
#[cfg(test)]
pub use transport::MockGenerationTransport;
pub use transport::{GenerationTransport, HttpTransport};
pub use wire::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
    parse_response,
};

use crate::config::Config;
use crate::constants::generation::DEFAULT_MODEL;
use crate::errors::GenerationError;
use crate::media::{EncodedImage, ImageEncoding};
use tracing::{info, warn};

pub struct GenerationClient<T: GenerationTransport> {
    transport: T,
    api_key: Option<String>,
    model: String,
    scenarios: ScenarioPicker,
}

impl GenerationClient<HttpTransport> {
    /// Client talking HTTPS to the configured endpoint
    pub fn from_config(config: &Config) -> Self {
        GenerationClient::new(HttpTransport::new(config.endpoint.clone()), config.api_key())
            .with_model(config.model.clone())
    }
}

impl<T: GenerationTransport> GenerationClient<T> {
    pub fn new(transport: T, api_key: Option<String>) -> Self {
        Self {
            transport,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            scenarios: ScenarioPicker::from_entropy(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the random source used to pick scenarios
    pub fn with_scenarios(mut self, scenarios: ScenarioPicker) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Composite the subject of `image` onto a festive background
    ///
    /// Fails with [`GenerationError::MissingCredential`] before any request
    /// is made when no credential is configured.
    pub async fn generate(&self, image: EncodedImage) -> Result<EncodedImage, GenerationError> {
        let Some(api_key) = self.credential() else {
            warn!("Generation requested without an API key");
            return Err(GenerationError::MissingCredential);
        };

        let encoding = ImageEncoding::sniff(image.bytes());
        let mime_type = encoding.mime_type();
        let scenario = self.scenarios.pick();

        info!(
            model = %self.model,
            mime_type,
            bytes = image.len(),
            scenario,
            "Requesting background generation"
        );

        let request =
            GenerateContentRequest::image_edit(mime_type, image.to_base64(), build_prompt(scenario));
        drop(image);

        let response = self
            .transport
            .generate_content(&self.model, api_key, request)
            .await
            .inspect_err(|e| warn!(error = %e, "Generation request failed"))?;

        let result = parse_response(&response)?;
        info!(
            encoding = ?result.encoding(),
            bytes = result.len(),
            "Generated image received"
        );
        Ok(result)
    }
}
