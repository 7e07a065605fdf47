// SPDX-License-Identifier: GPL-3.0-only

//! Booth controller
//!
//! [`Photobooth`] owns a [`Session`] and runs the jobs its transitions emit.
//! A job bakes the selected filter on the blocking pool, then sends the
//! baked image to the generation client. Finished jobs report back over a
//! channel and are applied by [`Photobooth::next_event`]; results from jobs
//! that were overtaken by a reset are dropped by the session.

pub mod state;

pub use state::{GenerationJob, Message, Session, Step, StepKind, TransitionError};

use crate::errors::{AppError, AppResult};
use crate::filters;
use crate::generation::{GenerationClient, GenerationTransport};
use crate::media::EncodedImage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct Photobooth<T: GenerationTransport + 'static> {
    session: Session,
    client: Arc<GenerationClient<T>>,
    events_tx: mpsc::UnboundedSender<Message>,
    events_rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
}

impl<T: GenerationTransport + 'static> Photobooth<T> {
    pub fn new(client: GenerationClient<T>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            client: Arc::new(client),
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply a message; a confirm spawns its job on the runtime
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, message: Message) -> Result<(), TransitionError> {
        if let Some(job) = self.session.update(message)? {
            self.spawn(job);
        }
        Ok(())
    }

    /// Whether a job is still running
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Wait for the next job to finish and apply its outcome
    ///
    /// Returns `None` when no job is running.
    pub async fn next_event(&mut self) -> Option<&Step> {
        if self.in_flight == 0 {
            return None;
        }

        let message = self.events_rx.recv().await?;
        self.in_flight -= 1;

        if let Err(e) = self.session.update(message) {
            warn!(error = %e, "Job outcome rejected");
        }
        Some(self.session.step())
    }

    fn spawn(&mut self, job: GenerationJob) {
        let client = Arc::clone(&self.client);
        let events_tx = self.events_tx.clone();
        self.in_flight += 1;

        debug!(token = job.token, filter = %job.filter, "Spawning generation job");
        tokio::spawn(async move {
            let token = job.token;
            let result = run_job(&client, job).await;
            if events_tx
                .send(Message::GenerationFinished { token, result })
                .is_err()
            {
                debug!(token, "Booth dropped before job finished");
            }
        });
    }
}

/// Bake the filter, then generate
///
/// The neutral filter forwards the captured bytes untouched. The bake always
/// completes before the request is sent.
pub async fn run_job<T: GenerationTransport>(
    client: &GenerationClient<T>,
    job: GenerationJob,
) -> AppResult<EncodedImage> {
    let GenerationJob {
        token,
        image,
        filter,
    } = job;

    let baked = if filter.is_neutral() {
        image
    } else {
        tokio::task::spawn_blocking(move || filters::bake(&image, filter))
            .await
            .map_err(|e| AppError::Other(format!("Bake task failed: {}", e)))??
    };

    info!(token, filter = %filter, bytes = baked.len(), "Filter applied, generating");
    Ok(client.generate(baked).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GenerationError;
    use crate::filters::FilterId;
    use crate::generation::{GenerateContentRequest, GenerateContentResponse, InlineData, Part};
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    /// Records request images and answers with a fixed PNG
    #[derive(Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl GenerationTransport for RecordingTransport {
        fn generate_content(
            &self,
            _model: &str,
            _api_key: &str,
            request: GenerateContentRequest,
        ) -> BoxFuture<'static, Result<GenerateContentResponse, GenerationError>> {
            let data = request.contents[0].parts[0]
                .inline_data
                .as_ref()
                .map(|d| d.data.clone())
                .unwrap_or_default();
            self.sent.lock().unwrap().push(data);

            async {
                Ok(GenerateContentResponse::with_part(Part {
                    inline_data: Some(InlineData {
                        mime_type: "image/png".into(),
                        data: "iVBORw0KGgo=".into(),
                    }),
                    text: None,
                }))
            }
            .boxed()
        }
    }

    fn photo() -> EncodedImage {
        let image = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 60, 30]));
        EncodedImage::from_bytes(crate::media::encode_jpeg(&image, 90).unwrap())
    }

    #[tokio::test]
    async fn test_neutral_job_sends_captured_bytes() {
        let transport = RecordingTransport::default();
        let sent = transport.sent.clone();
        let client = GenerationClient::new(transport, Some("k".into()));

        let captured = photo();
        let job = GenerationJob {
            token: 1,
            image: captured.clone(),
            filter: FilterId::Neutral,
        };
        run_job(&client, job).await.unwrap();

        assert_eq!(sent.lock().unwrap()[0], captured.to_base64());
    }

    #[tokio::test]
    async fn test_filtered_job_sends_baked_bytes() {
        let transport = RecordingTransport::default();
        let sent = transport.sent.clone();
        let client = GenerationClient::new(transport, Some("k".into()));

        let captured = photo();
        let expected = filters::bake(&captured, FilterId::Sepia).unwrap();
        let job = GenerationJob {
            token: 1,
            image: captured.clone(),
            filter: FilterId::Sepia,
        };
        run_job(&client, job).await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0], expected.to_base64());
        assert_ne!(sent[0], captured.to_base64());
    }

    #[tokio::test]
    async fn test_booth_runs_to_result() {
        let client = GenerationClient::new(RecordingTransport::default(), Some("k".into()));
        let mut booth = Photobooth::new(client);

        booth.dispatch(Message::Start).unwrap();
        booth.dispatch(Message::ImageObtained(photo())).unwrap();
        booth.dispatch(Message::Confirm).unwrap();
        assert!(booth.is_busy());

        let step = booth.next_event().await.unwrap();
        assert_eq!(step.kind(), StepKind::Result);
        assert!(booth.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_reset_during_processing_drops_result() {
        let client = GenerationClient::new(RecordingTransport::default(), Some("k".into()));
        let mut booth = Photobooth::new(client);

        booth.dispatch(Message::Start).unwrap();
        booth.dispatch(Message::ImageObtained(photo())).unwrap();
        booth.dispatch(Message::Confirm).unwrap();
        booth.dispatch(Message::Reset).unwrap();

        let step = booth.next_event().await.unwrap();
        assert_eq!(step, &Step::Welcome);
        assert!(booth.session().result_image().is_none());
    }
}
