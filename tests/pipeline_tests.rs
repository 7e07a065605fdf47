// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the booth session from upload to result

use futures::FutureExt;
use futures::future::BoxFuture;
use photobooth::app::{Message, Photobooth, Step, StepKind};
use photobooth::capture::upload_from_bytes;
use photobooth::errors::GenerationError;
use photobooth::filters::{self, FilterId};
use photobooth::generation::{
    GenerateContentRequest, GenerateContentResponse, GenerationClient, GenerationTransport,
    InlineData, Part,
};
use photobooth::media::{EncodedImage, ImageEncoding, encode_jpeg};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned transport that counts calls
struct FakeTransport {
    calls: Arc<AtomicUsize>,
    reply: Result<GenerateContentResponse, GenerationError>,
}

impl FakeTransport {
    fn new(reply: Result<GenerateContentResponse, GenerationError>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            reply,
        }
    }
}

impl GenerationTransport for FakeTransport {
    fn generate_content(
        &self,
        _model: &str,
        _api_key: &str,
        _request: GenerateContentRequest,
    ) -> BoxFuture<'static, Result<GenerateContentResponse, GenerationError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        async move { reply }.boxed()
    }
}

fn png_reply() -> GenerateContentResponse {
    GenerateContentResponse::with_part(Part {
        inline_data: Some(InlineData {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        }),
        text: None,
    })
}

fn text_reply(text: &str) -> GenerateContentResponse {
    GenerateContentResponse::with_part(Part {
        inline_data: None,
        text: Some(text.to_string()),
    })
}

fn portrait() -> EncodedImage {
    let image = image::RgbImage::from_fn(16, 16, |x, y| {
        image::Rgb([(x * 16) as u8, (y * 16) as u8, 128])
    });
    upload_from_bytes(encode_jpeg(&image, 90).unwrap()).unwrap()
}

async fn run_session(
    booth: &mut Photobooth<FakeTransport>,
    filter: Option<FilterId>,
) -> StepKind {
    booth.dispatch(Message::Start).unwrap();
    booth.dispatch(Message::ImageObtained(portrait())).unwrap();
    if let Some(filter) = filter {
        booth.dispatch(Message::SelectFilter(filter)).unwrap();
    }
    booth.dispatch(Message::Confirm).unwrap();
    assert_eq!(booth.session().step().kind(), StepKind::Processing);

    booth.next_event().await.unwrap().kind()
}

#[tokio::test]
async fn test_session_reaches_result() {
    let transport = FakeTransport::new(Ok(png_reply()));
    let calls = transport.calls.clone();
    let mut booth = Photobooth::new(GenerationClient::new(transport, Some("key".into())));

    let kind = run_session(&mut booth, Some(FilterId::Vintage)).await;

    assert_eq!(kind, StepKind::Result);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let result = booth.session().result_image().unwrap();
    assert_eq!(result.encoding(), &ImageEncoding::Png);
}

#[tokio::test]
async fn test_neutral_session_returns_service_image() {
    // PNG signature plus marker bytes
    let generated: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];
    let reply = GenerateContentResponse::with_part(Part {
        inline_data: Some(InlineData {
            mime_type: "image/png".to_string(),
            data: EncodedImage::from_bytes(generated.clone()).to_base64(),
        }),
        text: None,
    });
    let mut booth = Photobooth::new(GenerationClient::new(
        FakeTransport::new(Ok(reply)),
        Some("key".into()),
    ));

    let captured = portrait();
    booth.dispatch(Message::Start).unwrap();
    booth.dispatch(Message::ImageObtained(captured.clone())).unwrap();
    booth.dispatch(Message::SelectFilter(FilterId::Neutral)).unwrap();
    booth.dispatch(Message::Confirm).unwrap();
    assert_eq!(booth.next_event().await.unwrap().kind(), StepKind::Result);

    let session = booth.session();
    assert_eq!(session.result_image().unwrap().bytes(), generated.as_slice());
    assert_eq!(session.captured_image(), Some(&captured));
}

#[tokio::test]
async fn test_error_step_accepts_only_retry_and_reset() {
    let transport = FakeTransport::new(Ok(text_reply("No.")));
    let mut booth = Photobooth::new(GenerationClient::new(transport, Some("key".into())));
    assert_eq!(run_session(&mut booth, None).await, StepKind::Error);
    let before = booth.session().step().clone();

    assert!(booth.dispatch(Message::Start).is_err());
    assert!(booth.dispatch(Message::Confirm).is_err());
    assert!(booth.dispatch(Message::SelectFilter(FilterId::Cool)).is_err());
    assert!(booth.dispatch(Message::ImageObtained(portrait())).is_err());
    assert!(!booth.is_busy());
    assert_eq!(booth.session().step(), &before);

    booth.dispatch(Message::Retry).unwrap();
    assert_eq!(booth.session().step(), &Step::Capture);
    booth.dispatch(Message::Reset).unwrap();
    assert_eq!(booth.session().step(), &Step::Welcome);
}

#[tokio::test]
async fn test_refusal_reaches_error_with_message() {
    let transport = FakeTransport::new(Ok(text_reply("I can't edit photos of people.")));
    let mut booth = Photobooth::new(GenerationClient::new(transport, Some("key".into())));

    let kind = run_session(&mut booth, None).await;

    assert_eq!(kind, StepKind::Error);
    let message = booth.session().error_message().unwrap();
    assert!(message.contains("I can't edit photos of people."));

    booth.dispatch(Message::Retry).unwrap();
    assert_eq!(booth.session().step(), &Step::Capture);
}

#[tokio::test]
async fn test_missing_credential_never_calls_service() {
    let transport = FakeTransport::new(Ok(png_reply()));
    let calls = transport.calls.clone();
    let mut booth = Photobooth::new(GenerationClient::new(transport, None));

    let kind = run_session(&mut booth, Some(FilterId::Neutral)).await;

    assert_eq!(kind, StepKind::Error);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!booth.session().error_message().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failure_reaches_error() {
    let transport = FakeTransport::new(Err(GenerationError::Transport("HTTP 503".into())));
    let mut booth = Photobooth::new(GenerationClient::new(transport, Some("key".into())));

    assert_eq!(run_session(&mut booth, None).await, StepKind::Error);
}

#[tokio::test]
async fn test_reset_discards_late_result() {
    let transport = FakeTransport::new(Ok(png_reply()));
    let mut booth = Photobooth::new(GenerationClient::new(transport, Some("key".into())));

    booth.dispatch(Message::Start).unwrap();
    booth.dispatch(Message::ImageObtained(portrait())).unwrap();
    booth.dispatch(Message::Confirm).unwrap();
    booth.dispatch(Message::Reset).unwrap();
    booth.dispatch(Message::Start).unwrap();

    let step = booth.next_event().await.unwrap();
    assert_eq!(step, &Step::Capture);
    assert!(booth.session().result_image().is_none());
}

#[test]
fn test_bake_is_deterministic() {
    let photo = portrait();
    let first = filters::bake(&photo, FilterId::Glitch).unwrap();
    let second = filters::bake(&photo, FilterId::Glitch).unwrap();

    assert_eq!(first.bytes(), second.bytes());
    assert_eq!(first.encoding(), &ImageEncoding::Jpeg);
}

#[test]
fn test_neutral_bake_is_identity() {
    let photo = portrait();
    let baked = filters::bake(&photo, FilterId::Neutral).unwrap();
    assert!(baked.shares_buffer(&photo));
}
