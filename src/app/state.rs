// SPDX-License-Identifier: GPL-3.0-only

//! Booth session state machine
//!
//! [`Session::update`] is the only way the session changes. It is pure: the
//! asynchronous part of a confirm (bake + generation) is returned as a
//! [`GenerationJob`] for the caller to run, and its outcome comes back as
//! [`Message::GenerationFinished`] tagged with the job token.

use crate::errors::AppResult;
use crate::filters::FilterId;
use crate::media::EncodedImage;
use std::fmt;
use tracing::{debug, info};

/// Screen the booth is on, with the data that screen owns
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Step {
    #[default]
    Welcome,
    Capture,
    Preview {
        captured: EncodedImage,
        filter: FilterId,
    },
    Processing {
        captured: EncodedImage,
        filter: FilterId,
        token: u64,
    },
    Result {
        captured: EncodedImage,
        result: EncodedImage,
    },
    Error {
        message: String,
    },
}

/// Payload-free step tag, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Welcome,
    Capture,
    Preview,
    Processing,
    Result,
    Error,
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Welcome => StepKind::Welcome,
            Step::Capture => StepKind::Capture,
            Step::Preview { .. } => StepKind::Preview,
            Step::Processing { .. } => StepKind::Processing,
            Step::Result { .. } => StepKind::Result,
            Step::Error { .. } => StepKind::Error,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Welcome => "welcome",
            StepKind::Capture => "capture",
            StepKind::Preview => "preview",
            StepKind::Processing => "processing",
            StepKind::Result => "result",
            StepKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// Events driving the session
#[derive(Debug, Clone)]
pub enum Message {
    // ===== User =====
    /// Leave the welcome screen
    Start,
    /// A still was captured or a file uploaded
    ImageObtained(EncodedImage),
    /// Pick a filter on the preview screen
    SelectFilter(FilterId),
    /// Accept the preview and start generation
    Confirm,
    /// Discard the preview and capture again
    Retake,
    /// Go back to capture after an error
    Retry,
    /// Start over from the welcome screen
    Reset,

    // ===== Async =====
    /// A generation job finished
    GenerationFinished {
        token: u64,
        result: AppResult<EncodedImage>,
    },
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Message::Start => "start",
            Message::ImageObtained(_) => "image-obtained",
            Message::SelectFilter(_) => "select-filter",
            Message::Confirm => "confirm",
            Message::Retake => "retake",
            Message::Retry => "retry",
            Message::Reset => "reset",
            Message::GenerationFinished { .. } => "generation-finished",
        }
    }
}

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    Invalid {
        step: StepKind,
        message: &'static str,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::Invalid { step, message } => {
                write!(f, "'{}' is not valid on the {} screen", message, step)
            }
        }
    }
}

impl std::error::Error for TransitionError {}

/// Work emitted by a confirm: bake `image` with `filter`, then generate
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationJob {
    pub token: u64,
    pub image: EncodedImage,
    pub filter: FilterId,
}

/// One booth session
#[derive(Debug, Clone, Default)]
pub struct Session {
    step: Step,
    /// Bumped on every confirm and reset; results carrying an older value are stale
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Current generation token
    pub fn token(&self) -> u64 {
        self.generation
    }

    pub fn captured_image(&self) -> Option<&EncodedImage> {
        match &self.step {
            Step::Preview { captured, .. }
            | Step::Processing { captured, .. }
            | Step::Result { captured, .. } => Some(captured),
            _ => None,
        }
    }

    pub fn selected_filter(&self) -> FilterId {
        match &self.step {
            Step::Preview { filter, .. } | Step::Processing { filter, .. } => *filter,
            _ => FilterId::default(),
        }
    }

    pub fn result_image(&self) -> Option<&EncodedImage> {
        match &self.step {
            Step::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.step {
            Step::Error { message } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Apply one message
    ///
    /// Returns the job to run when the message was a confirm. Invalid
    /// messages leave the session untouched. Stale generation results are
    /// dropped without error.
    pub fn update(&mut self, message: Message) -> Result<Option<GenerationJob>, TransitionError> {
        let from = self.step.kind();

        match (&mut self.step, message) {
            (_, Message::Reset) => {
                self.generation += 1;
                self.step = Step::Welcome;
                info!(from = %from, "Session reset");
            }

            (Step::Welcome, Message::Start) => {
                self.step = Step::Capture;
            }

            (Step::Capture, Message::ImageObtained(captured)) => {
                debug!(bytes = captured.len(), "Image obtained");
                self.step = Step::Preview {
                    captured,
                    filter: FilterId::AFTER_CAPTURE,
                };
            }

            (Step::Preview { filter, .. }, Message::SelectFilter(id)) => {
                *filter = id;
            }

            (Step::Preview { .. }, Message::Retake) => {
                debug!("Preview discarded");
                self.step = Step::Capture;
            }

            (Step::Preview { captured, filter }, Message::Confirm) => {
                let image = captured.clone();
                let filter = *filter;
                self.generation += 1;
                let token = self.generation;

                info!(token, filter = %filter, "Generation started");
                self.step = Step::Processing {
                    captured: image.clone(),
                    filter,
                    token,
                };
                return Ok(Some(GenerationJob {
                    token,
                    image,
                    filter,
                }));
            }

            (
                Step::Processing {
                    captured, token, ..
                },
                Message::GenerationFinished {
                    token: finished,
                    result,
                },
            ) if *token == finished => {
                self.step = match result {
                    Ok(result) => {
                        info!(token = finished, "Generation succeeded");
                        Step::Result {
                            captured: captured.clone(),
                            result,
                        }
                    }
                    Err(e) => {
                        info!(token = finished, error = %e, "Generation failed");
                        Step::Error {
                            message: e.user_message(),
                        }
                    }
                };
            }

            (_, Message::GenerationFinished { token, .. }) => {
                debug!(
                    token,
                    current = self.generation,
                    step = %from,
                    "Dropping stale generation result"
                );
            }

            (Step::Error { .. }, Message::Retry) => {
                self.step = Step::Capture;
            }

            (_, message) => {
                return Err(TransitionError::Invalid {
                    step: from,
                    message: message.name(),
                });
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GenerationError;

    fn image(tag: u8) -> EncodedImage {
        EncodedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, tag])
    }

    fn session_in_preview() -> Session {
        let mut session = Session::new();
        session.update(Message::Start).unwrap();
        session.update(Message::ImageObtained(image(1))).unwrap();
        session
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        assert_eq!(session.step(), &Step::Welcome);
        assert!(session.captured_image().is_none());
        assert_eq!(session.selected_filter(), FilterId::Neutral);
    }

    #[test]
    fn test_image_obtained_selects_sketch() {
        let session = session_in_preview();
        assert_eq!(session.step().kind(), StepKind::Preview);
        assert_eq!(session.selected_filter(), FilterId::Sketch);
        assert_eq!(session.captured_image(), Some(&image(1)));
    }

    #[test]
    fn test_select_filter_is_repeatable() {
        let mut session = session_in_preview();
        session.update(Message::SelectFilter(FilterId::Cool)).unwrap();
        session.update(Message::SelectFilter(FilterId::Cool)).unwrap();
        assert_eq!(session.selected_filter(), FilterId::Cool);
        session.update(Message::SelectFilter(FilterId::Neutral)).unwrap();
        assert_eq!(session.selected_filter(), FilterId::Neutral);
    }

    #[test]
    fn test_confirm_emits_job() {
        let mut session = session_in_preview();
        session.update(Message::SelectFilter(FilterId::Warm)).unwrap();
        let job = session.update(Message::Confirm).unwrap().unwrap();

        assert_eq!(job.filter, FilterId::Warm);
        assert_eq!(job.image, image(1));
        assert_eq!(job.token, session.token());
        assert_eq!(session.step().kind(), StepKind::Processing);
    }

    #[test]
    fn test_success_moves_to_result() {
        let mut session = session_in_preview();
        let job = session.update(Message::Confirm).unwrap().unwrap();
        session
            .update(Message::GenerationFinished {
                token: job.token,
                result: Ok(image(9)),
            })
            .unwrap();

        assert_eq!(session.result_image(), Some(&image(9)));
        assert_eq!(session.captured_image(), Some(&image(1)));
    }

    #[test]
    fn test_retake_returns_to_capture() {
        let mut session = session_in_preview();
        session.update(Message::SelectFilter(FilterId::Sepia)).unwrap();
        assert_eq!(session.update(Message::Retake), Ok(None));

        assert_eq!(session.step(), &Step::Capture);
        assert!(session.captured_image().is_none());

        session.update(Message::ImageObtained(image(2))).unwrap();
        assert_eq!(session.captured_image(), Some(&image(2)));
        assert_eq!(session.selected_filter(), FilterId::Sketch);
    }

    #[test]
    fn test_error_accepts_only_retry_and_reset() {
        let mut session = session_in_preview();
        let job = session.update(Message::Confirm).unwrap().unwrap();
        session
            .update(Message::GenerationFinished {
                token: job.token,
                result: Err(GenerationError::EmptyResponse.into()),
            })
            .unwrap();
        let before = session.step().clone();

        for message in [
            Message::Start,
            Message::Confirm,
            Message::Retake,
            Message::SelectFilter(FilterId::Warm),
            Message::ImageObtained(image(3)),
        ] {
            let name = message.name();
            assert_eq!(
                session.update(message),
                Err(TransitionError::Invalid {
                    step: StepKind::Error,
                    message: name,
                })
            );
            assert_eq!(session.step(), &before);
        }

        session.update(Message::Reset).unwrap();
        assert_eq!(session.step(), &Step::Welcome);
    }

    #[test]
    fn test_failure_moves_to_error_then_retry() {
        let mut session = session_in_preview();
        let job = session.update(Message::Confirm).unwrap().unwrap();
        session
            .update(Message::GenerationFinished {
                token: job.token,
                result: Err(GenerationError::EmptyResponse.into()),
            })
            .unwrap();

        assert!(!session.error_message().unwrap().is_empty());
        session.update(Message::Retry).unwrap();
        assert_eq!(session.step(), &Step::Capture);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_stale_result_after_reset_is_dropped() {
        let mut session = session_in_preview();
        let job = session.update(Message::Confirm).unwrap().unwrap();
        session.update(Message::Reset).unwrap();

        let outcome = session.update(Message::GenerationFinished {
            token: job.token,
            result: Ok(image(9)),
        });
        assert_eq!(outcome, Ok(None));
        assert_eq!(session.step(), &Step::Welcome);
        assert!(session.result_image().is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = session_in_preview();
        session.update(Message::Reset).unwrap();
        assert_eq!(session.step(), &Step::Welcome);
        assert!(session.captured_image().is_none());
        assert_eq!(session.selected_filter(), FilterId::Neutral);
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.update(Message::Confirm),
            Err(TransitionError::Invalid {
                step: StepKind::Welcome,
                message: "confirm",
            })
        );
        assert!(session.update(Message::ImageObtained(image(1))).is_err());
        assert!(session.update(Message::Retry).is_err());
        assert!(session.update(Message::Retake).is_err());
        assert_eq!(session.step(), &Step::Welcome);

        let mut session = Session::new();
        session.update(Message::Start).unwrap();
        assert_eq!(
            session.update(Message::Retake),
            Err(TransitionError::Invalid {
                step: StepKind::Capture,
                message: "retake",
            })
        );

        let mut session = session_in_preview();
        let job = session.update(Message::Confirm).unwrap().unwrap();
        assert!(session.update(Message::Confirm).is_err());
        assert!(session.update(Message::SelectFilter(FilterId::Glitch)).is_err());
        assert!(session.update(Message::Retake).is_err());
        assert_eq!(session.step().kind(), StepKind::Processing);
        assert_eq!(session.token(), job.token);
    }
}
