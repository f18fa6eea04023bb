//! Prediction cycle state machine
//!
//! ```text
//! Idle -> FileSelected -> Submitting -> ResultShown -> FeedbackPending -> Idle
//! ```
//!
//! Each submission carries the view generation it started in. Navigating
//! away bumps the generation, and a completion for an older generation is
//! dropped instead of being written into whatever view is current.

use super::error::{FlowError, FlowResult};
use crate::gateway::{ApiGateway, GatewayResult};
use crate::model::wire::PredictionResponse;
use crate::model::{BloodGroup, Feedback, HistoryEntry, PredictionUpload, SelectedFile, UserId};
use crate::session::Session;
use crate::view::notice::{MSG_FEEDBACK_FAILED, MSG_FEEDBACK_THANKS, MSG_NOT_AN_IMAGE};
use crate::view::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    FileSelected,
    Submitting,
    ResultShown,
    FeedbackPending,
}

/// Proof that a submission was started, handed back on completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub generation: u64,
    pub upload: PredictionUpload,
}

/// What a finished submission brings back
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub response: PredictionResponse,
    /// Refreshed history, newest first
    pub history: Vec<HistoryEntry>,
}

/// Result of applying a completion
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Shown,
    Failed(Notice),
    /// The view changed while the request was in flight
    Stale,
}

#[derive(Debug, Clone)]
pub struct PredictionFlow {
    state: FlowState,
    file: Option<SelectedFile>,
    result: Option<PredictionResponse>,
    history: Vec<HistoryEntry>,
    /// `Some(false)` once the user said the result was wrong
    correct: Option<bool>,
    generation: u64,
}

impl Default for PredictionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            file: None,
            result: None,
            history: Vec::new(),
            correct: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResponse> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Whether [`begin_submit`](Self::begin_submit) would accept
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && self.state != FlowState::Submitting
    }

    pub fn is_busy(&self) -> bool {
        self.state == FlowState::Submitting
    }

    /// Whether the 8-group selector is visible
    pub fn shows_group_selector(&self) -> bool {
        self.state == FlowState::FeedbackPending && self.correct == Some(false)
    }

    /// Choose a file; non-images are refused with a notice
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), Notice> {
        if self.state == FlowState::Submitting {
            return Err(Notice::error(FlowError::AlreadySubmitting.to_string()));
        }
        if !file.is_image() {
            return Err(Notice::error(MSG_NOT_AN_IMAGE));
        }

        self.file = Some(file);
        self.result = None;
        self.correct = None;
        self.state = FlowState::FileSelected;
        Ok(())
    }

    /// Move to Submitting and build the upload for the current identity
    pub fn begin_submit(&mut self, session: &Session) -> FlowResult<SubmitTicket> {
        if self.state == FlowState::Submitting {
            return Err(FlowError::AlreadySubmitting);
        }
        let file = self.file.clone().ok_or(FlowError::NoFile)?;

        self.state = FlowState::Submitting;
        Ok(SubmitTicket {
            generation: self.generation,
            upload: PredictionUpload::new(file, session.user()),
        })
    }

    /// Apply the outcome of a submission
    pub fn finish_submit(
        &mut self,
        ticket: &SubmitTicket,
        outcome: GatewayResult<Submission>,
    ) -> Completion {
        if ticket.generation != self.generation || self.state != FlowState::Submitting {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale prediction result"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(submission) => {
                self.result = Some(submission.response);
                self.history = submission.history;
                self.correct = None;
                self.state = FlowState::ResultShown;
                Completion::Shown
            }
            Err(e) => {
                self.state = FlowState::FileSelected;
                Completion::Failed(Notice::error(e.to_string()))
            }
        }
    }

    /// Subject of feedback: the newest history entry, else the stored prediction id
    pub fn feedback_subject(&self) -> Option<i64> {
        self.history
            .first()
            .and_then(|entry| entry.id)
            .or_else(|| self.result.as_ref().and_then(|r| r.prediction_id))
    }

    /// Answer the "correct?" question
    ///
    /// "Yes" yields feedback confirming the predicted group, ready to send.
    /// "No" reveals the group selector and yields nothing yet.
    pub fn answer(&mut self, correct: bool) -> FlowResult<Option<Feedback>> {
        let predicted = match (&self.state, &self.result) {
            (FlowState::ResultShown | FlowState::FeedbackPending, Some(result)) => {
                result.prediction.blood_group
            }
            _ => return Err(FlowError::NoResult),
        };

        self.correct = Some(correct);
        self.state = FlowState::FeedbackPending;

        Ok(correct.then(|| Feedback {
            prediction_id: self.feedback_subject(),
            actual_blood_group: predicted,
        }))
    }

    /// Feedback naming the actual group picked in the selector
    pub fn correct_to(&self, actual: BloodGroup) -> FlowResult<Feedback> {
        if self.state != FlowState::FeedbackPending {
            return Err(FlowError::NoResult);
        }

        Ok(Feedback {
            prediction_id: self.feedback_subject(),
            actual_blood_group: actual,
        })
    }

    /// Apply the outcome of a feedback post
    ///
    /// Success ends the cycle. Failure only produces a notice; the flow
    /// stays where it was so the user can try again.
    pub fn finish_feedback(&mut self, outcome: GatewayResult<String>) -> Notice {
        match outcome {
            Ok(_) => {
                self.reset();
                Notice::success(MSG_FEEDBACK_THANKS)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Feedback failed");
                Notice::error(MSG_FEEDBACK_FAILED)
            }
        }
    }

    /// Back to Idle, forgetting file and result
    pub fn reset(&mut self) {
        self.state = FlowState::Idle;
        self.file = None;
        self.result = None;
        self.correct = None;
    }

    /// The view this flow belongs to went away
    ///
    /// In-flight submissions become stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.reset();
    }

    /// Run one submission end to end
    pub async fn submit(&mut self, gateway: &ApiGateway, session: &Session) -> FlowResult<Completion> {
        let ticket = self.begin_submit(session)?;
        let submission = run_submission(gateway, ticket.upload.clone(), session.user_id()).await;
        Ok(self.finish_submit(&ticket, submission))
    }

    /// Send feedback and apply the outcome
    pub async fn send_feedback(&mut self, gateway: &ApiGateway, feedback: &Feedback) -> Notice {
        let outcome = gateway.feedback(feedback).await;
        self.finish_feedback(outcome)
    }
}

/// Predict, then refresh history so feedback can name the new entry
///
/// A failed history refresh is logged and leaves the history empty.
pub async fn run_submission(
    gateway: &ApiGateway,
    upload: PredictionUpload,
    user_id: UserId,
) -> GatewayResult<Submission> {
    let response = gateway.predict(upload).await;

    let history = match gateway.history(user_id).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "History refresh failed");
            Vec::new()
        }
    };

    Ok(Submission { response, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        ApiRequest, ApiResponse, ApiRoutes, Endpoint, GatewayError, RequestBody, StubTransport,
        Transport,
    };
    use crate::model::{Prediction, User};
    use crate::view::notice::MSG_NO_FILE;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn png() -> SelectedFile {
        SelectedFile::new("print.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
    }

    fn stub_gateway() -> ApiGateway {
        ApiGateway::with_transport(ApiRoutes::default(), Arc::new(StubTransport::instant()))
    }

    /// Stub answers for data endpoints, network failure for feedback, and
    /// records every prediction upload
    struct FlakyFeedback {
        stub: StubTransport,
        uploads: Mutex<Vec<PredictionUpload>>,
    }

    #[async_trait]
    impl Transport for FlakyFeedback {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
            if let RequestBody::Multipart(upload) = &request.body {
                self.uploads.lock().unwrap().push(upload.clone());
            }
            if request.endpoint == Endpoint::Feedback {
                return Err(GatewayError::Network("connection reset".to_string()));
            }
            self.stub.send(request).await
        }
    }

    #[test]
    fn test_non_image_is_refused() {
        let mut flow = PredictionFlow::new();
        let notice = flow
            .select_file(SelectedFile::new("notes.txt", "text/plain", b"hi".to_vec()))
            .unwrap_err();

        assert_eq!(notice.message, "Please select an image file");
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(!flow.can_submit());
    }

    #[test]
    fn test_submit_without_file() {
        let mut flow = PredictionFlow::new();
        let err = flow.begin_submit(&Session::logged_out()).unwrap_err();
        assert_eq!(err.to_string(), MSG_NO_FILE);
        assert_eq!(err.to_string(), "Please select an image first");
    }

    #[test]
    fn test_rejected_file_keeps_previous_selection() {
        let mut flow = PredictionFlow::new();
        assert!(!flow.can_submit());

        flow.select_file(png()).unwrap();
        assert!(flow
            .select_file(SelectedFile::new("notes.txt", "text/plain", b"hi".to_vec()))
            .is_err());

        assert_eq!(flow.state(), FlowState::FileSelected);
        assert!(flow.can_submit());
        let ticket = flow.begin_submit(&Session::logged_out()).unwrap();
        assert_eq!(ticket.upload.file.name, "print.png");
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut flow = PredictionFlow::new();
        flow.select_file(png()).unwrap();
        flow.begin_submit(&Session::logged_out()).unwrap();

        assert!(flow.is_busy());
        assert!(!flow.can_submit());
        assert_eq!(
            flow.begin_submit(&Session::logged_out()).unwrap_err(),
            FlowError::AlreadySubmitting
        );
    }

    #[test]
    fn test_upload_carries_identity() {
        let mut flow = PredictionFlow::new();
        flow.select_file(png()).unwrap();
        let session = Session::logged_in(User::new(42, "Ada", "ada@example.com"));
        let ticket = flow.begin_submit(&session).unwrap();

        assert_eq!(ticket.upload.user_id, 42);
        assert_eq!(ticket.upload.user_email.as_deref(), Some("ada@example.com"));
        assert_eq!(ticket.upload.user_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut flow = PredictionFlow::new();
        flow.select_file(png()).unwrap();
        let ticket = flow.begin_submit(&Session::logged_out()).unwrap();

        flow.invalidate();
        let completion = flow.finish_submit(
            &ticket,
            Ok(Submission {
                response: PredictionResponse {
                    success: true,
                    prediction: Prediction::canned(),
                    prediction_id: None,
                },
                history: Vec::new(),
            }),
        );

        assert_eq!(completion, Completion::Stale);
        assert_eq!(flow.state(), FlowState::Idle);
        assert!(flow.result().is_none());
    }

    #[test]
    fn test_failed_submission_returns_to_file_selected() {
        let mut flow = PredictionFlow::new();
        flow.select_file(png()).unwrap();
        let ticket = flow.begin_submit(&Session::logged_out()).unwrap();

        let completion = flow.finish_submit(&ticket, Err(GatewayError::Timeout));
        assert_eq!(completion, Completion::Failed(Notice::error("Request timeout")));
        assert_eq!(flow.state(), FlowState::FileSelected);
        assert!(flow.can_submit());
    }

    #[tokio::test]
    async fn test_guest_prediction_end_to_end() {
        let transport = Arc::new(FlakyFeedback {
            stub: StubTransport::instant(),
            uploads: Mutex::new(Vec::new()),
        });
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport.clone());
        let mut flow = PredictionFlow::new();

        flow.select_file(png()).unwrap();
        let completion = flow.submit(&gateway, &Session::logged_out()).await.unwrap();

        assert_eq!(completion, Completion::Shown);
        assert_eq!(flow.state(), FlowState::ResultShown);
        // the same file may be sent again
        assert!(flow.can_submit());
        assert_eq!(
            flow.result().unwrap().prediction.blood_group,
            BloodGroup::APositive
        );

        let uploads = transport.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].user_id, 1);
        assert!(uploads[0].user_email.is_none());
    }

    #[tokio::test]
    async fn test_feedback_yes_branch() {
        let gateway = stub_gateway();
        let mut flow = PredictionFlow::new();
        flow.select_file(png()).unwrap();
        flow.submit(&gateway, &Session::logged_out()).await.unwrap();

        let feedback = flow.answer(true).unwrap().unwrap();
        assert_eq!(feedback.prediction_id, Some(1));
        assert_eq!(feedback.actual_blood_group, BloodGroup::APositive);

        let notice = flow.send_feedback(&gateway, &feedback).await;
        assert_eq!(
            notice.message,
            "Thank you for your feedback! This will help improve the model."
        );
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn test_feedback_failure_keeps_flow_usable() {
        let transport = Arc::new(FlakyFeedback {
            stub: StubTransport::instant(),
            uploads: Mutex::new(Vec::new()),
        });
        let gateway = ApiGateway::with_transport(ApiRoutes::default(), transport);
        let mut flow = PredictionFlow::new();
        flow.select_file(png()).unwrap();
        flow.submit(&gateway, &Session::logged_out()).await.unwrap();

        assert!(flow.answer(false).unwrap().is_none());
        assert!(flow.shows_group_selector());

        let feedback = flow.correct_to(BloodGroup::ONegative).unwrap();
        let notice = flow.send_feedback(&gateway, &feedback).await;

        assert!(notice.is_error());
        assert_eq!(notice.message, "Error saving feedback");
        assert_eq!(flow.state(), FlowState::FeedbackPending);

        // a new cycle can still start
        flow.select_file(png()).unwrap();
        assert!(flow.can_submit());
    }

    #[test]
    fn test_answer_without_result() {
        let mut flow = PredictionFlow::new();
        assert_eq!(flow.answer(true).unwrap_err(), FlowError::NoResult);
    }
}
