//! Query state container and its reducer.
//!
//! All query transitions go through [`QueryState::apply`], one
//! [`QueryEvent`] at a time, so the lifecycle can be driven and inspected
//! without any rendering surface:
//!
//! ```text
//! idle ──SubmitStarted──▶ submitting ──SubmitSucceeded──▶ success
//!   ▲                        │  └─────SubmitFailed─────▶ error
//!   └────Reset / Cancelled───┘
//! ```
//!
//! Submissions carry a sequence number. A completion is applied only when it
//! matches the submission currently in flight; anything else is stale.

use product_search_client::types::{ImageFile, Product, ProductSearchResponse, SearchRequest};
use tracing::{debug, info, warn};

use crate::error::{QueryError, QueryResult, ValidationError};
use crate::input::{InputManager, InputMode};
use crate::params::{
    DEFAULT_THRESHOLD_PERCENT, DEFAULT_TOP_K, clamp_top_k, threshold_fraction,
};
use crate::preview::{PreviewRegistry, PreviewResource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// Everything that can happen to a query.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    FileSelected(Option<ImageFile>),
    UrlEdited(String),
    /// Raw user value; non-finite input resets to the default.
    TopKEdited(f64),
    /// Raw user percentage; non-finite input resets to the default.
    ThresholdEdited(f64),
    Reset,
    /// Submission refused before any request was built.
    SubmitRejected(QueryError),
    SubmitStarted { seq: u64 },
    SubmitSucceeded {
        seq: u64,
        response: ProductSearchResponse,
    },
    SubmitFailed { seq: u64, error: QueryError },
    /// Abandon the in-flight submission, if any.
    Cancelled,
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Completion for a submission that is no longer in flight.
    Stale,
    /// Event had nothing to act on (e.g. cancel while idle).
    Ignored,
}

#[derive(Debug)]
pub struct QueryState {
    input: InputManager,
    top_k: f64,
    threshold_percent: f64,
    status: QueryStatus,
    query_id: Option<String>,
    results: Vec<Product>,
    error: Option<QueryError>,
    issued_seq: u64,
    in_flight: Option<u64>,
}

impl QueryState {
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            input: InputManager::new(registry),
            top_k: DEFAULT_TOP_K,
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            status: QueryStatus::Idle,
            query_id: None,
            results: Vec::new(),
            error: None,
            issued_seq: 0,
            in_flight: None,
        }
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn input_mode(&self) -> InputMode {
        self.input.mode()
    }

    pub fn preview(&self) -> Option<&PreviewResource> {
        self.input.preview()
    }

    /// Result count as entered (before clamping).
    pub fn top_k(&self) -> f64 {
        self.top_k
    }

    /// Threshold percentage as entered (before clamping).
    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Ranked matches, in the order the service returned them.
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(QueryError::user_message)
    }

    /// False while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.status != QueryStatus::Submitting
    }

    /// Sequence number of the in-flight submission.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Sequence number the next submission will carry.
    pub fn next_seq(&self) -> u64 {
        self.issued_seq + 1
    }

    /// Builds the normalized request for the current input.
    ///
    /// # Errors
    /// [`ValidationError::NoInput`] when there is neither a file nor a
    /// non-blank URL.
    pub fn search_request(&self) -> QueryResult<SearchRequest> {
        let image = self.input.descriptor().ok_or(ValidationError::NoInput)?;
        Ok(SearchRequest {
            image,
            top_k: clamp_top_k(self.top_k),
            similarity_threshold: threshold_fraction(self.threshold_percent),
        })
    }

    /// Applies one event and reports whether it changed anything.
    pub fn apply(&mut self, event: QueryEvent) -> Transition {
        match event {
            QueryEvent::FileSelected(file) => {
                if file.is_some() {
                    self.clear_error();
                }
                self.input.set_file(file);
                Transition::Applied
            }
            QueryEvent::UrlEdited(text) => {
                self.input.set_url(text);
                Transition::Applied
            }
            QueryEvent::TopKEdited(raw) => {
                self.top_k = if raw.is_finite() { raw } else { DEFAULT_TOP_K };
                Transition::Applied
            }
            QueryEvent::ThresholdEdited(raw) => {
                self.threshold_percent = if raw.is_finite() {
                    raw
                } else {
                    DEFAULT_THRESHOLD_PERCENT
                };
                Transition::Applied
            }
            QueryEvent::Reset => {
                if let Some(seq) = self.in_flight.take() {
                    debug!(seq, "reset abandons in-flight search");
                }
                self.input.clear();
                self.results.clear();
                self.query_id = None;
                self.error = None;
                self.status = QueryStatus::Idle;
                Transition::Applied
            }
            QueryEvent::SubmitRejected(error) => {
                debug!(%error, "submission rejected");
                self.fail(error);
                Transition::Applied
            }
            QueryEvent::SubmitStarted { seq } => {
                self.issued_seq = self.issued_seq.max(seq);
                self.in_flight = Some(seq);
                self.results.clear();
                self.query_id = None;
                self.error = None;
                self.status = QueryStatus::Submitting;
                info!(seq, mode = ?self.input.mode(), "search submitted");
                Transition::Applied
            }
            QueryEvent::SubmitSucceeded { seq, response } => {
                if !self.settle(seq) {
                    return Transition::Stale;
                }
                info!(
                    seq,
                    query_id = %response.query_id,
                    results = response.results.len(),
                    "search succeeded"
                );
                self.results = response.results;
                self.query_id = Some(response.query_id);
                self.status = QueryStatus::Success;
                Transition::Applied
            }
            QueryEvent::SubmitFailed { seq, error } => {
                if !self.settle(seq) {
                    return Transition::Stale;
                }
                warn!(seq, %error, "search failed");
                self.fail(error);
                Transition::Applied
            }
            QueryEvent::Cancelled => match self.in_flight.take() {
                Some(seq) => {
                    info!(seq, "search cancelled");
                    self.status = QueryStatus::Idle;
                    Transition::Applied
                }
                None => Transition::Ignored,
            },
        }
    }

    /// Clears the in-flight marker if `seq` owns it.
    fn settle(&mut self, seq: u64) -> bool {
        if self.in_flight == Some(seq) {
            self.in_flight = None;
            true
        } else {
            warn!(seq, in_flight = ?self.in_flight, "discarding stale search response");
            false
        }
    }

    fn fail(&mut self, error: QueryError) {
        self.results.clear();
        self.query_id = None;
        self.error = Some(error);
        self.status = QueryStatus::Error;
    }

    fn clear_error(&mut self) {
        self.error = None;
        if self.status == QueryStatus::Error {
            self.status = QueryStatus::Idle;
        }
    }
}
