//! Query executor: validates the current input, normalizes parameters,
//! calls the backend and folds the outcome back into [`QueryState`].
//!
//! [`QueryExecutor::submit`] takes `&mut self`, so two submissions can never
//! share one state concurrently. Callers that need to drive the request
//! themselves use [`QueryExecutor::begin`] and [`QueryExecutor::finish`];
//! there a second `begin` while one is in flight fails with
//! [`QueryError::Busy`] and late completions are discarded by sequence.

use product_search_client::SearchClientError;
use product_search_client::types::{ImageFile, ProductSearchResponse, SearchRequest};
use tracing::{debug, instrument};

use crate::backend::SearchBackend;
use crate::error::{QueryError, QueryResult, SEARCH_FAILED};
use crate::preview::PreviewRegistry;
use crate::state::{QueryEvent, QueryState, QueryStatus, Transition};

/// A submission that has been started but not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSearch {
    pub seq: u64,
    pub request: SearchRequest,
}

pub struct QueryExecutor<B> {
    backend: B,
    state: QueryState,
}

impl<B: SearchBackend> QueryExecutor<B> {
    pub fn new(backend: B, registry: PreviewRegistry) -> Self {
        Self {
            backend,
            state: QueryState::new(registry),
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Feeds a raw event to the state.
    pub fn dispatch(&mut self, event: QueryEvent) -> Transition {
        self.state.apply(event)
    }

    pub fn set_file(&mut self, file: Option<ImageFile>) {
        self.dispatch(QueryEvent::FileSelected(file));
    }

    pub fn set_url(&mut self, text: impl Into<String>) {
        self.dispatch(QueryEvent::UrlEdited(text.into()));
    }

    pub fn set_top_k(&mut self, raw: f64) {
        self.dispatch(QueryEvent::TopKEdited(raw));
    }

    pub fn set_threshold_percent(&mut self, raw: f64) {
        self.dispatch(QueryEvent::ThresholdEdited(raw));
    }

    pub fn reset(&mut self) {
        self.dispatch(QueryEvent::Reset);
    }

    pub fn cancel(&mut self) -> Transition {
        self.dispatch(QueryEvent::Cancelled)
    }

    /// Validates the input and moves the query to `submitting`.
    ///
    /// # Errors
    /// - [`QueryError::Busy`] while another submission is in flight; state is
    ///   left untouched
    /// - [`QueryError::Validation`] without usable input; the query moves to
    ///   `error` and no request is produced
    pub fn begin(&mut self) -> QueryResult<PendingSearch> {
        if !self.state.can_submit() {
            debug!(in_flight = ?self.state.in_flight(), "submit ignored while busy");
            return Err(QueryError::Busy);
        }

        let request = match self.state.search_request() {
            Ok(request) => request,
            Err(err) => {
                self.state.apply(QueryEvent::SubmitRejected(err.clone()));
                return Err(err);
            }
        };

        let seq = self.state.next_seq();
        self.state.apply(QueryEvent::SubmitStarted { seq });
        Ok(PendingSearch { seq, request })
    }

    /// Folds a backend outcome into the state.
    pub fn finish(
        &mut self,
        seq: u64,
        outcome: Result<ProductSearchResponse, SearchClientError>,
    ) -> Transition {
        let event = match outcome {
            Ok(response) => QueryEvent::SubmitSucceeded { seq, response },
            Err(err) => QueryEvent::SubmitFailed {
                seq,
                error: QueryError::from_search(err),
            },
        };
        self.state.apply(event)
    }

    /// Runs one full submission against the backend.
    ///
    /// On return the state is `success` or `error`; the error is also
    /// returned so callers can react without inspecting state.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> QueryResult<()> {
        let pending = self.begin()?;
        let outcome = self.backend.search(&pending.request).await;
        self.finish(pending.seq, outcome);

        match self.state.status() {
            QueryStatus::Success => Ok(()),
            _ => Err(self
                .state
                .error()
                .cloned()
                .unwrap_or_else(|| QueryError::Transport(SEARCH_FAILED.to_string()))),
        }
    }
}
