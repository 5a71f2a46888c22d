//! Fetch lifecycle state for a single watch session.
//!
//! One tagged state covers the whole lifecycle, so contradictory
//! combinations (fetching while showing an error, a stale snapshot next to
//! a spinner) cannot be represented. Every fetch attempt carries a ticket;
//! completing with a stale ticket is a no-op, which keeps a slow response
//! from overwriting state that a later submit or pair change produced.

use crate::core::currency::CurrencyPair;
use crate::core::rate::{FetchError, RateSnapshot};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Raised by [`Session::submit`] when no usable API key is present.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("An API key is required before rates can be fetched")]
pub struct MissingApiKey;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No fetch outcome yet: before submission, or after a canceled attempt.
    Idle,
    Fetching,
    Success(RateSnapshot),
    Error(String),
}

/// Proof that a fetch attempt was started. Completion is accepted only for
/// the most recently issued ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
pub struct Session {
    api_key: String,
    pair: CurrencyPair,
    state: SessionState,
    last_fetched: Option<DateTime<Utc>>,
    generation: u64,
}

impl Session {
    pub fn new(api_key: &str, pair: CurrencyPair) -> Self {
        Session {
            api_key: api_key.to_string(),
            pair,
            state: SessionState::Idle,
            last_fetched: None,
            generation: 0,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Local wall-clock time of the last completed fetch.
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        match &self.state {
            SessionState::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Starts (or restarts) the session. Requires a non-blank key; clears any
    /// previous snapshot or error and invalidates in-flight fetches.
    pub fn submit(&mut self) -> Result<(), MissingApiKey> {
        if self.api_key.trim().is_empty() {
            return Err(MissingApiKey);
        }
        self.generation += 1;
        self.state = SessionState::Idle;
        self.last_fetched = None;
        Ok(())
    }

    /// Marks a fetch as in flight and hands out the ticket its completion
    /// must present.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = SessionState::Fetching;
        FetchTicket(self.generation)
    }

    /// Applies a fetch outcome. Returns false when the ticket is stale, i.e.
    /// a later submit, fetch, or pair change superseded the attempt.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<RateSnapshot, FetchError>,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        match outcome {
            Ok(snapshot) => {
                self.state = SessionState::Success(snapshot);
                self.last_fetched = Some(Utc::now());
            }
            Err(err) => self.state = SessionState::Error(err.to_string()),
        }
        true
    }

    /// Switches the watched pair. Any in-flight fetch is invalidated; a
    /// pending `Fetching` state falls back to `Idle` since nothing will
    /// complete it. A previous snapshot stays visible until the next fetch.
    pub fn change_pair(&mut self, pair: CurrencyPair) {
        self.pair = pair;
        self.generation += 1;
        if matches!(self.state, SessionState::Fetching) {
            self.state = SessionState::Idle;
        }
    }

    /// Whether the key/pair entry prompt should be rendered: until a fetch
    /// succeeds, and again alongside any error.
    pub fn prompt_visible(&self) -> bool {
        matches!(self.state, SessionState::Idle | SessionState::Error(_))
    }
}
