//! Last-query-wins suggestion fetching
//!
//! Every call to [`SuggestionFetcher::fetch`] opens a new generation and
//! cancels the request of the previous one. A response is only handed back
//! while its generation is still the newest, so a slow answer for an old
//! keystroke can never replace the answer for a newer one.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::SiteContext;
use crate::suggest::client::SuggestionSource;
use crate::suggest::types::SuggestionResult;

/// Default time allowed for a single lookup
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Wraps a [`SuggestionSource`] with supersession, timeout and soft-fail handling
#[derive(Debug)]
pub struct SuggestionFetcher<S> {
    source: S,
    timeout: Duration,
    generation: AtomicU64,
    in_flight: Mutex<CancellationToken>,
}

impl<S: SuggestionSource> SuggestionFetcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_timeout(source, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(source: S, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Generation of the most recently issued request
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new generation, cancelling the previous request
    fn supersede(&self) -> (u64, CancellationToken) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.cancel();
        *in_flight = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (generation, in_flight.clone())
    }

    /// Discard whatever request is in flight without issuing a new one
    pub fn cancel(&self) {
        self.supersede();
    }

    /// Fetch suggestions for `query`
    ///
    /// Returns `None` when a newer call superseded this one before it
    /// resolved. A blank query resolves to an empty result without a lookup;
    /// lookup failures and timeouts also resolve to an empty result.
    pub async fn fetch(&self, query: &str, site: &SiteContext) -> Option<SuggestionResult> {
        let (generation, token) = self.supersede();

        let query = query.trim();
        if query.is_empty() {
            return Some(SuggestionResult::empty(query));
        }

        let lookup = tokio::time::timeout(self.timeout, self.source.fetch_suggestions(query, site));
        let outcome = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Suggestion request for '{}' cancelled", query);
                return None;
            }
            outcome = lookup => outcome,
        };

        if self.current_generation() != generation {
            tracing::debug!("Discarding superseded suggestions for '{}'", query);
            return None;
        }

        match outcome {
            Ok(Ok(result)) => Some(result),
            Ok(Err(e)) => {
                tracing::warn!("Suggestion lookup for '{}' failed: {:#}", query, e);
                Some(SuggestionResult::empty(query))
            }
            Err(_) => {
                tracing::warn!(
                    "Suggestion lookup for '{}' timed out after {:?}",
                    query,
                    self.timeout
                );
                Some(SuggestionResult::empty(query))
            }
        }
    }
}
