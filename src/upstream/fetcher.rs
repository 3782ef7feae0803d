//! Fetch Orchestrator
//!
//! Drives sequential upstream attempts through the retry policy. The loop is
//! an explicit state machine so every transition depends only on the
//! classified outcome of the previous attempt.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{FetchError, Result};
use crate::metrics::MetricsSink;
use crate::models::Pokemon;
use crate::retry::{classify, Classification, Failure, RetryPolicy};
use crate::upstream::{FetchContext, RawResponse, Transport, TransportError};

/// Metric label for the upstream this fetcher talks to.
pub const DEFAULT_TARGET: &str = "pokeapi";

/// Result of a single upstream attempt, consumed immediately by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(Pokemon),
    RetryableFailure {
        reason: String,
        status: Option<u16>,
    },
    TerminalFailure(FetchError),
    NotFound,
}

/// States of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    /// About to perform attempt `n` (1-based)
    Attempting(u32),
    /// Attempt `n` failed retryably and another attempt is allowed
    Retrying { attempt: u32, reason: String },
    Success(Pokemon),
    NotFound,
    TerminalError(FetchError),
    /// Every allowed attempt failed retryably
    Exhausted {
        last_reason: String,
        last_status: Option<u16>,
    },
}

// == Fetcher ==
/// Performs bounded, cancellable upstream lookups.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    metrics: Arc<dyn MetricsSink>,
    policy: RetryPolicy,
    target: String,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", &self.policy)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        metrics: Arc<dyn MetricsSink>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            metrics,
            policy,
            target: DEFAULT_TARGET.to_string(),
        }
    }

    /// Overrides the `target` label used for metrics.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    // == Fetch ==
    /// Looks up `key` upstream, retrying transient failures.
    ///
    /// Both the upstream call and the backoff sleep end early when `ctx` is
    /// done, yielding [`FetchError::Cancelled`]. Cancelled attempts are not
    /// recorded as upstream failures.
    pub async fn fetch(&self, ctx: &FetchContext, key: &str) -> Result<Pokemon> {
        let mut state = FetchState::Attempting(1);

        loop {
            state = match state {
                FetchState::Attempting(attempt) => {
                    debug!("Fetching {:?} from {} (attempt {})", key, self.target, attempt);
                    let outcome = self.attempt(ctx, key).await?;
                    self.transition(attempt, outcome)
                }
                FetchState::Retrying { attempt, reason } => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        "Upstream attempt {} for {:?} failed ({}), retrying in {:?}",
                        attempt, key, reason, delay
                    );
                    ctx.run(tokio::time::sleep(delay)).await?;
                    FetchState::Attempting(attempt + 1)
                }
                FetchState::Success(pokemon) => return Ok(pokemon),
                FetchState::NotFound => return Err(FetchError::NotFound),
                FetchState::TerminalError(err) => return Err(err),
                FetchState::Exhausted {
                    last_reason,
                    last_status,
                } => {
                    self.metrics.record_request(&self.target, "exhausted");
                    info!(
                        "Upstream retries exhausted for {:?} after {} attempts: {}",
                        key,
                        self.policy.max_attempts(),
                        last_reason
                    );
                    return Err(FetchError::UpstreamUnavailable {
                        last_reason,
                        last_status,
                    });
                }
            };
        }
    }

    /// Next state after `attempt` produced `outcome`.
    pub fn transition(&self, attempt: u32, outcome: AttemptOutcome) -> FetchState {
        match outcome {
            AttemptOutcome::Success(pokemon) => FetchState::Success(pokemon),
            AttemptOutcome::NotFound => FetchState::NotFound,
            AttemptOutcome::TerminalFailure(err) => FetchState::TerminalError(err),
            AttemptOutcome::RetryableFailure { reason, status } => {
                if self.policy.should_retry(attempt, Classification::Retryable) {
                    FetchState::Retrying { attempt, reason }
                } else {
                    FetchState::Exhausted {
                        last_reason: reason,
                        last_status: status,
                    }
                }
            }
        }
    }

    /// One timed upstream call, recorded and classified.
    ///
    /// Latency is observed even when `ctx` ends the call early; the outcome
    /// count is only recorded for calls that finished.
    async fn attempt(&self, ctx: &FetchContext, key: &str) -> Result<AttemptOutcome> {
        if ctx.is_done() {
            return Err(FetchError::Cancelled);
        }

        let started = Instant::now();
        let result = ctx.run(self.transport.request(key)).await;
        self.metrics
            .observe_duration(&self.target, started.elapsed().as_secs_f64());

        let (outcome, label) = match result? {
            Ok(raw) => interpret_response(raw),
            Err(err) => interpret_transport_error(err),
        };
        self.metrics.record_request(&self.target, &label);
        Ok(outcome)
    }
}

fn interpret_response(raw: RawResponse) -> (AttemptOutcome, String) {
    let label = raw.status.to_string();
    if raw.status == 200 {
        return match serde_json::from_slice::<Pokemon>(&raw.body) {
            Ok(pokemon) => (AttemptOutcome::Success(pokemon), label),
            Err(err) => (
                AttemptOutcome::TerminalFailure(FetchError::DecodeFailure(err.to_string())),
                "parse_error".to_string(),
            ),
        };
    }

    let outcome = match classify(Failure::Status(raw.status)) {
        Classification::TerminalNotFound => AttemptOutcome::NotFound,
        Classification::TerminalOther(status) => {
            AttemptOutcome::TerminalFailure(FetchError::UpstreamStatus(status))
        }
        Classification::Retryable | Classification::TerminalTransport => {
            AttemptOutcome::RetryableFailure {
                reason: format!("upstream status {}", raw.status),
                status: Some(raw.status),
            }
        }
    };
    (outcome, label)
}

fn interpret_transport_error(err: TransportError) -> (AttemptOutcome, String) {
    let outcome = match classify(Failure::Transport(&err)) {
        Classification::Retryable => AttemptOutcome::RetryableFailure {
            reason: err.to_string(),
            status: None,
        },
        _ => AttemptOutcome::TerminalFailure(FetchError::UpstreamUnavailable {
            last_reason: err.to_string(),
            last_status: None,
        }),
    };
    (outcome, "error".to_string())
}
