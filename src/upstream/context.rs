//! Fetch Context
//!
//! Cooperative cancellation and deadline for a single lookup.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

/// Cancellation signal threaded through every blocking step of a fetch.
///
/// The context is done once its token is cancelled or its deadline passes,
/// whichever happens first.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    /// A context that only ends when cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that ends `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the context is done.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Drives `fut` to completion unless the context ends first.
    ///
    /// An already finished context wins over a future that is immediately ready.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, FetchError> {
        tokio::select! {
            biased;
            _ = self.done() => Err(FetchError::Cancelled),
            output = fut => Ok(output),
        }
    }
}
