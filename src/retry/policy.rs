//! Retry classification and bound.

use std::time::Duration;

use crate::retry::Backoff;
use crate::upstream::TransportError;

/// A failed attempt as seen by the retry policy.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// The call produced no HTTP status
    Transport(&'a TransportError),
    /// The upstream answered with a non-success status
    Status(u16),
}

/// How a failed attempt should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Retryable,
    TerminalNotFound,
    TerminalOther(u16),
    /// A transport failure that cannot succeed on retry
    TerminalTransport,
}

/// Classifies a failed attempt.
///
/// Transport errors are retried unless they are provably permanent, so an
/// unrecognised failure favours availability over failing fast.
pub fn classify(failure: Failure<'_>) -> Classification {
    match failure {
        Failure::Transport(err) if err.is_transient() => Classification::Retryable,
        Failure::Transport(_) => Classification::TerminalTransport,
        Failure::Status(404) => Classification::TerminalNotFound,
        Failure::Status(status) if status >= 500 => Classification::Retryable,
        Failure::Status(status) => Classification::TerminalOther(status),
    }
}

// == Retry Policy ==
/// Attempt bound plus the delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Backoff::default())
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first call; values below one are raised to one.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// True iff the failure is retryable and attempts remain.
    pub fn should_retry(&self, attempt: u32, classification: Classification) -> bool {
        classification == Classification::Retryable && attempt < self.max_attempts
    }

    /// Jittered wait after failed `attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::TransportErrorKind;

    #[test]
    fn test_classify_statuses() {
        assert_eq!(classify(Failure::Status(404)), Classification::TerminalNotFound);
        assert_eq!(classify(Failure::Status(500)), Classification::Retryable);
        assert_eq!(classify(Failure::Status(503)), Classification::Retryable);
        assert_eq!(classify(Failure::Status(599)), Classification::Retryable);
        assert_eq!(classify(Failure::Status(400)), Classification::TerminalOther(400));
        assert_eq!(classify(Failure::Status(429)), Classification::TerminalOther(429));
        assert_eq!(classify(Failure::Status(301)), Classification::TerminalOther(301));
        assert_eq!(classify(Failure::Status(204)), Classification::TerminalOther(204));
    }

    #[test]
    fn test_classify_transport_errors() {
        let timeout = TransportError::new(TransportErrorKind::Timeout, "timed out");
        let refused = TransportError::new(TransportErrorKind::Connect, "connection refused");
        let unknown = TransportError::new(TransportErrorKind::Request, "reset by peer");
        let broken = TransportError::new(TransportErrorKind::InvalidRequest, "bad url");

        assert_eq!(classify(Failure::Transport(&timeout)), Classification::Retryable);
        assert_eq!(classify(Failure::Transport(&refused)), Classification::Retryable);
        assert_eq!(classify(Failure::Transport(&unknown)), Classification::Retryable);
        assert_eq!(
            classify(Failure::Transport(&broken)),
            Classification::TerminalTransport
        );
    }

    #[test]
    fn test_should_retry_bound() {
        let policy = RetryPolicy::new(3, Backoff::default());

        assert!(policy.should_retry(1, Classification::Retryable));
        assert!(policy.should_retry(2, Classification::Retryable));
        assert!(!policy.should_retry(3, Classification::Retryable));
        assert!(!policy.should_retry(4, Classification::Retryable));
    }

    #[test]
    fn test_should_retry_never_for_terminal() {
        let policy = RetryPolicy::new(5, Backoff::default());

        assert!(!policy.should_retry(1, Classification::TerminalNotFound));
        assert!(!policy.should_retry(1, Classification::TerminalOther(400)));
        assert!(!policy.should_retry(1, Classification::TerminalTransport));
    }

    #[test]
    fn test_zero_attempts_raised_to_one() {
        let policy = RetryPolicy::new(0, Backoff::default());
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(1, Classification::Retryable));
    }

    #[test]
    fn test_backoff_delay_follows_schedule() {
        let policy = RetryPolicy::default();
        let delay = policy.backoff_delay(2);

        assert!(delay <= Duration::from_millis(200));
        assert!(delay > Duration::from_millis(170));
    }
}
