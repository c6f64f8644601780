//! Bounded retry for transient backend errors
//!
//! The executor retries a statement at most once, after replacing a lost
//! session with a fresh one. `RetryOutcome` records which path produced the
//! final result so callers and tests can tell a clean run from a recovered one.

use super::{Error, Result};

/// Trait for errors that can be retried
pub trait RetryableError {
    /// Check if the error is retryable
    fn is_retryable(&self) -> bool;
}

impl RetryableError for Error {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Result of an operation that may have been retried once
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// First attempt succeeded
    Success(T),
    /// First attempt hit a transient error, the retry succeeded
    RetriedSuccess(T),
    /// The retry failed as well (or reconnecting failed); carries the last error
    Exhausted(Error),
}

impl<T> RetryOutcome<T> {
    /// Whether a retry was needed to reach this outcome
    pub fn was_retried(&self) -> bool {
        !matches!(self, RetryOutcome::Success(_))
    }

    /// Whether the operation ultimately succeeded
    pub fn is_success(&self) -> bool {
        !matches!(self, RetryOutcome::Exhausted(_))
    }

    /// Collapse into a plain result, dropping the retry information
    pub fn into_result(self) -> Result<T> {
        match self {
            RetryOutcome::Success(value) | RetryOutcome::RetriedSuccess(value) => Ok(value),
            RetryOutcome::Exhausted(error) => Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RetryOutcome<U> {
        match self {
            RetryOutcome::Success(value) => RetryOutcome::Success(f(value)),
            RetryOutcome::RetriedSuccess(value) => RetryOutcome::RetriedSuccess(f(value)),
            RetryOutcome::Exhausted(error) => RetryOutcome::Exhausted(error),
        }
    }
}
