//! Retry policy for collaborator commands (checkout, install).
//!
//! Failures are never classified: every non-zero exit is treated as transient.
//! The default policy retries forever with no backoff, which suits supervised
//! interactive runs; a cap makes the behavior testable and scriptable.

/// How many times a failing command may be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Total attempts allowed (`None` means unbounded).
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    pub fn limited(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    /// Build from the config value, where `0` means unbounded.
    pub fn from_config(max_attempts: u32) -> Self {
        if max_attempts == 0 {
            Self::unbounded()
        } else {
            Self::limited(max_attempts)
        }
    }

    /// Whether another attempt may follow `attempts_made` failed attempts.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts_made < max)
    }
}
