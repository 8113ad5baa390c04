//! Termination policy for the validate-and-repair loop.
//!
//! A failed validation makes progress only when it names at least one usable
//! missing package and its diagnostics differ from the previous failure.
//! Consecutive failures without progress are bounded by `stall_limit`.

use std::fmt;

/// Limits applied to the repair loop of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairPolicy {
    /// Consecutive no-progress failures tolerated before giving up (min 1).
    pub stall_limit: u32,
    /// Total validation runs allowed for one unit (`None` means unbounded).
    pub max_validations: Option<u32>,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            stall_limit: 3,
            max_validations: None,
        }
    }
}

/// Why the repair loop stopped without a passing validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiveUpReason {
    /// Too many consecutive failures without an actionable missing package.
    Stalled { consecutive: u32 },
    /// The per-unit validation budget was used up.
    ValidationLimit { max: u32 },
}

impl fmt::Display for GiveUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveUpReason::Stalled { consecutive } => write!(
                f,
                "{consecutive} consecutive failure(s) without a resolvable missing package"
            ),
            GiveUpReason::ValidationLimit { max } => {
                write!(f, "validation limit of {max} run(s) reached")
            }
        }
    }
}

/// Next action after a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairDecision {
    /// Resolve the extracted packages and validate again.
    Continue,
    GiveUp(GiveUpReason),
}

/// Per-unit bookkeeping for the repair loop.
#[derive(Debug, Clone)]
pub struct RepairTracker {
    policy: RepairPolicy,
    failures: u32,
    consecutive_stalls: u32,
    last_diagnostics: Option<String>,
}

impl RepairTracker {
    pub fn new(policy: RepairPolicy) -> Self {
        Self {
            policy,
            failures: 0,
            consecutive_stalls: 0,
            last_diagnostics: None,
        }
    }

    /// Number of failed validations recorded so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Record a failed validation and decide whether to keep repairing.
    pub fn record_failure(&mut self, diagnostics: &str, usable_names: usize) -> RepairDecision {
        self.failures = self.failures.saturating_add(1);

        let repeated = self.last_diagnostics.as_deref() == Some(diagnostics);
        if usable_names == 0 || repeated {
            self.consecutive_stalls = self.consecutive_stalls.saturating_add(1);
        } else {
            self.consecutive_stalls = 0;
        }
        self.last_diagnostics = Some(diagnostics.to_string());

        if self.consecutive_stalls >= self.policy.stall_limit.max(1) {
            return RepairDecision::GiveUp(GiveUpReason::Stalled {
                consecutive: self.consecutive_stalls,
            });
        }
        if let Some(max) = self.policy.max_validations
            && self.failures >= max
        {
            return RepairDecision::GiveUp(GiveUpReason::ValidationLimit { max });
        }
        RepairDecision::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(stall_limit: u32, max_validations: Option<u32>) -> RepairPolicy {
        RepairPolicy {
            stall_limit,
            max_validations,
        }
    }

    #[test]
    fn actionable_failures_continue() {
        let mut tracker = RepairTracker::new(policy(1, None));
        assert_eq!(tracker.record_failure("missing a", 1), RepairDecision::Continue);
        assert_eq!(tracker.record_failure("missing b", 2), RepairDecision::Continue);
        assert_eq!(tracker.failures(), 2);
    }

    #[test]
    fn failures_without_names_stall_out() {
        let mut tracker = RepairTracker::new(policy(2, None));
        assert_eq!(tracker.record_failure("type error", 0), RepairDecision::Continue);
        assert_eq!(
            tracker.record_failure("type error 2", 0),
            RepairDecision::GiveUp(GiveUpReason::Stalled { consecutive: 2 })
        );
    }

    #[test]
    fn repeated_diagnostics_count_as_stall() {
        let mut tracker = RepairTracker::new(policy(2, None));
        assert_eq!(tracker.record_failure("missing a", 1), RepairDecision::Continue);
        assert_eq!(
            tracker.record_failure("missing a", 1),
            RepairDecision::Continue
        );
        assert_eq!(
            tracker.record_failure("missing a", 1),
            RepairDecision::GiveUp(GiveUpReason::Stalled { consecutive: 2 })
        );
    }

    #[test]
    fn progress_resets_stall_counter() {
        let mut tracker = RepairTracker::new(policy(2, None));
        assert_eq!(tracker.record_failure("noise", 0), RepairDecision::Continue);
        assert_eq!(tracker.record_failure("missing a", 1), RepairDecision::Continue);
        assert_eq!(tracker.record_failure("noise", 0), RepairDecision::Continue);
    }

    #[test]
    fn validation_limit_caps_total_runs() {
        let mut tracker = RepairTracker::new(policy(5, Some(2)));
        assert_eq!(tracker.record_failure("missing a", 1), RepairDecision::Continue);
        assert_eq!(
            tracker.record_failure("missing b", 1),
            RepairDecision::GiveUp(GiveUpReason::ValidationLimit { max: 2 })
        );
    }

    #[test]
    fn counters_saturate_instead_of_overflowing() {
        let mut tracker = RepairTracker::new(policy(u32::MAX, None));
        tracker.failures = u32::MAX;
        tracker.consecutive_stalls = u32::MAX - 1;
        assert_eq!(
            tracker.record_failure("noise", 0),
            RepairDecision::GiveUp(GiveUpReason::Stalled {
                consecutive: u32::MAX
            })
        );
        assert_eq!(tracker.failures(), u32::MAX);
        assert!(matches!(
            tracker.record_failure("noise", 0),
            RepairDecision::GiveUp(GiveUpReason::Stalled { .. })
        ));
    }

    #[test]
    fn give_up_reason_renders() {
        let reason = GiveUpReason::Stalled { consecutive: 3 };
        assert!(reason.to_string().contains("3 consecutive"));
    }
}
