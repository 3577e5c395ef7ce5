//! Failure types shared by the orchestration patterns.
//!
//! Cancellation is deliberately absent here: a cancelled wait is reported as
//! [`DelayOutcome::Cancelled`](crate::two_ways::cancellable_delay::DelayOutcome),
//! not as an error.

use core::fmt;

/// A single unit of work failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("operation `{operation}` failed: {reason}")]
pub struct OperationError {
    pub operation: String,
    pub reason: String,
}

impl OperationError {
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// One failed member of a fan-in, tagged with its launch position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub index: usize,
    pub error: OperationError,
}

/// One or more operations of a fan-in failed.
///
/// Only produced after every operation has settled. `failures` is never
/// empty and is sorted by launch position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateError {
    total: usize,
    failures: Vec<Failure>,
}

impl AggregateError {
    /// Returns `None` when there is nothing to report.
    pub(crate) fn new(total: usize, mut failures: Vec<Failure>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        failures.sort_by_key(|f| f.index);
        Some(Self { total, failures })
    }

    /// The failure with the lowest launch position.
    pub fn first(&self) -> &Failure {
        &self.failures[0]
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Launch positions of the operations that failed.
    pub fn failed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.failures.iter().map(|f| f.index)
    }

    /// Number of operations that were launched, failed or not.
    pub fn total(&self) -> usize {
        self.total
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first();
        write!(
            f,
            "{} of {} operations failed, first at position {}: {}",
            self.failures.len(),
            self.total,
            first.index,
            first.error
        )
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.first().error)
    }
}
