//! Stand-in units of work. Each returns a fixed string; only the first one
//! takes any time.

use core::time::Duration;

use crate::{basics::sleep, error::OperationError};

pub const FETCH_RESULT: &str = "Result of the operation";
pub const SOMETHING_ELSE: &str = "Some Stuff";
pub const ANOTHER_OPERATION: &str = "Doing Another Async...";

/// Simulated slow operation.
pub async fn fetch_result(work: Duration) -> Result<String, OperationError> {
    tracing::debug!(?work, "fetch_result started");
    sleep(work).await;
    tracing::debug!("fetch_result finished");
    Ok(FETCH_RESULT.to_string())
}

pub async fn something_else(input: String) -> Result<String, OperationError> {
    tracing::debug!(%input, "something_else");
    Ok(SOMETHING_ELSE.to_string())
}

pub async fn another_operation(first: String, second: String) -> Result<String, OperationError> {
    tracing::debug!(%first, %second, "another_operation");
    Ok(ANOTHER_OPERATION.to_string())
}
