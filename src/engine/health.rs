//! Engine responsiveness checks.
//!
//! Constructing a client never contacts the daemon; these helpers ping it
//! with a bounded timeout to confirm it is actually serving requests.

use std::time::Duration;

use bollard::Docker;

use crate::error::{ConnectionError, Result};

/// Timeout in seconds for health check operations.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 3;

/// Verify the container engine is responsive (async version).
///
/// # Errors
///
/// Returns `ConnectionError::HealthCheckFailed` if the engine does not
/// respond correctly.
///
/// Returns `ConnectionError::HealthCheckTimeout` if the check times out.
pub async fn verify_async(docker: &Docker) -> Result<()> {
    let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

    tokio::time::timeout(timeout, docker.ping())
        .await
        .map_err(|_| ConnectionError::HealthCheckTimeout {
            seconds: HEALTH_CHECK_TIMEOUT_SECS,
        })?
        .map_err(|e| ConnectionError::HealthCheckFailed {
            message: e.to_string(),
        })?;
    Ok(())
}

/// Verify the container engine is responsive.
///
/// Creates a dedicated tokio runtime; use [`verify_async`] when already in an
/// async context.
///
/// # Errors
///
/// Returns `ConnectionError::RuntimeCreationFailed` if the tokio runtime
/// cannot be created, otherwise the errors of [`verify_async`].
pub fn verify(docker: &Docker) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| ConnectionError::RuntimeCreationFailed {
        message: e.to_string(),
    })?;
    rt.block_on(verify_async(docker))
}
