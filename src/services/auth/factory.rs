/// Factory: build the process-wide `Authority` client from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{Authority, HttpAuthority};

pub fn build_authority(config: &Config) -> Result<Arc<dyn Authority>, AppError> {
    let authority = HttpAuthority::new(
        &config.auth_service_url,
        config.auth_validate_timeout,
        config.auth_connect_timeout,
    )
    .map_err(|err| {
        tracing::error!(error = %err, "failed to build authority client");
        AppError::Internal
    })?;

    tracing::info!(
        validate_url = %authority.validate_url(),
        timeout_ms = config.auth_validate_timeout.as_millis() as u64,
        "authority client ready"
    );

    Ok(Arc::new(authority))
}
