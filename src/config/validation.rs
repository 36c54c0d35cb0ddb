//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check credentials are present before any request is made
//! - Validate value ranges (attempts >= 1, timeouts > 0, delays ordered)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DataplaneConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::DataplaneConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &DataplaneConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let address = config.server.address.trim();
    if address.is_empty() {
        errors.push(ValidationError::new("server.address", "must not be empty"));
    } else if address.contains("://") || address.contains('/') {
        errors.push(ValidationError::new(
            "server.address",
            "must be host[:port] without scheme or path",
        ));
    }
    if config.server.username.is_empty() {
        errors.push(ValidationError::new("server.username", "must not be empty"));
    }
    if config.server.password.is_empty() {
        errors.push(ValidationError::new("server.password", "must not be empty"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            format!(
                "{} exceeds max_delay_ms {}",
                config.retries.base_delay_ms, config.retries.max_delay_ms
            ),
        ));
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::new("observability.log_level", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
