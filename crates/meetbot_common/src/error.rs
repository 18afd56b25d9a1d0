use std::fmt;
use thiserror::Error;

/// The base error type shared by all meetbot crates.
///
/// Crates with richer errors convert into this at their boundary.
#[derive(Error, Debug)]
pub enum MeetbotError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for MeetbotError {
    fn status_code(&self) -> u16 {
        match self {
            MeetbotError::ParseError(_) => 400,
            MeetbotError::ConfigError(_) => 500,
            MeetbotError::ValidationError(_) => 400,
            MeetbotError::ExternalServiceError { .. } => 502,
            MeetbotError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for MeetbotError {
    fn from(err: serde_json::Error) -> Self {
        MeetbotError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> MeetbotError {
    MeetbotError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> MeetbotError {
    MeetbotError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> MeetbotError {
    MeetbotError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> MeetbotError {
    MeetbotError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_category() {
        assert_eq!(validation_error("duration must be positive").status_code(), 400);
        assert_eq!(config_error("unknown time zone").status_code(), 500);
        assert_eq!(internal_error("lock poisoned").status_code(), 500);
        assert_eq!(
            external_service_error("google-calendar", "403 forbidden").status_code(),
            502
        );
    }

    #[test]
    fn external_service_error_names_the_service() {
        let err = external_service_error("google-calendar", "quota exceeded");
        assert_eq!(
            err.to_string(),
            "External service error: google-calendar - quota exceeded"
        );
    }

    #[test]
    fn serde_errors_become_parse_errors() {
        let err: MeetbotError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, MeetbotError::ParseError(_)));
    }
}
