//! Structured error codes shared by every service error.
//!
//! DESIGN
//! ======
//! Each error enum implements [`ErrorCode`] so routes can render a uniform
//! JSON body: `{ "code": "E_...", "message": "...", "retryable": bool }`.

use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON error payload returned by API routes.
#[derive(Debug, Clone, Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl ErrorBody {
    /// Build a body from a typed error.
    #[must_use]
    pub fn from_error(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code().to_string(), message: err.to_string(), retryable: err.retryable() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_from_typed_error() {
        #[derive(Debug, thiserror::Error)]
        #[error("not found")]
        struct NotFound;

        impl ErrorCode for NotFound {
            fn error_code(&self) -> &'static str {
                "E_NOT_FOUND"
            }
        }

        let body = ErrorBody::from_error(&NotFound);
        assert_eq!(body.code, "E_NOT_FOUND");
        assert_eq!(body.message, "not found");
        assert!(!body.retryable);
    }

    #[test]
    fn retryable_flag_is_carried() {
        #[derive(Debug, thiserror::Error)]
        #[error("try later")]
        struct Busy;

        impl ErrorCode for Busy {
            fn error_code(&self) -> &'static str {
                "E_BUSY"
            }

            fn retryable(&self) -> bool {
                true
            }
        }

        let json = serde_json::to_value(ErrorBody::from_error(&Busy)).unwrap();
        assert_eq!(json["retryable"], serde_json::Value::Bool(true));
        assert_eq!(json["code"], "E_BUSY");
    }
}
