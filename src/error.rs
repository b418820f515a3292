#[cfg(feature = "api")]
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use thiserror::Error;

use crate::core::odds::{validate_odds, MAX_ODDS};

#[cfg(feature = "api")]
use crate::models::ErrorResponse;

/// Library errors
#[derive(Debug, Error)]
pub enum KeibaError {
    #[error("exactly {expected} categories required, got {actual}")]
    CategoryCount { expected: usize, actual: usize },

    #[error("category {0} selected more than once")]
    DuplicateCategory(u32),

    #[error("unknown category id: {0}")]
    UnknownCategory(u32),

    #[error("wizard step {step} is incomplete: {reason}")]
    IncompleteStep { step: u8, reason: String },

    #[error("robot not found: {0}")]
    RobotNotFound(u64),

    #[error("no robot id left to assign")]
    RobotIdsExhausted,

    #[error("invalid odds for horse {horse_id}: {odds}")]
    InvalidOdds { horse_id: u32, odds: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// Referenced resource does not exist
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<KeibaError> for AppError {
    fn from(err: KeibaError) -> Self {
        match err {
            KeibaError::RobotNotFound(_) => AppError::NotFound(err.to_string()),
            KeibaError::Io(_) | KeibaError::Json(_) => AppError::InternalError(err.to_string()),
            _ => AppError::ValidationError(err.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::NotFound(msg) => ("not_found", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

/// Largest field accepted for scoring
pub const MAX_HORSES: usize = 18;

/// Validation functions
pub fn validate_horse_count(count: usize) -> Result<(), AppError> {
    if count == 0 || count > MAX_HORSES {
        return Err(AppError::ValidationError(format!(
            "Between 1 and {} horses required, got {}",
            MAX_HORSES, count
        )));
    }
    Ok(())
}

pub fn validate_root_index(root_index: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&root_index) {
        return Err(AppError::ValidationError(format!(
            "Root index must be between 0 and 100, got {}",
            root_index
        )));
    }
    Ok(())
}

pub fn validate_place_rate(place_rate: f64) -> Result<(), AppError> {
    if !(0.0..=1.0).contains(&place_rate) {
        return Err(AppError::ValidationError(format!(
            "Place rate must be between 0 and 1, got {}",
            place_rate
        )));
    }
    Ok(())
}

pub fn validate_horse_odds(horse_id: u32, odds: f64) -> Result<(), AppError> {
    if !validate_odds(odds) {
        return Err(AppError::ValidationError(format!(
            "Odds for horse {} must be greater than 0 and at most {}, got {}",
            horse_id, MAX_ODDS, odds
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_horse_count_valid() {
        assert!(validate_horse_count(1).is_ok());
        assert!(validate_horse_count(8).is_ok());
        assert!(validate_horse_count(18).is_ok());
    }

    #[test]
    fn test_validate_horse_count_invalid() {
        assert!(validate_horse_count(0).is_err());
        assert!(validate_horse_count(19).is_err());
    }

    #[test]
    fn test_validate_root_index() {
        assert!(validate_root_index(0.0).is_ok());
        assert!(validate_root_index(50.0).is_ok());
        assert!(validate_root_index(100.0).is_ok());
        assert!(validate_root_index(-1.0).is_err());
        assert!(validate_root_index(100.5).is_err());
        assert!(validate_root_index(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_place_rate() {
        assert!(validate_place_rate(0.0).is_ok());
        assert!(validate_place_rate(0.75).is_ok());
        assert!(validate_place_rate(1.0).is_ok());
        assert!(validate_place_rate(-0.1).is_err());
        assert!(validate_place_rate(1.1).is_err());
    }

    #[test]
    fn test_validate_horse_odds() {
        assert!(validate_horse_odds(1, 1.5).is_ok());
        assert!(validate_horse_odds(1, 1000.0).is_ok());
        assert!(validate_horse_odds(1, 0.0).is_err());
        assert!(validate_horse_odds(1, -3.0).is_err());
        assert!(validate_horse_odds(1, 5000.0).is_err());
        assert!(validate_horse_odds(1, f64::NAN).is_err());
    }

    #[test]
    fn test_keiba_error_display() {
        let err = KeibaError::CategoryCount {
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.to_string(), "exactly 4 categories required, got 2");
    }

    #[test]
    fn test_keiba_error_into_app_error() {
        let app: AppError = KeibaError::RobotNotFound(7).into();
        assert!(matches!(app, AppError::NotFound(_)));

        let app: AppError = KeibaError::DuplicateCategory(3).into();
        assert!(matches!(app, AppError::ValidationError(_)));
        assert!(app.to_string().contains("Validation error"));
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalError("".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
