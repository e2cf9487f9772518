//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::commission::CommissionError;
use crate::currency::CurrencyError;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Commission(#[from] CommissionError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: &'static str,
    pub message: String,
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            AppError::Pricing(PricingError::ItemNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Pricing(_) => (StatusCode::UNPROCESSABLE_ENTITY, "pricing"),
            AppError::Commission(e) => match e {
                CommissionError::InvoiceNotFound(_) | CommissionError::CommissionNotFound(_) => {
                    (StatusCode::NOT_FOUND, "not_found")
                }
                CommissionError::DuplicateCommission { .. }
                | CommissionError::InvalidTransition { .. } => (StatusCode::CONFLICT, "commission"),
                CommissionError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database")
                }
                _ => (StatusCode::UNPROCESSABLE_ENTITY, "commission"),
            },
            AppError::Currency(CurrencyError::DiveCenterNotFound(_)) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Currency(_) => (StatusCode::UNPROCESSABLE_ENTITY, "currency"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        // Don't leak driver details to the client
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error_type, message })).into_response()
    }
}

/// A string column held a value outside the expected set
#[derive(Debug, thiserror::Error)]
#[error("unknown {column} value: {value:?}")]
pub struct UnknownVariant {
    pub column: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_commission_is_conflict() {
        let err = AppError::from(CommissionError::DuplicateCommission {
            agent_id: 1,
            invoice_id: 2,
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_rate_is_unprocessable() {
        let err = AppError::from(CurrencyError::MissingRate("EUR".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_overflow_is_unprocessable() {
        let err = AppError::from(CurrencyError::Overflow {
            from: "AED".to_string(),
            to: "USD".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::from(CommissionError::AmountOverflow { invoice_id: 7 });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_database_error_is_internal() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = UnknownVariant::new("status", "Refunded");
        assert_eq!(err.to_string(), "unknown status value: \"Refunded\"");
    }
}
