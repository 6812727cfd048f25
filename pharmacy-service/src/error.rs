use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Member not found: {member}")]
    MemberNotFound { member: String },

    #[error("Provider not found: {provider}")]
    ProviderNotFound { provider: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Database error")]
    Database(#[from] DatabaseError),

    #[error("Cache error")]
    Cache(#[from] CacheError),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Database errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed")]
    Connection(#[source] rusqlite::Error),

    #[error("Query failed")]
    Query(#[source] rusqlite::Error),

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("Database lock poisoned")]
    Poisoned,
}

/// Cache backend errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Connection failed to cache at {url}")]
    Connection {
        url: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("Cache command failed")]
    Command(#[source] redis::RedisError),

    #[error("Cached value could not be (de)serialized")]
    Serialization(#[source] serde_json::Error),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ServiceError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MemberNotFound { .. } | ServiceError::ProviderNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::MemberNotFound { .. } => "member_not_found",
            ServiceError::ProviderNotFound { .. } => "provider_not_found",
            ServiceError::Conflict { .. } => "conflict",
            ServiceError::Database(_) => "database_error",
            ServiceError::Cache(_) => "cache_error",
            ServiceError::InvalidRequest { .. } => "invalid_request",
            ServiceError::Config { .. } => "config_error",
            ServiceError::Internal { .. } => "internal_error",
        }
    }

    /// Message safe to hand to API clients. Server-side failures collapse to a
    /// generic message; the full chain goes to the log instead.
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::InvalidRequest {
            message: errors.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %format_error_chain(&self), "Request failed");
        }

        let response = ErrorResponse {
            message: self.public_message(),
            code: Some(self.error_code().to_string()),
            details: None,
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Render an error with its full `source()` chain, outermost first.
pub fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::MemberNotFound {
                member: "7".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::conflict("dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::invalid_request("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Database(DatabaseError::Poisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let error = ServiceError::Internal {
            message: "connection string leaked".to_string(),
        };
        assert_eq!(error.public_message(), "Internal server error");

        let error = ServiceError::conflict("Member number 'MEM001' already exists");
        assert_eq!(error.public_message(), "Member number 'MEM001' already exists");
    }

    #[test]
    fn test_format_error_chain() {
        let error = ServiceError::Database(DatabaseError::Query(
            rusqlite::Error::InvalidColumnName("nope".to_string()),
        ));
        let chain = format_error_chain(&error);
        assert!(chain.starts_with("Database error: Query failed"));
        assert!(chain.contains("nope"));
    }
}
