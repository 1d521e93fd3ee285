use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::BearerToken;
use crate::domain::user::User;

/// Message shown whenever the backend cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the server. Please check if the backend is running.";

/// Body `error` value that marks an unverified login.
pub const EMAIL_NOT_VERIFIED: &str = "Email not verified";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Network error: Unable to connect to the server. Please check if the backend is running."
    )]
    Network(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Email not verified")]
    EmailNotVerified {
        user: Option<Box<User>>,
        token: Option<BearerToken>,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::EmailNotVerified { .. } => Some(StatusCode::FORBIDDEN.as_u16()),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::InvalidRequest(_) => None,
        }
    }

    /// Whether the backend refused the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// Whether the backend reported a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<BearerToken>,
}

impl ErrorBody {
    /// Builds the rejection error, preferring `message`, then `error`, then
    /// the per-call fallback.
    pub(crate) fn into_rejection(self, status: StatusCode, fallback: &str) -> ApiError {
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}
