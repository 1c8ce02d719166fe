//! Backend API contract.
//!
//! Every endpoint answers with a `{ data, error }` envelope. Callers treat a
//! non-success status and a transport failure the same way: as a recoverable
//! [`ApiError`] surfaced to the user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::reward::RewardBalance;

/// Failure reported by the backend or the transport.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", self.describe())]
pub struct ApiError {
    /// HTTP status, if the request reached the server.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Transport-level failure (no response).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    fn describe(&self) -> String {
        match self.status {
            Some(status) => format!("{} (status {status})", self.message),
            None => self.message.clone(),
        }
    }
}

/// Response envelope returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: ApiError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Collapse the envelope. An error wins over data; an empty envelope is
    /// itself an error.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Err(ApiError::new(None, "empty response")),
        }
    }
}

/// Result of a successful verification code resend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendTicket {
    /// Server-issued instant after which another resend is allowed.
    pub expires_at: DateTime<Utc>,
}

/// Verification code endpoints.
#[async_trait(?Send)]
pub trait VerificationApi {
    async fn resend_code(&self) -> ApiResponse<ResendTicket>;
}

/// Reward endpoints.
#[async_trait(?Send)]
pub trait RewardApi {
    async fn fetch_balance(&self) -> ApiResponse<RewardBalance>;
}
