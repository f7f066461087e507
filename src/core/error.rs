//! Error types and handling for the FX gateway.
//!
//! [`AppError`] is the closed set of per-request failures. It is translated to
//! an HTTP status and a `{ "error": "..." }` body in exactly one place, its
//! [`IntoResponse`] impl. Upstream detail is logged there and never returned.

use crate::core::error_types::{
    UpstreamOutcome, MSG_CURRENCY_NAMES_FAILED, MSG_CURRENCY_UNAVAILABLE, MSG_INTERNAL,
    MSG_INVALID_AMOUNT, MSG_MISSING_PARAMETERS,
};
use crate::core::logging::get_request_id;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the upstream exchange-rate provider.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport failure or timeout. The URL is stripped because it carries the credential.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body was not the JSON shape we expect
    #[error("malformed payload: {0}")]
    Decode(String),

    /// Historical payload decoded but had no `rates` object
    #[error("payload has no rate table")]
    MissingRates,
}

impl UpstreamError {
    /// Metric label for this failure.
    pub fn outcome(&self) -> UpstreamOutcome {
        match self {
            UpstreamError::Request(e) if e.is_timeout() => UpstreamOutcome::Timeout,
            UpstreamError::Request(_) => UpstreamOutcome::Transport,
            UpstreamError::Status(_) => UpstreamOutcome::Status,
            UpstreamError::Decode(_) | UpstreamError::MissingRates => UpstreamOutcome::Decode,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Request(e)
        }
    }
}

/// Main error type for request handling.
#[derive(Error, Debug)]
pub enum AppError {
    /// One of the required query parameters is absent or empty
    #[error("Missing required query parameters")]
    MissingParameters,

    /// `amountInSourceCurrency` is not a finite, nonnegative number
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Source or target code is absent from the rate table
    #[error("Currency not available: {source_currency} -> {target_currency}")]
    CurrencyUnavailable {
        source_currency: String,
        target_currency: String,
    },

    /// Upstream failure during a conversion
    #[error("Upstream failure: {0}")]
    Upstream(#[from] UpstreamError),

    /// Upstream failure while listing currency names
    #[error("Currency name lookup failed: {0}")]
    CurrencyNames(#[source] UpstreamError),

    /// Generic internal server errors with custom message
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameters
            | AppError::InvalidAmount(_)
            | AppError::CurrencyUnavailable { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) | AppError::CurrencyNames(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingParameters => MSG_MISSING_PARAMETERS,
            AppError::InvalidAmount(_) => MSG_INVALID_AMOUNT,
            AppError::CurrencyUnavailable { .. } => MSG_CURRENCY_UNAVAILABLE,
            AppError::CurrencyNames(_) => MSG_CURRENCY_NAMES_FAILED,
            AppError::Upstream(_) | AppError::Internal(_) => MSG_INTERNAL,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = get_request_id();

        if status.is_server_error() {
            tracing::error!(request_id = %request_id, error = %self, "Request failed");
        } else {
            tracing::debug!(request_id = %request_id, error = %self, "Rejected request");
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
