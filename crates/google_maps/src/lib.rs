use std::error;
use std::fmt;
use std::sync::Arc;

use polyline::PolylineError;

pub mod client;
pub mod directions;
pub mod elevation;
pub mod polyline;

pub use client::{MapsApiClient, MapsApiCredentials};
pub use directions::GoogleDirections;
pub use elevation::GoogleElevation;

#[derive(Debug, Clone)]
pub enum ApiError {
    MissingCredentials(&'static str),
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        endpoint: String,
        response: Option<String>,
    },
    /// The request went through but the service answered with a status
    /// other than `OK`, e.g. `ZERO_RESULTS` or `OVER_QUERY_LIMIT`.
    Status {
        status: String,
        message: Option<String>,
    },
    Polyline(PolylineError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::MissingCredentials(var) => {
                write!(f, "Missing credentials: {var} is not set.")
            }
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                endpoint,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, endpoint)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, endpoint),
            },
            ApiError::Status { status, message } => match message {
                Some(message) => write!(f, "Service status {status}: {message}"),
                None => write!(f, "Service status {status}"),
            },
            ApiError::Polyline(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<PolylineError> for ApiError {
    fn from(e: PolylineError) -> Self {
        ApiError::Polyline(e)
    }
}
