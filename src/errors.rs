use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Upstream API Errors ---

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } => *status >= 500 || *status == 429,
            ApiError::NotFound(_) | ApiError::Decode(_) | ApiError::InvalidUrl(_) => false,
        }
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

// --- Feed Errors ---

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid authentication token: {0}")]
    InvalidToken(String),

    #[error("Feed page {0} has not been loaded")]
    PageNotLoaded(usize),

    #[error("Meme {meme_id} is not on feed page {page_index}")]
    MemeNotOnPage { meme_id: String, page_index: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("{0} not found")]
    NotFound(String),

    #[error("Upstream meme API request failed")]
    Upstream(#[source] ApiError),

    // Startup errors
    #[error("Initialization error: {0}")]
    InitError(String),
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::InvalidInput(msg) => AppError::InvalidInput(msg),
            FeedError::InvalidToken(msg) => AppError::Unauthorized(msg),
            FeedError::PageNotLoaded(index) => AppError::NotFound(format!("Feed page {}", index)),
            FeedError::MemeNotOnPage { meme_id, page_index } => {
                AppError::NotFound(format!("Meme {} on feed page {}", meme_id, page_index))
            }
            FeedError::Api(e) => AppError::Upstream(e),
        }
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),

            // 5xx Server Errors
            AppError::Upstream(e) => {
                tracing::error!(error.source = ?e, "Upstream meme API error occurred");
                (StatusCode::BAD_GATEWAY, format!("Meme API request failed: {}", e))
            }
            AppError::InitError(msg) => {
                tracing::error!("Initialization error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server initialization error".to_string())
            }
        };

        tracing::error!(error.message = %error_message, error.status = %status, "Responding with error");

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}
