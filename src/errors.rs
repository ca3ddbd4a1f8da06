// src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  InvalidStatus(String),

  #[error("{0}")]
  InvalidTransition(String),

  #[error("Invalid signature format: {0}")]
  SignatureFormat(String),

  #[error("{0}")]
  Unauthenticated(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  NotFound(String),

  #[error("Firestore is not available. Firebase is not properly configured.")]
  StoreUnavailable,

  #[error(
    "Cloudinary is not configured. Please set valid CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY, and CLOUDINARY_API_SECRET."
  )]
  MediaUnavailable,

  #[error("Razorpay is not configured. Please set valid RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET.")]
  PaymentUnavailable,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("{0}")]
  Internal(String),
}

// Handlers occasionally bubble up anyhow-wrapped failures; everything
// unclassified lands on the 500 path.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

// Transport-level failures talking to any of the three platforms. A single
// failed round-trip surfaces immediately; nothing is retried.
impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    AppError::Internal(format!("Upstream request failed: {}", err))
  }
}

impl From<serde_json::Error> for AppError {
  fn from(err: serde_json::Error) -> Self {
    AppError::Internal(format!("Serialization failed: {}", err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_)
      | AppError::InvalidStatus(_)
      | AppError::InvalidTransition(_)
      | AppError::SignatureFormat(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
      AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::StoreUnavailable
      | AppError::MediaUnavailable
      | AppError::PaymentUnavailable
      | AppError::Config(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    HttpResponse::build(self.status_code()).json(json!({
      "success": false,
      "message": self.to_string(),
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
