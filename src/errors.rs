// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Rate Limited: {0}")]
  RateLimited(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Payment Gateway Error: {0}")]
  Gateway(String),

  #[error("Brevo Email Error: {0}")]
  Brevo(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError for convenience in
// handlers that use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    // Every error response uses the storefront's {success, message} envelope.
    let body = |message: &str| json!({"success": false, "message": message});
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(body(m)),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(body(m)),
      AppError::NotFound(m) => HttpResponse::NotFound().json(body(m)),
      AppError::Conflict(m) => HttpResponse::Conflict().json(body(m)),
      AppError::RateLimited(m) => HttpResponse::TooManyRequests().json(body(m)),
      AppError::Config(_) => HttpResponse::InternalServerError().json(body("Configuration issue")),
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(body("Database operation failed")),
      AppError::Gateway(_) => HttpResponse::InternalServerError().json(body("Payment provider error")),
      AppError::Brevo(_) => HttpResponse::InternalServerError().json(body("Email service error")),
      AppError::Internal(_) => HttpResponse::InternalServerError().json(body("An internal error occurred")),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
