// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::User;
use crate::services::otp::OtpPurpose;
use crate::services::{otp, users};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct SendOtpPayload {
  pub email: String,
  pub purpose: String,
}

#[derive(Deserialize, Debug)]
pub struct VerifyOtpPayload {
  pub email: String,
  pub otp: String,
  pub purpose: String,
}

/// POST /api/auth/send-otp
#[instrument(name = "handler::send_otp", skip(app_state, payload), fields(purpose = %payload.purpose))]
pub async fn send_otp_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SendOtpPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();

  if !payload.email.contains('@') {
    return Err(AppError::Validation("Invalid email address".to_string()));
  }
  let Some(purpose) = OtpPurpose::parse(&payload.purpose) else {
    return Err(AppError::Validation("Invalid purpose".to_string()));
  };

  if !otp::check_rate_limit(&app_state.db_pool, &payload.email).await? {
    return Err(AppError::RateLimited(
      "Too many OTP requests. Please try again later.".to_string(),
    ));
  }

  let existing = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
    .bind(&payload.email)
    .fetch_optional(&app_state.db_pool)
    .await?;

  // Login and password reset need an account; signup must not have one yet.
  match purpose {
    OtpPurpose::Login | OtpPurpose::PasswordReset if existing.is_none() => {
      return Err(AppError::NotFound(
        "No account found with this email address".to_string(),
      ));
    }
    OtpPurpose::Signup if existing.is_some() => {
      return Err(AppError::Conflict(
        "An account with this email already exists".to_string(),
      ));
    }
    _ => {}
  }

  let code = otp::create_otp(&app_state.db_pool, &payload.email, purpose).await?;
  app_state.mailer.send_otp_email(&payload.email, &code, purpose).await?;

  info!("OTP sent to {}.", payload.email);
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "OTP sent successfully to your email",
  })))
}

/// POST /api/auth/verify-otp
#[instrument(name = "handler::verify_otp", skip(app_state, payload), fields(purpose = %payload.purpose))]
pub async fn verify_otp_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<VerifyOtpPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();

  if payload.email.is_empty() || payload.otp.is_empty() || payload.purpose.is_empty() {
    return Err(AppError::Validation("Missing required fields".to_string()));
  }
  if payload.otp.len() != 6 || !payload.otp.chars().all(|c| c.is_ascii_digit()) {
    return Err(AppError::Validation("Invalid OTP format".to_string()));
  }
  let Some(purpose) = OtpPurpose::parse(&payload.purpose) else {
    return Err(AppError::Validation("Invalid purpose".to_string()));
  };

  let valid = otp::verify_otp(&app_state.db_pool, &payload.email, &payload.otp, purpose).await?;
  if !valid {
    return Err(AppError::Auth(
      "Invalid or expired OTP. Please request a new one.".to_string(),
    ));
  }

  let mut user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
    .bind(&payload.email)
    .fetch_optional(&app_state.db_pool)
    .await?;

  // First verified signup OTP creates the account.
  if user.is_none() && purpose == OtpPurpose::Signup {
    let created = sqlx::query_as::<_, User>(
      "INSERT INTO users (email, email_verified) VALUES ($1, TRUE) RETURNING *",
    )
    .bind(&payload.email)
    .fetch_one(&app_state.db_pool)
    .await?;
    user = Some(created);
  }

  let Some(user) = user else {
    return Err(AppError::NotFound("User not found".to_string()));
  };

  users::mark_email_verified(&app_state.db_pool, &user).await?;
  if purpose == OtpPurpose::Login {
    users::touch_last_login(&app_state.db_pool, &user).await?;
  }

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "OTP verified successfully",
    "user": {
      "id": user.id,
      "email": user.email,
      "name": user.name,
      "phone": user.phone,
      "isAdmin": user.is_admin,
      "emailVerified": true,
    },
    "requiresPassword": purpose == OtpPurpose::PasswordReset,
  })))
}
