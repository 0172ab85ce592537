// src/web/handlers/lead_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::errors::AppError;
use crate::services::pricing;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct LeadPayload {
  pub email: String,
}

/// POST /api/leads — free-sample capture. The lead row is best-effort; even
/// if the insert fails the sample email (with its discount code) still goes
/// out, and the caller always gets a success response.
#[instrument(name = "handler::capture_lead", skip(app_state, payload))]
pub async fn capture_lead_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LeadPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.email.is_empty() {
    return Err(AppError::Validation("Email is required".to_string()));
  }

  let saved = sqlx::query("INSERT INTO leads (email) VALUES ($1) ON CONFLICT (email) DO NOTHING")
    .bind(&payload.email)
    .execute(&app_state.db_pool)
    .await;
  match saved {
    Ok(_) => info!("Saved lead: {}", payload.email),
    Err(e) => error!("Failed to save lead to database: {}", e),
  }

  let discount_code = pricing::LEAD_DISCOUNT_CODE;
  if let Err(e) = app_state.mailer.send_sample_email(&payload.email, discount_code).await {
    // The user still gets a success response; the failure is operational.
    error!("Failed to send sample email to lead: {}", e);
  }

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Sample sent successfully",
    "discountCode": discount_code,
  })))
}
