// src/web/handlers/contact_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::ContactRequest;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ContactPayload {
  pub name: String,
  pub email: String,
  pub phone: Option<String>,
  pub subject: String,
  pub message: String,
}

/// POST /api/contact — public contact form.
#[instrument(name = "handler::submit_contact", skip(app_state, payload))]
pub async fn submit_contact_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ContactPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.name.is_empty() || payload.email.is_empty() || payload.subject.is_empty() || payload.message.is_empty() {
    return Err(AppError::Validation("All fields are required".to_string()));
  }

  let request = sqlx::query_as::<_, ContactRequest>(
    "INSERT INTO contact_requests (name, email, phone, subject, message, status)
     VALUES ($1, $2, $3, $4, $5, 'pending')
     RETURNING *",
  )
  .bind(&payload.name)
  .bind(&payload.email)
  .bind(&payload.phone)
  .bind(&payload.subject)
  .bind(&payload.message)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Contact request submitted successfully",
    "id": request.id,
  })))
}
