// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{EmailLog, Order, OrderStatus, User};
use crate::services::{invoice, orders};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListOrdersQuery {
  pub email: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResendEmailPayload {
  pub cc_emails: Option<Vec<String>>,
  pub sent_by: Option<String>,
}

/// GET /api/orders?email= — a customer's orders, newest first.
#[instrument(name = "handler::list_orders", skip(app_state, query))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let Some(email) = query.email.as_deref().filter(|e| !e.is_empty()) else {
    return Err(AppError::Validation("Email is required".to_string()));
  };

  let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
    .bind(email)
    .fetch_optional(&app_state.db_pool)
    .await?;

  let orders = match user {
    Some(user) => {
      sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user.id)
        .fetch_all(&app_state.db_pool)
        .await?
    }
    None => Vec::new(),
  };

  Ok(HttpResponse::Ok().json(json!({"success": true, "orders": orders})))
}

/// GET /api/orders/{order_id}/email-logs — audit trail, newest first.
#[instrument(name = "handler::email_logs", skip(app_state, path))]
pub async fn email_logs_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let logs = sqlx::query_as::<_, EmailLog>("SELECT * FROM email_logs WHERE order_id = $1 ORDER BY sent_at DESC")
    .bind(order_id)
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "emailLogs": logs})))
}

/// POST /api/orders/{order_id}/resend-email — resend the invoice, optionally
/// with CC recipients. Unlike the payment flows, a send failure here is an
/// error for the caller (after the failed attempt is logged).
#[instrument(name = "handler::resend_email", skip(app_state, path, payload))]
pub async fn resend_email_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<ResendEmailPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let payload = payload.into_inner();

  let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
    .bind(order_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  if order.status != OrderStatus::Completed {
    return Err(AppError::Validation(
      "Can only resend emails for completed orders".to_string(),
    ));
  }

  let cc = payload.cc_emails.as_deref();
  let sent_by = payload.sent_by.as_deref().unwrap_or("admin");
  let sent = orders::send_invoice_with_log(&app_state, &order, cc, sent_by).await;
  if !sent {
    return Err(AppError::Brevo("Failed to resend invoice email".to_string()));
  }

  info!("Invoice email resent for order {}.", order.id);
  Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Email sent successfully"})))
}

/// GET /api/orders/{order_id}/invoice — printable HTML tax invoice.
#[instrument(name = "handler::invoice", skip(app_state, path))]
pub async fn invoice_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
    .bind(order_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  let html = invoice::render_invoice_html(&order);
  Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}
