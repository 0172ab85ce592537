// src/web/handlers/admin_handlers.rs

//! Back-office endpoints. Every route takes the `AdminKey` guard except the
//! legacy orders dashboard endpoint, which authenticates with its historical
//! `?key=` query parameter.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ArchivedOrder, ContactRequest, Lead};
use crate::services::archive;
use crate::state::AppState;
use crate::web::extractors::{secrets_match, AdminKey};

// Orders joined with their owning user for the dashboards.
#[derive(Debug, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub razorpay_order_id: String,
  pub razorpay_payment_id: Option<String>,
  pub order_number: Option<i64>,
  pub amount: i64,
  pub base_amount: i64,
  pub tax_amount: i64,
  pub status: crate::models::OrderStatus,
  pub customer_email: String,
  pub customer_name: Option<String>,
  pub customer_phone: Option<String>,
  pub customer_state: Option<String>,
  pub discount_code: Option<String>,
  pub discount_amount: Option<i64>,
  pub product_name: String,
  pub created_at: chrono::DateTime<chrono::Utc>,
  pub user_email: String,
  pub user_name: Option<String>,
}

const ADMIN_ORDERS_SQL: &str = "SELECT o.id, o.user_id, o.razorpay_order_id, o.razorpay_payment_id,
        o.order_number, o.amount, o.base_amount, o.tax_amount, o.status,
        o.customer_email, o.customer_name, o.customer_phone, o.customer_state,
        o.discount_code, o.discount_amount, o.product_name, o.created_at,
        u.email AS user_email, u.name AS user_name
 FROM orders o JOIN users u ON u.id = o.user_id
 ORDER BY o.created_at DESC";

#[derive(Deserialize, Debug)]
pub struct LegacyOrdersQuery {
  pub key: Option<String>,
}

/// GET /api/admin/orders?key= — legacy dashboard endpoint with order stats.
#[instrument(name = "handler::admin_legacy_orders", skip(app_state, query))]
pub async fn legacy_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<LegacyOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let authorized = query
    .key
    .as_deref()
    .map(|key| secrets_match(key, &app_state.config.admin_api_key))
    .unwrap_or(false);
  if !authorized {
    return Err(AppError::Auth("Unauthorized".to_string()));
  }

  let orders = sqlx::query_as::<_, AdminOrderRow>(ADMIN_ORDERS_SQL)
    .fetch_all(&app_state.db_pool)
    .await?;

  let total_revenue_paise: i64 = orders.iter().map(|o| o.amount).sum();
  let unique_customers = orders.iter().map(|o| o.user_id).collect::<HashSet<_>>().len();

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "orders": orders,
    "stats": {
      "totalRevenue": total_revenue_paise as f64 / 100.0, // paise -> rupees
      "totalOrders": orders.len(),
      "uniqueCustomers": unique_customers,
    },
  })))
}

/// GET /api/admin/all-orders
#[instrument(name = "handler::admin_all_orders", skip(app_state, _admin))]
pub async fn all_orders_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
) -> Result<HttpResponse, AppError> {
  let orders = sqlx::query_as::<_, AdminOrderRow>(ADMIN_ORDERS_SQL)
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "orders": orders})))
}

/// GET /api/admin/contact-requests
#[instrument(name = "handler::admin_list_contacts", skip(app_state, _admin))]
pub async fn list_contact_requests_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
) -> Result<HttpResponse, AppError> {
  let requests = sqlx::query_as::<_, ContactRequest>("SELECT * FROM contact_requests ORDER BY created_at DESC")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "requests": requests})))
}

#[derive(Deserialize, Debug)]
pub struct UpdateContactRequestPayload {
  pub id: Uuid,
  pub status: String,
}

/// PATCH /api/admin/contact-requests — move a request through its workflow
/// (pending → in_progress → resolved; transitions are not constrained).
#[instrument(name = "handler::admin_update_contact", skip(app_state, _admin, payload))]
pub async fn update_contact_request_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
  payload: web::Json<UpdateContactRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.status.is_empty() {
    return Err(AppError::Validation("ID and status are required".to_string()));
  }

  let updated = sqlx::query_as::<_, ContactRequest>(
    "UPDATE contact_requests SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
  )
  .bind(payload.id)
  .bind(&payload.status)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Contact request not found".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({"success": true, "request": updated})))
}

/// GET /api/admin/leads
#[instrument(name = "handler::admin_list_leads", skip(app_state, _admin))]
pub async fn list_leads_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
) -> Result<HttpResponse, AppError> {
  let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at DESC")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "leads": leads})))
}

#[derive(Deserialize, Debug)]
pub struct ArchivedOrdersQuery {
  pub page: Option<i64>,
  pub limit: Option<i64>,
}

/// GET /api/admin/archived-orders?page=&limit=
#[instrument(name = "handler::admin_list_archived", skip(app_state, _admin, query))]
pub async fn list_archived_orders_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
  query: web::Query<ArchivedOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let page = query.page.unwrap_or(1).max(1);
  let limit = query.limit.unwrap_or(20).clamp(1, 200);
  let offset = (page - 1) * limit;

  let orders = sqlx::query_as::<_, ArchivedOrder>(
    "SELECT * FROM archived_orders ORDER BY created_at DESC LIMIT $1 OFFSET $2",
  )
  .bind(limit)
  .bind(offset)
  .fetch_all(&app_state.db_pool)
  .await?;

  let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM archived_orders")
    .fetch_one(&app_state.db_pool)
    .await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "orders": orders,
    "pagination": {
      "page": page,
      "limit": limit,
      "total": total,
      "totalPages": (total + limit - 1) / limit,
    },
  })))
}

/// GET /api/admin/archived-orders/{order_id}
#[instrument(name = "handler::admin_get_archived", skip(app_state, _admin, path))]
pub async fn get_archived_order_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = sqlx::query_as::<_, ArchivedOrder>("SELECT * FROM archived_orders WHERE id = $1")
    .bind(order_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "order": order})))
}

/// POST /api/admin/import-archived-orders — body is the CSV document itself
/// (Shopify order export with a header row).
#[instrument(name = "handler::admin_import_archived", skip(app_state, _admin, body), fields(payload_bytes = body.len()))]
pub async fn import_archived_orders_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  if body.is_empty() {
    return Err(AppError::Validation("No file provided".to_string()));
  }

  let summary = archive::import_archived_orders(&app_state.db_pool, &body).await?;
  info!(
    "Archived-order import finished: {} imported, {} skipped.",
    summary.imported, summary.skipped
  );

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": format!("Import completed: {} orders imported, {} skipped", summary.imported, summary.skipped),
    "imported": summary.imported,
    "skipped": summary.skipped,
  })))
}

#[derive(Deserialize, Debug)]
pub struct TestEmailPayload {
  pub email: String,
}

/// POST /api/admin/test-email — deliverability check.
#[instrument(name = "handler::admin_test_email", skip(app_state, _admin, payload))]
pub async fn test_email_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
  payload: web::Json<TestEmailPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.email.is_empty() {
    return Err(AppError::Validation("Email is required".to_string()));
  }

  app_state.mailer.send_test_email(&payload.email).await?;
  info!("Admin test email sent to {}.", payload.email);

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": format!("Test email sent successfully to {}", payload.email),
  })))
}
