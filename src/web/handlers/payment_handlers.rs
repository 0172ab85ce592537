// src/web/handlers/payment_handlers.rs

//! Checkout-order creation and the two payment-confirmation paths. The
//! client callback and the gateway webhook can arrive in either order, or not
//! at all; both funnel into `services::orders::complete_order`, which makes
//! completion and order-number assignment happen exactly once.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::services::orders::{self, CompletionOutcome, CustomerSnapshot};
use crate::services::{pricing, settings, signature, users};
use crate::state::AppState;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct CustomerInfoPayload {
  pub email: String,
  pub name: Option<String>,
  pub contact: Option<String>,
  pub state: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
  /// Cart amount in whole rupees; converted to paise for the gateway.
  pub amount: i64,
  pub discount_code: Option<String>,
  pub customer_info: Option<CustomerInfoPayload>,
}

#[derive(Deserialize, Debug)]
pub struct VerifyPaymentPayload {
  pub razorpay_order_id: String,
  pub razorpay_payment_id: String,
  pub razorpay_signature: String,
  pub customer_email: String,
  pub customer_name: Option<String>,
  pub customer_phone: Option<String>,
  pub customer_state: Option<String>,
  /// Tax-inclusive amount in paise.
  pub amount: i64,
}

// Webhook payload shape: { event, payload: { payment: { entity } } }
#[derive(Deserialize, Debug)]
struct WebhookEnvelope {
  event: String,
  #[serde(default)]
  payload: Option<WebhookPayload>,
}

#[derive(Deserialize, Debug)]
struct WebhookPayload {
  #[serde(default)]
  payment: Option<WebhookPaymentWrapper>,
}

#[derive(Deserialize, Debug)]
struct WebhookPaymentWrapper {
  entity: WebhookPaymentEntity,
}

#[derive(Deserialize, Debug)]
struct WebhookPaymentEntity {
  id: String,
  order_id: String,
  amount: i64,
}

// --- Handler Implementations ---

/// POST /api/payment/create-order
///
/// Creates the gateway order first, then best-effort persists a draft row.
/// A database failure after the gateway call is logged and swallowed: the
/// gateway order exists and the client must still receive it.
#[instrument(name = "handler::create_order", skip(app_state, payload), fields(amount = %payload.amount))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.amount <= 0 {
    return Err(AppError::Validation("Amount must be greater than zero".to_string()));
  }

  // Server-side discount handling: a recognised code reduces the rupee
  // amount before the gateway order is created.
  let mut amount_rupees = payload.amount;
  let mut discount: Option<(String, i64)> = None;
  if let Some(code) = payload.discount_code.as_deref().filter(|c| !c.trim().is_empty()) {
    let Some(percent) = pricing::discount_percent(code) else {
      return Err(AppError::Validation("Invalid discount code".to_string()));
    };
    let discounted = pricing::apply_discount(amount_rupees, percent);
    discount = Some((code.trim().to_uppercase(), (amount_rupees - discounted) * 100));
    amount_rupees = discounted;
  }

  let amount_paise = amount_rupees * 100;
  let gateway_order = app_state
    .gateway
    .create_order(amount_paise, &app_state.config.product_currency, &app_state.config.product_name)
    .await?;

  // If customer info is provided, create a pending draft order in the DB.
  if let Some(customer) = payload.customer_info {
    let draft = async {
      let user = users::find_or_create_user(&app_state.db_pool, &customer.email, customer.name.as_deref()).await?;
      let gst_percent = settings::gst_percent(&app_state.db_pool, app_state.config.default_gst_percent).await?;
      let snapshot = CustomerSnapshot {
        email: Some(customer.email.clone()),
        name: customer.name.clone(),
        phone: customer.contact.clone(),
        state: customer.state.clone(),
      };
      orders::create_draft_order(
        &app_state.db_pool,
        user.id,
        &gateway_order.id,
        amount_paise,
        gst_percent,
        &snapshot,
        discount.as_ref().map(|(code, amount)| (code.as_str(), *amount)),
        &app_state.config.product_name,
      )
      .await
    }
    .await;

    if let Err(e) = draft {
      // The gateway order is still returned to the client.
      error!("Error creating pending order in DB: {}", e);
    }
  }

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "orderId": gateway_order.id,
    "amount": gateway_order.amount,
    "currency": gateway_order.currency,
  })))
}

/// POST /api/payment/verify
///
/// Client-callback confirmation: checks the checkout signature, completes the
/// order, and sends the invoice email when this call performed the
/// completion. Email failure never fails the request; it is recorded in the
/// audit log instead.
#[instrument(name = "handler::verify_payment", skip(app_state, payload), fields(razorpay_order_id = %payload.razorpay_order_id))]
pub async fn verify_payment_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<VerifyPaymentPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  info!("Incoming verification request for gateway order {}.", payload.razorpay_order_id);

  let genuine = signature::verify_payment_signature(
    &payload.razorpay_order_id,
    &payload.razorpay_payment_id,
    &payload.razorpay_signature,
    &app_state.config.razorpay_key_secret,
  );
  if !genuine {
    return Err(AppError::Validation("Invalid signature".to_string()));
  }

  users::find_or_create_user(&app_state.db_pool, &payload.customer_email, payload.customer_name.as_deref()).await?;

  let gst_percent = settings::gst_percent(&app_state.db_pool, app_state.config.default_gst_percent).await?;
  let snapshot = CustomerSnapshot {
    email: Some(payload.customer_email.clone()),
    name: payload.customer_name.clone(),
    phone: payload.customer_phone.clone(),
    state: payload.customer_state.clone(),
  };

  let outcome = orders::complete_order(
    &app_state.db_pool,
    &payload.razorpay_order_id,
    &payload.razorpay_payment_id,
    payload.amount,
    gst_percent,
    &snapshot,
  )
  .await?
  .ok_or_else(|| AppError::NotFound("Order not found for this payment".to_string()))?;

  let order = match outcome {
    CompletionOutcome::Completed(order) => {
      orders::send_invoice_with_log(&app_state, &order, None, "system").await;
      order
    }
    CompletionOutcome::AlreadyCompleted(order) => {
      info!("Order {} was already completed; acknowledging verify call.", order.id);
      order
    }
  };

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Payment verified successfully",
    "paymentId": payload.razorpay_payment_id,
    "orderId": payload.razorpay_order_id,
    "orderRecordId": order.id,
  })))
}

/// POST /api/payment/webhook
///
/// Gateway-side confirmation over the raw body. Replays and unknown orders
/// are acknowledged with 200 so the gateway stops retrying; only signature
/// problems are rejected.
#[instrument(name = "handler::payment_webhook", skip(app_state, req, body), fields(payload_bytes = body.len()))]
pub async fn webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let secret = &app_state.config.razorpay_webhook_secret;
  if secret.is_empty() {
    return Err(AppError::Config("Webhook secret not configured".to_string()));
  }

  let Some(provided_signature) = req
    .headers()
    .get("x-razorpay-signature")
    .and_then(|value| value.to_str().ok())
  else {
    warn!("Webhook request without signature header.");
    return Err(AppError::Validation("No signature".to_string()));
  };

  if !signature::verify_webhook_signature(&body, provided_signature, secret) {
    warn!("Webhook signature mismatch.");
    return Err(AppError::Validation("Invalid signature".to_string()));
  }

  let envelope: WebhookEnvelope = serde_json::from_slice(&body)
    .map_err(|e| AppError::Validation(format!("Malformed webhook payload: {}", e)))?;
  info!("Received webhook event: {}", envelope.event);

  if envelope.event != "payment.captured" && envelope.event != "order.paid" {
    return Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Event ignored"})));
  }

  let Some(payment) = envelope.payload.and_then(|p| p.payment).map(|w| w.entity) else {
    return Err(AppError::Validation("Webhook payload missing payment entity".to_string()));
  };

  let gst_percent = settings::gst_percent(&app_state.db_pool, app_state.config.default_gst_percent).await?;
  let outcome = orders::complete_order(
    &app_state.db_pool,
    &payment.order_id,
    &payment.id,
    payment.amount,
    gst_percent,
    &CustomerSnapshot::default(),
  )
  .await?;

  let Some(outcome) = outcome else {
    error!("Order not found for gateway order id {}.", payment.order_id);
    // 200 so the gateway does not keep retrying an order we never created.
    return Ok(HttpResponse::Ok().json(json!({"success": true, "message": "Order not found"})));
  };

  let order = match outcome {
    CompletionOutcome::Completed(order) => {
      info!("Order {} completed via webhook.", order.id);
      order
    }
    CompletionOutcome::AlreadyCompleted(order) => order,
  };

  // The invoice may still be owed if the completing path's send failed.
  if orders::has_sent_invoice(&app_state.db_pool, order.id).await? {
    info!("Invoice email already sent for order {}. Skipping email.", order.id);
  } else {
    orders::send_invoice_with_log(&app_state, &order, None, "webhook").await;
  }

  Ok(HttpResponse::Ok().json(json!({"success": true, "message": "ok"})))
}
