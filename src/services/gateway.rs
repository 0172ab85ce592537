// src/services/gateway.rs

//! Thin client for the Razorpay orders API. Only the one call the checkout
//! flow needs; everything else arrives via webhook.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RazorpayClient {
  http: reqwest::Client,
  key_id: String,
  key_secret: String,
  base_url: String,
}

/// Gateway-side order record, created before checkout is presented to the
/// payer.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
  pub id: String,
  pub amount: i64,
  pub currency: String,
}

impl RazorpayClient {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      key_id: config.razorpay_key_id.clone(),
      key_secret: config.razorpay_key_secret.clone(),
      base_url: config.razorpay_api_url.trim_end_matches('/').to_string(),
    }
  }

  /// Creates a gateway order for the given tax-inclusive amount in paise.
  #[instrument(name = "gateway::create_order", skip(self), fields(amount_paise, currency))]
  pub async fn create_order(&self, amount_paise: i64, currency: &str, product_note: &str) -> Result<GatewayOrder> {
    let receipt = format!("receipt_{}", Utc::now().timestamp_millis());
    let payload = json!({
      "amount": amount_paise,
      "currency": currency,
      "receipt": receipt,
      "notes": { "product": product_note },
    });

    let response = self
      .http
      .post(format!("{}/orders", self.base_url))
      .basic_auth(&self.key_id, Some(&self.key_secret))
      .json(&payload)
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("Order creation request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AppError::Gateway(format!(
        "Order creation returned {}: {}",
        status, body
      )));
    }

    let order: GatewayOrder = response
      .json()
      .await
      .map_err(|e| AppError::Gateway(format!("Could not decode order response: {}", e)))?;

    info!("Gateway order {} created for {} {}.", order.id, order.amount, order.currency);
    Ok(order)
  }
}
