// src/models/archived_order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Historical order imported from a Shopify CSV export. Flat snapshot,
/// deduplicated by order number, independent of the live order tables.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedOrder {
  pub id: Uuid,
  pub order_number: String,
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
  pub customer_phone: Option<String>,
  pub financial_status: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub fulfillment_status: Option<String>,
  pub subtotal: Option<f64>,
  pub shipping: Option<f64>,
  pub taxes: Option<f64>,
  pub total: Option<f64>,
  pub discount_code: Option<String>,
  pub discount_amount: Option<f64>,
  pub payment_method: Option<String>,
  pub payment_reference: Option<String>,
  pub billing_address: Option<String>,
  pub billing_city: Option<String>,
  pub billing_state: Option<String>,
  pub billing_zip: Option<String>,
  pub billing_country: Option<String>,
  pub shipping_address: Option<String>,
  pub shipping_city: Option<String>,
  pub shipping_state: Option<String>,
  pub shipping_zip: Option<String>,
  pub shipping_country: Option<String>,
  pub product_name: Option<String>,
  pub quantity: Option<i32>,
  pub created_at: DateTime<Utc>,
}
