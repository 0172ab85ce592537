// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid; // Renamed Type to SqlxType to avoid conflict

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Draft,
  Completed,
  Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub razorpay_order_id: String,
  pub razorpay_payment_id: Option<String>,
  /// Human-facing sequential number; assigned exactly once, on completion.
  pub order_number: Option<i64>,
  // Amounts are integer minor-currency units (paise)
  pub amount: i64,
  pub base_amount: i64,
  pub tax_amount: i64,
  pub status: OrderStatus,
  pub customer_email: String,
  pub customer_name: Option<String>,
  pub customer_phone: Option<String>,
  pub customer_state: Option<String>,
  pub discount_code: Option<String>,
  pub discount_amount: Option<i64>,
  pub product_name: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
