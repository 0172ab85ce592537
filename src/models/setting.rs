// src/models/setting.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Generic key/value store row (product price, hero image, GST percentage,
/// order-number floor).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
  pub key: String,
  pub value: String,
  pub updated_at: DateTime<Utc>,
}
