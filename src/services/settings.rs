// src/services/settings.rs

//! Typed access over the settings key/value table. The table itself stays
//! schemaless; known keys get accessors with sensible fallbacks so callers
//! never parse strings themselves.

use crate::errors::Result;
use crate::models::Setting;
use sqlx::PgPool;
use std::collections::HashMap;

pub const KEY_PRODUCT_PRICE: &str = "productPrice";
pub const KEY_HERO_IMAGE: &str = "heroImage";
pub const KEY_GST_PERCENTAGE: &str = "gstPercentage";
pub const KEY_NEXT_ORDER_NUMBER: &str = "nextOrderNumber";

/// Order numbers start above the last Shopify-era order when the admin has
/// not configured a floor.
pub const DEFAULT_ORDER_NUMBER_FLOOR: i64 = 1112;

pub async fn get(pool: &PgPool, key: &str) -> Result<Option<String>> {
  let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
    .bind(key)
    .fetch_optional(pool)
    .await?;
  Ok(value)
}

pub async fn all(pool: &PgPool) -> Result<HashMap<String, String>> {
  let rows = sqlx::query_as::<_, Setting>("SELECT * FROM settings")
    .fetch_all(pool)
    .await?;
  Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
}

pub async fn upsert(pool: &PgPool, key: &str, value: &str) -> Result<Setting> {
  let setting = sqlx::query_as::<_, Setting>(
    "INSERT INTO settings (key, value) VALUES ($1, $2)
     ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
     RETURNING *",
  )
  .bind(key)
  .bind(value)
  .fetch_one(pool)
  .await?;
  Ok(setting)
}

/// GST percentage to apply at checkout; admin-configured, falling back to the
/// deployment default when unset or unparseable.
pub async fn gst_percent(pool: &PgPool, default_percent: f64) -> Result<f64> {
  let value = get(pool, KEY_GST_PERCENTAGE).await?;
  Ok(
    value
      .and_then(|v| v.parse::<f64>().ok())
      .unwrap_or(default_percent),
  )
}

/// Floor for sequential order numbers: the admin-configured next number minus
/// one, or the default when unset. The next issued number is
/// `max(highest issued, floor) + 1`. Takes an executor so the completion
/// transaction can read it under its lock.
pub async fn order_number_floor(executor: impl sqlx::PgExecutor<'_>) -> Result<i64> {
  let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
    .bind(KEY_NEXT_ORDER_NUMBER)
    .fetch_optional(executor)
    .await?;
  Ok(
    value
      .and_then(|v| v.parse::<i64>().ok())
      .map(|next| next - 1)
      .unwrap_or(DEFAULT_ORDER_NUMBER_FLOOR),
  )
}
