// src/models/otp.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Otp {
  pub id: Uuid,
  pub email: String,
  pub otp: String,
  pub purpose: String,
  pub verified: bool,
  pub verified_at: Option<DateTime<Utc>>,
  pub attempts: i32,
  pub expires_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}
