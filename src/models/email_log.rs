// src/models/email_log.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One row per email attempt for an order. Append-only; failed attempts are
/// recorded alongside successful ones so resends stay auditable.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailLog {
  pub id: Uuid,
  pub order_id: Uuid,
  pub recipient_email: String,
  pub cc_emails: Option<String>,
  pub email_type: String,
  pub subject: String,
  pub status: String,
  pub error_message: Option<String>,
  pub sent_by: String,
  pub sent_at: DateTime<Utc>,
}
