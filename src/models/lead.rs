// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  pub id: Uuid,
  pub email: String,
  pub created_at: DateTime<Utc>,
}
