// src/state.rs
use crate::config::AppConfig;
use crate::services::gateway::RazorpayClient;
use crate::services::mail::Mailer;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>, // Share loaded config
  pub gateway: RazorpayClient,
  pub mailer: Mailer,
}
