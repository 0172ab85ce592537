// src/web/handlers/settings_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::settings;
use crate::state::AppState;
use crate::web::extractors::AdminKey;

/// GET /api/settings — public: the landing page reads product price, hero
/// image and GST percentage from here.
#[instrument(name = "handler::get_settings", skip(app_state))]
pub async fn get_settings_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let settings_map = settings::all(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "settings": settings_map})))
}

#[derive(Deserialize, Debug)]
pub struct UpdateSettingPayload {
  pub key: String,
  pub value: String,
}

/// POST /api/settings — admin-only upsert of a single key.
#[instrument(name = "handler::update_setting", skip(app_state, _admin, payload), fields(key = %payload.key))]
pub async fn update_setting_handler(
  app_state: web::Data<AppState>,
  _admin: AdminKey,
  payload: web::Json<UpdateSettingPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  if payload.key.is_empty() {
    return Err(AppError::Validation("Key is required".to_string()));
  }

  let setting = settings::upsert(&app_state.db_pool, &payload.key, &payload.value).await?;
  Ok(HttpResponse::Ok().json(json!({"success": true, "setting": setting})))
}
