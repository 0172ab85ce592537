// src/web/extractors.rs

//! Request guards. Admin routes are authenticated server-side with the shared
//! back-office key; a browser-stored flag is never trusted.

use actix_web::{web, FromRequest, HttpRequest};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Compares two secrets without leaking their common-prefix length through
/// timing: hash both and compare the fixed-size digests.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
  Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Extractor that admits a request only when its `x-admin-key` header matches
/// the configured back-office key.
#[derive(Debug)]
pub struct AdminKey;

impl FromRequest for AdminKey {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
      return futures_util::future::ready(Err(AppError::Internal(
        "Application state is not configured.".to_string(),
      )));
    };

    let provided = req
      .headers()
      .get("x-admin-key")
      .and_then(|value| value.to_str().ok());

    match provided {
      Some(key) if secrets_match(key, &state.config.admin_api_key) => {
        futures_util::future::ready(Ok(AdminKey))
      }
      _ => {
        warn!("AdminKey extractor: missing or invalid x-admin-key header.");
        futures_util::future::ready(Err(AppError::Auth("Unauthorized".to_string())))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn matching_secrets_are_accepted() {
    assert!(secrets_match("super-secret", "super-secret"));
  }

  #[test]
  fn differing_secrets_are_rejected() {
    assert!(!secrets_match("super-secret", "super-secret2"));
    assert!(!secrets_match("", "super-secret"));
    assert!(!secrets_match("super-secret", ""));
  }
}
