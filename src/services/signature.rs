// src/services/signature.rs

//! HMAC-SHA256 signature checks for the two gateway trust paths: the
//! client-side checkout callback and the server-side webhook. Comparison goes
//! through `Mac::verify_slice`, which is constant-time; never compare the hex
//! strings directly.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn verify_hmac_hex(message: &[u8], signature_hex: &str, secret: &str) -> bool {
  let Ok(signature) = hex::decode(signature_hex) else {
    return false;
  };
  let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
    return false;
  };
  mac.update(message);
  mac.verify_slice(&signature).is_ok()
}

/// Checks the checkout-callback signature: HMAC-SHA256 over
/// `"{order_id}|{payment_id}"` with the gateway key secret.
pub fn verify_payment_signature(order_id: &str, payment_id: &str, signature_hex: &str, secret: &str) -> bool {
  let message = format!("{}|{}", order_id, payment_id);
  verify_hmac_hex(message.as_bytes(), signature_hex, secret)
}

/// Checks the webhook signature: HMAC-SHA256 over the raw request body with
/// the webhook secret.
pub fn verify_webhook_signature(body: &[u8], signature_hex: &str, secret: &str) -> bool {
  verify_hmac_hex(body, signature_hex, secret)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sign(message: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
  }

  #[test]
  fn valid_payment_signature_is_accepted() {
    let signature = sign(b"order_abc|pay_xyz", "secret123");
    assert!(verify_payment_signature("order_abc", "pay_xyz", &signature, "secret123"));
  }

  #[test]
  fn payment_signature_with_wrong_secret_is_rejected() {
    let signature = sign(b"order_abc|pay_xyz", "wrong_secret");
    assert!(!verify_payment_signature("order_abc", "pay_xyz", &signature, "secret123"));
  }

  #[test]
  fn payment_signature_for_other_payment_is_rejected() {
    let signature = sign(b"order_abc|pay_xyz", "secret123");
    assert!(!verify_payment_signature("order_abc", "pay_other", &signature, "secret123"));
  }

  #[test]
  fn valid_webhook_signature_is_accepted() {
    let body = br#"{"event":"payment.captured"}"#;
    let signature = sign(body, "webhook_secret");
    assert!(verify_webhook_signature(body, &signature, "webhook_secret"));
  }

  #[test]
  fn modified_webhook_payload_is_rejected() {
    let signature = sign(br#"{"event":"payment.captured"}"#, "webhook_secret");
    let tampered = br#"{"event":"payment.captured","extra":true}"#;
    assert!(!verify_webhook_signature(tampered, &signature, "webhook_secret"));
  }

  #[test]
  fn non_hex_signature_is_rejected() {
    assert!(!verify_webhook_signature(b"body", "not-hex!", "webhook_secret"));
    assert!(!verify_webhook_signature(b"body", "", "webhook_secret"));
  }
}
