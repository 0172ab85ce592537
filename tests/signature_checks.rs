// tests/signature_checks.rs

//! Signature-verification behaviour for both gateway trust paths, exercised
//! the way the gateway produces them: hex-encoded HMAC-SHA256.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use rasoi_storefront::services::signature::{verify_payment_signature, verify_webhook_signature};

type HmacSha256 = Hmac<Sha256>;

const KEY_SECRET: &str = "rzp_test_key_secret";
const WEBHOOK_SECRET: &str = "rzp_test_webhook_secret";

fn sign(message: &[u8], secret: &str) -> String {
  let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
  mac.update(message);
  hex::encode(mac.finalize().into_bytes())
}

#[test]
fn checkout_callback_round_trip() {
  let signature = sign(b"order_Mh4x7|pay_Nf2k9", KEY_SECRET);
  assert!(verify_payment_signature("order_Mh4x7", "pay_Nf2k9", &signature, KEY_SECRET));
}

#[test]
fn checkout_callback_rejects_swapped_ids() {
  // Same two identifiers, opposite order: the pipe-joined message differs.
  let signature = sign(b"order_Mh4x7|pay_Nf2k9", KEY_SECRET);
  assert!(!verify_payment_signature("pay_Nf2k9", "order_Mh4x7", &signature, KEY_SECRET));
}

#[test]
fn webhook_accepts_only_the_exact_body() {
  let body = br#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1","order_id":"order_1","amount":49900}}}}"#;
  let signature = sign(body, WEBHOOK_SECRET);

  assert!(verify_webhook_signature(body, &signature, WEBHOOK_SECRET));

  let mut tampered = body.to_vec();
  tampered[body.len() - 5] = b'1'; // flip a digit of the amount
  assert!(!verify_webhook_signature(&tampered, &signature, WEBHOOK_SECRET));
}

#[test]
fn webhook_rejects_wrong_secret_regardless_of_event() {
  for body in [
    br#"{"event":"payment.captured"}"#.as_slice(),
    br#"{"event":"order.paid"}"#.as_slice(),
    br#"{"event":"payment.failed"}"#.as_slice(),
  ] {
    let signature = sign(body, "some_other_secret");
    assert!(
      !verify_webhook_signature(body, &signature, WEBHOOK_SECRET),
      "signature under the wrong secret must never validate"
    );
  }
}

#[test]
fn webhook_rejects_garbage_signatures() {
  let body = br#"{"event":"payment.captured"}"#;
  assert!(!verify_webhook_signature(body, "", WEBHOOK_SECRET));
  assert!(!verify_webhook_signature(body, "zz-not-hex", WEBHOOK_SECRET));
  // A truncated but valid-hex prefix of the real signature must also fail.
  let full = sign(body, WEBHOOK_SECRET);
  assert!(!verify_webhook_signature(body, &full[..32], WEBHOOK_SECRET));
}
