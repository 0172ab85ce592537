// src/services/otp.rs

//! Email OTP issuance and verification. Codes are 6 digits, live for ten
//! minutes, allow five verification attempts, and each address may request at
//! most five codes per hour.

use crate::errors::Result;
use crate::models::Otp;
use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use tracing::instrument;

const OTP_TTL_MINUTES: i64 = 10;
const MAX_VERIFY_ATTEMPTS: i32 = 5;
const MAX_REQUESTS_PER_HOUR: i64 = 5;

/// Which flow asked for an OTP; storage and email wording both depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
  Login,
  Signup,
  PasswordReset,
}

impl OtpPurpose {
  pub fn parse(value: &str) -> Option<Self> {
    match value {
      "login" => Some(Self::Login),
      "signup" => Some(Self::Signup),
      "password_reset" => Some(Self::PasswordReset),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Login => "login",
      Self::Signup => "signup",
      Self::PasswordReset => "password_reset",
    }
  }
}

/// Generates a 6-digit OTP.
pub fn generate_otp() -> String {
  rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Creates and stores an OTP row, returning the code for emailing.
#[instrument(name = "otp::create", skip(pool), fields(email = %email, purpose = %purpose.as_str()))]
pub async fn create_otp(pool: &PgPool, email: &str, purpose: OtpPurpose) -> Result<String> {
  let otp = generate_otp();
  let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);
  sqlx::query("INSERT INTO otps (email, otp, purpose, expires_at) VALUES ($1, $2, $3, $4)")
    .bind(email)
    .bind(&otp)
    .bind(purpose.as_str())
    .bind(expires_at)
    .execute(pool)
    .await?;
  Ok(otp)
}

/// Verifies a code against the most recent live OTP for the address and
/// purpose, counting the attempt and marking the row verified on success.
#[instrument(name = "otp::verify", skip(pool, otp), fields(email = %email, purpose = %purpose.as_str()))]
pub async fn verify_otp(pool: &PgPool, email: &str, otp: &str, purpose: OtpPurpose) -> Result<bool> {
  let record = sqlx::query_as::<_, Otp>(
    "SELECT * FROM otps
     WHERE email = $1 AND otp = $2 AND purpose = $3 AND verified = FALSE AND expires_at > now()
     ORDER BY created_at DESC
     LIMIT 1",
  )
  .bind(email)
  .bind(otp)
  .bind(purpose.as_str())
  .fetch_optional(pool)
  .await?;

  let Some(record) = record else {
    return Ok(false);
  };

  if record.attempts >= MAX_VERIFY_ATTEMPTS {
    return Ok(false);
  }

  sqlx::query("UPDATE otps SET attempts = attempts + 1 WHERE id = $1")
    .bind(record.id)
    .execute(pool)
    .await?;

  sqlx::query("UPDATE otps SET verified = TRUE, verified_at = now() WHERE id = $1")
    .bind(record.id)
    .execute(pool)
    .await?;

  Ok(true)
}

/// True when the address may request another OTP.
pub async fn check_rate_limit(pool: &PgPool, email: &str) -> Result<bool> {
  let recent: i64 = sqlx::query_scalar(
    "SELECT COUNT(*) FROM otps WHERE email = $1 AND created_at > now() - interval '1 hour'",
  )
  .bind(email)
  .fetch_one(pool)
  .await?;
  Ok(recent < MAX_REQUESTS_PER_HOUR)
}

/// Deletes expired or week-old OTP rows; suitable for a periodic sweep.
pub async fn cleanup_expired(pool: &PgPool) -> Result<u64> {
  let result = sqlx::query(
    "DELETE FROM otps WHERE expires_at < now() OR created_at < now() - interval '7 days'",
  )
  .execute(pool)
  .await?;
  Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_otp_is_six_digits() {
    for _ in 0..200 {
      let otp = generate_otp();
      assert_eq!(otp.len(), 6);
      assert!(otp.chars().all(|c| c.is_ascii_digit()));
      assert!(!otp.starts_with('0'), "codes never start with a leading zero");
    }
  }
}
