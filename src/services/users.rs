// src/services/users.rs

use crate::errors::Result;
use crate::models::User;
use sqlx::PgPool;
use tracing::instrument;

/// Looks up a user by email, creating one if none exists. The storefront has
/// no registration step; first payment attempt or first OTP creates the row.
#[instrument(name = "users::find_or_create", skip(pool), fields(email = %email))]
pub async fn find_or_create_user(pool: &PgPool, email: &str, name: Option<&str>) -> Result<User> {
  if let Some(user) = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
    .bind(email)
    .fetch_optional(pool)
    .await?
  {
    return Ok(user);
  }

  let created = sqlx::query_as::<_, User>("INSERT INTO users (email, name) VALUES ($1, $2) RETURNING *")
    .bind(email)
    .bind(name)
    .fetch_one(pool)
    .await?;
  Ok(created)
}

/// Marks the user's email as verified if it is not already.
pub async fn mark_email_verified(pool: &PgPool, user: &User) -> Result<()> {
  if !user.email_verified {
    sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = now() WHERE id = $1")
      .bind(user.id)
      .execute(pool)
      .await?;
  }
  Ok(())
}

/// Stamps last_login_at; called after a successful login OTP.
pub async fn touch_last_login(pool: &PgPool, user: &User) -> Result<()> {
  sqlx::query("UPDATE users SET last_login_at = now(), updated_at = now() WHERE id = $1")
    .bind(user.id)
    .execute(pool)
    .await?;
  Ok(())
}
