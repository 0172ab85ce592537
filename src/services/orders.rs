// src/services/orders.rs

//! Order lifecycle: draft creation at checkout, single-writer completion
//! shared by the verify callback and the webhook, and the invoice-email
//! bookkeeping around it.
//!
//! Completion runs inside one transaction holding a Postgres advisory lock,
//! so the two verification paths can race freely: exactly one of them flips
//! the row to `completed` and assigns the next order number. The UNIQUE index
//! on orders.order_number backs the invariant at the schema level.

use crate::errors::Result;
use crate::models::{Order, OrderStatus};
use crate::services::{pricing, settings};
use crate::state::AppState;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Key for the advisory transaction lock that serialises order-number
/// assignment across completion paths.
const ORDER_COMPLETION_LOCK_KEY: i64 = 8_172_041;

/// Customer fields supplied by the verify callback; the webhook payload does
/// not carry them, so completion treats them as optional overrides on top of
/// the draft snapshot.
#[derive(Debug, Clone, Default)]
pub struct CustomerSnapshot {
  pub email: Option<String>,
  pub name: Option<String>,
  pub phone: Option<String>,
  pub state: Option<String>,
}

/// Next sequential order number: one past the highest of the numbers already
/// issued and the admin-configured floor.
pub fn next_order_number(highest_issued: Option<i64>, floor: i64) -> i64 {
  highest_issued.unwrap_or(0).max(floor) + 1
}

#[derive(Debug)]
pub enum CompletionOutcome {
  /// This call performed the completion and assigned the order number.
  Completed(Order),
  /// Another path got there first; nothing was changed.
  AlreadyCompleted(Order),
}

/// Inserts the optimistic draft row at checkout initiation. A failure here is
/// the caller's to swallow: the gateway order already exists and must still
/// be returned to the client.
#[instrument(name = "orders::create_draft", skip(pool, snapshot), fields(razorpay_order_id = %razorpay_order_id))]
pub async fn create_draft_order(
  pool: &PgPool,
  user_id: Uuid,
  razorpay_order_id: &str,
  amount_paise: i64,
  gst_percent: f64,
  snapshot: &CustomerSnapshot,
  discount: Option<(&str, i64)>,
  product_name: &str,
) -> Result<Order> {
  let (base_amount, tax_amount) = pricing::gst_split(amount_paise, gst_percent);
  let (discount_code, discount_amount) = match discount {
    Some((code, amount)) => (Some(code), Some(amount)),
    None => (None, None),
  };
  let order = sqlx::query_as::<_, Order>(
    "INSERT INTO orders (user_id, razorpay_order_id, amount, base_amount, tax_amount, status,
                         customer_email, customer_name, customer_phone, customer_state,
                         discount_code, discount_amount, product_name)
     VALUES ($1, $2, $3, $4, $5, 'draft', $6, $7, $8, $9, $10, $11, $12)
     RETURNING *",
  )
  .bind(user_id)
  .bind(razorpay_order_id)
  .bind(amount_paise)
  .bind(base_amount)
  .bind(tax_amount)
  .bind(snapshot.email.as_deref().unwrap_or_default())
  .bind(snapshot.name.as_deref())
  .bind(snapshot.phone.as_deref())
  .bind(snapshot.state.as_deref())
  .bind(discount_code)
  .bind(discount_amount)
  .bind(product_name)
  .fetch_one(pool)
  .await?;
  info!("Draft order {} created for gateway order {}.", order.id, razorpay_order_id);
  Ok(order)
}

/// Completes the order identified by its gateway order id, assigning the next
/// sequential order number. Returns `None` when no such order exists.
///
/// The read-increment-write over "highest issued number" happens under an
/// advisory transaction lock and a `FOR UPDATE` on the order row, so a
/// concurrent verify + webhook pair resolves to exactly one
/// `Completed` and one `AlreadyCompleted`.
#[instrument(name = "orders::complete", skip(pool, snapshot), fields(razorpay_order_id = %razorpay_order_id))]
pub async fn complete_order(
  pool: &PgPool,
  razorpay_order_id: &str,
  razorpay_payment_id: &str,
  amount_paise: i64,
  gst_percent: f64,
  snapshot: &CustomerSnapshot,
) -> Result<Option<CompletionOutcome>> {
  let mut tx = pool.begin().await?;

  sqlx::query("SELECT pg_advisory_xact_lock($1)")
    .bind(ORDER_COMPLETION_LOCK_KEY)
    .execute(&mut *tx)
    .await?;

  let Some(order) = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE razorpay_order_id = $1 FOR UPDATE")
    .bind(razorpay_order_id)
    .fetch_optional(&mut *tx)
    .await?
  else {
    return Ok(None);
  };

  if order.status == OrderStatus::Completed {
    info!("Order {} is already completed. Skipping.", order.id);
    tx.commit().await?;
    return Ok(Some(CompletionOutcome::AlreadyCompleted(order)));
  }

  let floor = settings::order_number_floor(&mut *tx).await?;
  let highest: Option<i64> = sqlx::query_scalar("SELECT MAX(order_number) FROM orders")
    .fetch_one(&mut *tx)
    .await?;
  let assigned_number = next_order_number(highest, floor);

  let (base_amount, tax_amount) = pricing::gst_split(amount_paise, gst_percent);

  let completed = sqlx::query_as::<_, Order>(
    "UPDATE orders
     SET status = 'completed',
         order_number = $2,
         razorpay_payment_id = $3,
         amount = $4,
         base_amount = $5,
         tax_amount = $6,
         customer_email = COALESCE($7, customer_email),
         customer_name = COALESCE($8, customer_name),
         customer_phone = COALESCE($9, customer_phone),
         customer_state = COALESCE($10, customer_state),
         updated_at = now()
     WHERE id = $1
     RETURNING *",
  )
  .bind(order.id)
  .bind(assigned_number)
  .bind(razorpay_payment_id)
  .bind(amount_paise)
  .bind(base_amount)
  .bind(tax_amount)
  .bind(snapshot.email.as_deref())
  .bind(snapshot.name.as_deref())
  .bind(snapshot.phone.as_deref())
  .bind(snapshot.state.as_deref())
  .fetch_one(&mut *tx)
  .await?;

  tx.commit().await?;
  info!(
    "Order {} marked as completed with order number {}.",
    completed.id, assigned_number
  );
  Ok(Some(CompletionOutcome::Completed(completed)))
}

/// True when an invoice email has already gone out successfully for the
/// order. The webhook path checks this before re-sending.
pub async fn has_sent_invoice(pool: &PgPool, order_id: Uuid) -> Result<bool> {
  let exists: bool = sqlx::query_scalar(
    "SELECT EXISTS (SELECT 1 FROM email_logs WHERE order_id = $1 AND email_type = 'invoice' AND status = 'sent')",
  )
  .bind(order_id)
  .fetch_one(pool)
  .await?;
  Ok(exists)
}

/// Appends an email_logs row for an attempt; never fails the caller over a
/// logging error.
async fn record_email_attempt(
  pool: &PgPool,
  order: &Order,
  cc_emails: Option<&[String]>,
  subject: &str,
  status: &str,
  error_message: Option<&str>,
  sent_by: &str,
) {
  let cc_joined = cc_emails.filter(|list| !list.is_empty()).map(|list| list.join(","));
  let logged = sqlx::query(
    "INSERT INTO email_logs (order_id, recipient_email, cc_emails, email_type, subject, status, error_message, sent_by)
     VALUES ($1, $2, $3, 'invoice', $4, $5, $6, $7)",
  )
  .bind(order.id)
  .bind(&order.customer_email)
  .bind(cc_joined)
  .bind(subject)
  .bind(status)
  .bind(error_message)
  .bind(sent_by)
  .execute(pool)
  .await;
  if let Err(e) = logged {
    error!("Failed to record email attempt for order {}: {}", order.id, e);
  }
}

/// Sends the invoice email and records the attempt in the audit log. Returns
/// whether the send succeeded; the caller decides whether that matters.
#[instrument(name = "orders::send_invoice", skip(state, order, cc_emails), fields(order_id = %order.id, sent_by = %sent_by))]
pub async fn send_invoice_with_log(
  state: &AppState,
  order: &Order,
  cc_emails: Option<&[String]>,
  sent_by: &str,
) -> bool {
  let subject = crate::services::mail::Mailer::invoice_subject(order);
  match state.mailer.send_invoice_email(order, cc_emails).await {
    Ok(()) => {
      info!("Invoice email sent for order {}.", order.id);
      record_email_attempt(&state.db_pool, order, cc_emails, &subject, "sent", None, sent_by).await;
      true
    }
    Err(e) => {
      warn!("Failed to send invoice email for order {}: {}", order.id, e);
      record_email_attempt(
        &state.db_pool,
        order,
        cc_emails,
        &subject,
        "failed",
        Some(&e.to_string()),
        sent_by,
      )
      .await;
      false
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::services::settings::DEFAULT_ORDER_NUMBER_FLOOR;

  #[test]
  fn first_order_starts_above_the_default_floor() {
    assert_eq!(next_order_number(None, DEFAULT_ORDER_NUMBER_FLOOR), 1113);
  }

  #[test]
  fn issued_numbers_keep_increasing_past_the_floor() {
    assert_eq!(next_order_number(Some(1500), DEFAULT_ORDER_NUMBER_FLOOR), 1501);
  }

  #[test]
  fn raising_the_floor_jumps_the_sequence() {
    // Admin set nextOrderNumber = 2001, so the floor is 2000.
    assert_eq!(next_order_number(Some(1500), 2000), 2001);
  }

  #[test]
  fn lowering_the_floor_never_reissues_a_number() {
    assert_eq!(next_order_number(Some(3000), 2000), 3001);
  }
}
