// src/services/archive.rs

//! CSV import of historical orders from a Shopify order export. Rows are
//! attempted independently: duplicates (by order number) and unparseable rows
//! are counted as skipped, never rolled back.

use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{instrument, warn};

/// One row of the Shopify order export, addressed by header name. Columns the
/// export may omit deserialize to `None`.
#[derive(Debug, Default, Deserialize)]
pub struct ShopifyOrderRow {
  #[serde(rename = "Name", default)]
  pub name: Option<String>,
  #[serde(rename = "Email", default)]
  pub email: Option<String>,
  #[serde(rename = "Billing Name", default)]
  pub billing_name: Option<String>,
  #[serde(rename = "Phone", default)]
  pub phone: Option<String>,
  #[serde(rename = "Billing Phone", default)]
  pub billing_phone: Option<String>,
  #[serde(rename = "Financial Status", default)]
  pub financial_status: Option<String>,
  #[serde(rename = "Paid at", default)]
  pub paid_at: Option<String>,
  #[serde(rename = "Fulfillment Status", default)]
  pub fulfillment_status: Option<String>,
  #[serde(rename = "Created at", default)]
  pub created_at: Option<String>,
  #[serde(rename = "Subtotal", default)]
  pub subtotal: Option<f64>,
  #[serde(rename = "Shipping", default)]
  pub shipping: Option<f64>,
  #[serde(rename = "Taxes", default)]
  pub taxes: Option<f64>,
  #[serde(rename = "Total", default)]
  pub total: Option<f64>,
  #[serde(rename = "Discount Code", default)]
  pub discount_code: Option<String>,
  #[serde(rename = "Discount Amount", default)]
  pub discount_amount: Option<f64>,
  #[serde(rename = "Payment Method", default)]
  pub payment_method: Option<String>,
  #[serde(rename = "Payment Reference", default)]
  pub payment_reference: Option<String>,
  #[serde(rename = "Billing Address1", default)]
  pub billing_address: Option<String>,
  #[serde(rename = "Billing City", default)]
  pub billing_city: Option<String>,
  #[serde(rename = "Billing Province", default)]
  pub billing_state: Option<String>,
  #[serde(rename = "Billing Zip", default)]
  pub billing_zip: Option<String>,
  #[serde(rename = "Billing Country", default)]
  pub billing_country: Option<String>,
  #[serde(rename = "Shipping Address1", default)]
  pub shipping_address: Option<String>,
  #[serde(rename = "Shipping City", default)]
  pub shipping_city: Option<String>,
  #[serde(rename = "Shipping Province", default)]
  pub shipping_state: Option<String>,
  #[serde(rename = "Shipping Zip", default)]
  pub shipping_zip: Option<String>,
  #[serde(rename = "Shipping Country", default)]
  pub shipping_country: Option<String>,
  #[serde(rename = "Lineitem name", default)]
  pub lineitem_name: Option<String>,
  #[serde(rename = "Lineitem quantity", default)]
  pub lineitem_quantity: Option<i32>,
}

impl ShopifyOrderRow {
  /// Order number with the Shopify `#` prefix stripped; `None` when the row
  /// has no usable number.
  pub fn order_number(&self) -> Option<String> {
    let number = self.name.as_deref()?.trim().trim_start_matches('#').to_string();
    if number.is_empty() {
      None
    } else {
      Some(number)
    }
  }
}

/// Shopify stamps exports like `2021-05-14 13:21:05 +0530`; RFC 3339 appears
/// in some locales. Anything else is treated as absent.
pub fn parse_export_timestamp(value: &str) -> Option<DateTime<Utc>> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return None;
  }
  DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S %z")
    .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Default, serde::Serialize)]
pub struct ImportSummary {
  pub imported: u32,
  pub skipped: u32,
}

/// Imports the CSV document, skipping duplicates by order number. Each row is
/// attempted independently; a failing insert increments `skipped` and the
/// import carries on.
#[instrument(name = "archive::import", skip(pool, csv_text))]
pub async fn import_archived_orders(pool: &PgPool, csv_text: &[u8]) -> Result<ImportSummary> {
  let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(csv_text);
  let mut summary = ImportSummary::default();

  // Materialise the rows up front; imports are a few thousand rows at most
  // and each insert below awaits.
  let records: Vec<csv::Result<ShopifyOrderRow>> = reader.deserialize().collect();

  for record in records {
    let row = match record {
      Ok(row) => row,
      Err(e) => {
        warn!("Skipping malformed CSV row: {}", e);
        summary.skipped += 1;
        continue;
      }
    };

    let Some(order_number) = row.order_number() else {
      summary.skipped += 1;
      continue;
    };

    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM archived_orders WHERE order_number = $1)")
      .bind(&order_number)
      .fetch_one(pool)
      .await?;
    if exists {
      summary.skipped += 1;
      continue;
    }

    let created_at = row
      .created_at
      .as_deref()
      .and_then(parse_export_timestamp)
      .unwrap_or_else(Utc::now);
    let paid_at = row.paid_at.as_deref().and_then(parse_export_timestamp);
    let phone = row.phone.clone().or_else(|| row.billing_phone.clone());

    let inserted = sqlx::query(
      "INSERT INTO archived_orders (order_number, customer_name, customer_email, customer_phone,
                                    financial_status, paid_at, fulfillment_status, created_at,
                                    subtotal, shipping, taxes, total, discount_code, discount_amount,
                                    payment_method, payment_reference,
                                    billing_address, billing_city, billing_state, billing_zip, billing_country,
                                    shipping_address, shipping_city, shipping_state, shipping_zip, shipping_country,
                                    product_name, quantity)
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
               $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)",
    )
    .bind(&order_number)
    .bind(&row.billing_name)
    .bind(&row.email)
    .bind(&phone)
    .bind(&row.financial_status)
    .bind(paid_at)
    .bind(&row.fulfillment_status)
    .bind(created_at)
    .bind(row.subtotal)
    .bind(row.shipping)
    .bind(row.taxes)
    .bind(row.total)
    .bind(&row.discount_code)
    .bind(row.discount_amount)
    .bind(&row.payment_method)
    .bind(&row.payment_reference)
    .bind(&row.billing_address)
    .bind(&row.billing_city)
    .bind(&row.billing_state)
    .bind(&row.billing_zip)
    .bind(&row.billing_country)
    .bind(&row.shipping_address)
    .bind(&row.shipping_city)
    .bind(&row.shipping_state)
    .bind(&row.shipping_zip)
    .bind(&row.shipping_country)
    .bind(&row.lineitem_name)
    .bind(row.lineitem_quantity)
    .execute(pool)
    .await;

    match inserted {
      Ok(_) => summary.imported += 1,
      Err(e) => {
        warn!("Failed to import order {}: {}", order_number, e);
        summary.skipped += 1;
      }
    }
  }

  Ok(summary)
}

#[cfg(test)]
mod tests {
  use super::*;

  const HEADER: &str = "Name,Email,Billing Name,Phone,Financial Status,Paid at,Created at,Subtotal,Taxes,Total,Lineitem name,Lineitem quantity";

  fn read_rows(csv_text: &str) -> Vec<csv::Result<ShopifyOrderRow>> {
    csv::ReaderBuilder::new()
      .trim(csv::Trim::All)
      .from_reader(csv_text.as_bytes())
      .deserialize()
      .collect()
  }

  #[test]
  fn strips_hash_prefix_from_order_number() {
    let data = format!("{HEADER}\n#1042,a@b.com,Asha,,paid,,2021-05-14 13:21:05 +0530,499,0,499,Book,1");
    let rows = read_rows(&data);
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.order_number().as_deref(), Some("1042"));
    assert_eq!(row.billing_name.as_deref(), Some("Asha"));
    assert_eq!(row.total, Some(499.0));
  }

  #[test]
  fn blank_name_yields_no_order_number() {
    let data = format!("{HEADER}\n,a@b.com,Asha,,paid,,,,,,Book,1");
    let rows = read_rows(&data);
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.order_number(), None);
  }

  #[test]
  fn hash_only_name_yields_no_order_number() {
    let data = format!("{HEADER}\n#,a@b.com,,,,,,,,,,");
    let rows = read_rows(&data);
    assert_eq!(rows[0].as_ref().unwrap().order_number(), None);
  }

  #[test]
  fn empty_money_columns_deserialize_to_none() {
    let data = format!("{HEADER}\n#7,a@b.com,Asha,,paid,,,,,,Book,");
    let rows = read_rows(&data);
    let row = rows[0].as_ref().unwrap();
    assert_eq!(row.subtotal, None);
    assert_eq!(row.taxes, None);
    assert_eq!(row.lineitem_quantity, None);
  }

  #[test]
  fn parses_shopify_timestamps() {
    let parsed = parse_export_timestamp("2021-05-14 13:21:05 +0530").unwrap();
    assert_eq!(parsed.timezone(), Utc);
    assert!(parse_export_timestamp("2021-05-14T13:21:05+05:30").is_some());
    assert!(parse_export_timestamp("").is_none());
    assert!(parse_export_timestamp("yesterday").is_none());
  }
}
