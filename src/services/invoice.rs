// src/services/invoice.rs

//! HTML tax-invoice rendering. The seller is registered in Karnataka, so
//! orders billed to another state show IGST while in-state orders split the
//! tax into equal CGST/SGST halves.

use crate::models::Order;

pub const SELLER_STATE: &str = "Karnataka";

fn is_inter_state(order: &Order) -> bool {
  order
    .customer_state
    .as_deref()
    .map(|state| !state.eq_ignore_ascii_case(SELLER_STATE))
    .unwrap_or(false)
}

fn tax_breakdown_rows(order: &Order) -> String {
  let tax = order.tax_amount as f64 / 100.0;
  if is_inter_state(order) {
    format!(
      r#"<tr class="item last"><td>IGST</td><td>&#8377;{:.2}</td></tr>"#,
      tax
    )
  } else {
    let half = tax / 2.0;
    format!(
      r#"<tr class="item"><td>CGST</td><td>&#8377;{half:.2}</td></tr>
<tr class="item last"><td>SGST</td><td>&#8377;{half:.2}</td></tr>"#,
    )
  }
}

/// Renders the printable invoice page for a completed order.
pub fn render_invoice_html(order: &Order) -> String {
  let base = order.base_amount as f64 / 100.0;
  let total = order.amount as f64 / 100.0;
  let order_number = order
    .order_number
    .map(|n| n.to_string())
    .unwrap_or_else(|| order.id.to_string());
  let billed_to_name = order.customer_name.as_deref().unwrap_or("Customer");
  let billed_to_phone = order.customer_phone.as_deref().unwrap_or("");
  let billed_to_state = order.customer_state.as_deref().unwrap_or("");

  format!(
    r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Invoice #{order_number}</title>
  <style>
    body {{ font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; color: #333; padding: 40px; }}
    .invoice-box {{ max-width: 800px; margin: auto; padding: 30px; border: 1px solid #eee; font-size: 16px; line-height: 24px; }}
    .invoice-box table {{ width: 100%; text-align: left; border-collapse: collapse; }}
    .invoice-box table td {{ padding: 5px; vertical-align: top; }}
    .invoice-box table tr td:nth-child(2) {{ text-align: right; }}
    .invoice-box table tr.heading td {{ background: #f9f9f9; border-bottom: 1px solid #ddd; font-weight: bold; }}
    .invoice-box table tr.item td {{ border-bottom: 1px solid #eee; }}
    .invoice-box table tr.item.last td {{ border-bottom: none; }}
    .invoice-box table tr.total td:nth-child(2) {{ border-top: 2px solid #eee; font-weight: bold; font-size: 20px; color: #9FCC7C; }}
    .gst-info {{ font-size: 12px; color: #777; margin-top: 50px; text-align: center; }}
    @media print {{ .no-print {{ display: none; }} }}
  </style>
</head>
<body>
  <div class="no-print">
    <h1>Tax Invoice</h1>
    <button onclick="window.print()">Download / Print PDF</button>
  </div>
  <div class="invoice-box">
    <table>
      <tr>
        <td><strong>Rasoi Gadget India</strong><br>Bengaluru, {seller_state}<br>GSTIN: 29AAAAA0000A1Z5 (Sample)</td>
        <td>Invoice #: {order_number}<br>Date: {date}<br>Status: Paid</td>
      </tr>
      <tr>
        <td colspan="2">
          <strong>Billed To:</strong><br>
          {billed_to_name}<br>
          {customer_email}<br>
          {billed_to_phone}<br>
          {billed_to_state}
        </td>
      </tr>
      <tr class="heading"><td>Item</td><td>Price</td></tr>
      <tr class="item"><td>{product_name}</td><td>&#8377;{base:.2}</td></tr>
      {tax_rows}
      <tr class="total"><td></td><td>Total: &#8377;{total:.2}</td></tr>
    </table>
    <div class="gst-info">
      This is a computer-generated invoice and does not require a signature.<br>
      Thank you for your purchase from Rasoi Gadget!
    </div>
  </div>
</body>
</html>"#,
    order_number = order_number,
    seller_state = SELLER_STATE,
    date = order.created_at.format("%d/%m/%Y"),
    billed_to_name = billed_to_name,
    customer_email = order.customer_email,
    billed_to_phone = billed_to_phone,
    billed_to_state = billed_to_state,
    product_name = order.product_name,
    base = base,
    tax_rows = tax_breakdown_rows(order),
    total = total,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::OrderStatus;
  use chrono::Utc;
  use uuid::Uuid;

  fn completed_order(customer_state: Option<&str>) -> Order {
    Order {
      id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      razorpay_order_id: "order_test".to_string(),
      razorpay_payment_id: Some("pay_test".to_string()),
      order_number: Some(1113),
      amount: 49_900,
      base_amount: 42_288,
      tax_amount: 7_612,
      status: OrderStatus::Completed,
      customer_email: "asha@example.com".to_string(),
      customer_name: Some("Asha".to_string()),
      customer_phone: None,
      customer_state: customer_state.map(str::to_string),
      discount_code: None,
      discount_amount: None,
      product_name: "Satvik 3-Book Collection".to_string(),
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn inter_state_order_shows_igst() {
    let html = render_invoice_html(&completed_order(Some("Maharashtra")));
    assert!(html.contains("IGST"));
    assert!(!html.contains("CGST"));
    assert!(html.contains("&#8377;76.12"));
  }

  #[test]
  fn intra_state_order_splits_cgst_sgst() {
    let html = render_invoice_html(&completed_order(Some("Karnataka")));
    assert!(html.contains("CGST"));
    assert!(html.contains("SGST"));
    assert!(!html.contains("IGST"));
    assert!(html.contains("&#8377;38.06"), "each half of 76.12");
  }

  #[test]
  fn missing_state_is_treated_as_in_state() {
    let html = render_invoice_html(&completed_order(None));
    assert!(html.contains("CGST"));
  }

  #[test]
  fn invoice_prefers_order_number_over_row_id() {
    let order = completed_order(Some("Karnataka"));
    let html = render_invoice_html(&order);
    assert!(html.contains("Invoice #: 1113"));
  }
}
