// src/services/mail.rs

//! Transactional email over the Brevo HTTP API. The storefront sends four
//! kinds of messages: order invoices, the free-sample lead email, OTP codes,
//! and the admin deliverability test. Callers decide whether a failure is
//! fatal; payment flows log it to `email_logs` and move on.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::Order;
use crate::services::otp::OtpPurpose;
use serde_json::{json, Value};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct Mailer {
  http: reqwest::Client,
  api_url: String,
  api_key: String,
  from_name: String,
  from_address: String,
  app_base_url: String,
}

impl Mailer {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      api_url: config.email_api_url.clone(),
      api_key: config.email_api_key.clone(),
      from_name: config.email_from_name.clone(),
      from_address: config.email_from_address.clone(),
      app_base_url: config.app_base_url.trim_end_matches('/').to_string(),
    }
  }

  #[instrument(name = "mailer::send", skip(self, html_body), fields(to = %to, subject = %subject))]
  async fn send(&self, to: &str, cc: Option<&[String]>, subject: &str, html_body: String) -> Result<()> {
    let mut payload = json!({
      "sender": { "name": self.from_name, "email": self.from_address },
      "to": [ { "email": to } ],
      "subject": subject,
      "htmlContent": html_body,
    });
    if let Some(cc_list) = cc.filter(|list| !list.is_empty()) {
      let cc_value: Vec<Value> = cc_list.iter().map(|email| json!({ "email": email })).collect();
      payload["cc"] = Value::Array(cc_value);
    }

    let response = self
      .http
      .post(&self.api_url)
      .header("api-key", &self.api_key)
      .json(&payload)
      .send()
      .await
      .map_err(|e| AppError::Brevo(format!("Email request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AppError::Brevo(format!("Email send returned {}: {}", status, body)));
    }

    info!("Email sent to {}.", to);
    Ok(())
  }

  pub fn invoice_subject(order: &Order) -> String {
    format!("Your Order Confirmation & Invoice - #{}", order.id)
  }

  /// Sends the post-purchase email: download links, bonuses, invoice link.
  pub async fn send_invoice_email(&self, order: &Order, cc: Option<&[String]>) -> Result<()> {
    let invoice_url = format!("{}/api/orders/{}/invoice", self.app_base_url, order.id);
    let downloads_base = format!("{}/downloads", self.app_base_url);
    let greeting_name = order.customer_name.as_deref().unwrap_or("Customer");
    let html = format!(
      r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px;">
  <h2 style="color: #9FCC7C;">Thank you for your purchase!</h2>
  <p>Hi {greeting_name},</p>
  <p>Your payment for <strong>{product}</strong> has been successful.</p>
  <p><strong>Order ID:</strong> #{order_id}<br>
     <strong>Amount Paid:</strong> &#8377;{amount:.2}<br>
     <strong>Status:</strong> Paid</p>
  <h3>Your Downloads</h3>
  <ul>
    <li><a href="{downloads}/Satvik_4_in1_Meal_BookFinal.pdf">Satvik 4-in-1 Meal Book</a></li>
    <li><a href="{downloads}/Satvik_Protein_BookFinal.pdf">Satvik Protein Book</a></li>
    <li><a href="{downloads}/Satvik_Dessert_Book_Final.pdf">Satvik Dessert Book</a></li>
  </ul>
  <h3>Your Bonuses</h3>
  <ul>
    <li><a href="{downloads}/Kids-Meal-Planner.pdf">Kids Meal Planner</a></li>
    <li><a href="{downloads}/Monthly-Meal-Planner.pdf">Monthly Meal Planner</a></li>
  </ul>
  <p><a href="{invoice_url}">Download your tax invoice</a></p>
  <p>Keep Cooking Satvik!</p>
</div>"#,
      greeting_name = greeting_name,
      product = order.product_name,
      order_id = order.id,
      amount = order.amount as f64 / 100.0,
      downloads = downloads_base,
      invoice_url = invoice_url,
    );
    self
      .send(&order.customer_email, cc, &Self::invoice_subject(order), html)
      .await
  }

  /// Free-sample email for captured leads, carrying their discount code.
  pub async fn send_sample_email(&self, to: &str, discount_code: &str) -> Result<()> {
    let sampler_url = format!("{}/free-sample", self.app_base_url);
    let html = format!(
      r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px;">
  <h2 style="color: #FFB347;">Your Satvik Journey Starts Here!</h2>
  <p>Thank you for your interest in the Satvik lifestyle! Here are your free
     sample recipes and an exclusive gift.</p>
  <p><a href="{sampler_url}">View your free sampler</a> featuring 3 hero recipes
     from our collection.</p>
  <p>Get an <strong>ADDITIONAL 10% OFF</strong> the complete 3-Book Collection
     with this code at checkout:</p>
  <p style="font-size: 24px; font-weight: bold; letter-spacing: 2px;">{discount_code}</p>
  <p>Keep Cooking Satvik!</p>
</div>"#,
      sampler_url = sampler_url,
      discount_code = discount_code,
    );
    self
      .send(to, None, "Your Free Satvik Recipe Sampler & Special Gift!", html)
      .await
  }

  /// OTP email; subject and wording depend on the requesting flow.
  pub async fn send_otp_email(&self, to: &str, otp: &str, purpose: OtpPurpose) -> Result<()> {
    let (subject, message) = match purpose {
      OtpPurpose::Login => ("Your Login OTP - Rasoi Gadget", "Use this code to log in to your account:"),
      OtpPurpose::Signup => ("Verify Your Email - Rasoi Gadget", "Use this code to verify your email address:"),
      OtpPurpose::PasswordReset => ("Reset Your Password - Rasoi Gadget", "Use this code to reset your password:"),
    };
    let html = format!(
      r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px;">
  <h2>Rasoi Gadget</h2>
  <p>{message}</p>
  <div style="font-size: 36px; font-weight: bold; letter-spacing: 8px; font-family: 'Courier New', monospace;">{otp}</div>
  <p><strong>Important:</strong> This code will expire in <strong>10 minutes</strong>.
     If you didn't request this code, please ignore this email.</p>
</div>"#,
      message = message,
      otp = otp,
    );
    self.send(to, None, subject, html).await
  }

  /// Deliverability check used by the admin dashboard.
  pub async fn send_test_email(&self, to: &str) -> Result<()> {
    let html = r#"<div style="font-family: Arial, sans-serif;">
  <p>This is a test email from the Rasoi Gadget storefront.</p>
  <p>If you are reading this, transactional email delivery is working.</p>
</div>"#
      .to_string();
    self.send(to, None, "Rasoi Gadget - Test Email", html).await
  }
}
