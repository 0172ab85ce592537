// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub app_base_url: String,

  // Payment gateway credentials
  pub razorpay_key_id: String,
  pub razorpay_key_secret: String,
  pub razorpay_webhook_secret: String,
  pub razorpay_api_url: String,

  // Transactional email (Brevo-style HTTP API)
  pub email_api_url: String,
  pub email_api_key: String,
  pub email_from_name: String,
  pub email_from_address: String,

  // Back-office
  pub admin_api_key: String,

  // Product defaults; the settings table can override price and GST at runtime
  pub product_name: String,
  pub product_currency: String,
  pub default_gst_percent: f64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let razorpay_key_id = get_env("RAZORPAY_KEY_ID")?;
    let razorpay_key_secret = get_env("RAZORPAY_KEY_SECRET")?;
    let razorpay_webhook_secret = get_env("RAZORPAY_WEBHOOK_SECRET")?;
    let razorpay_api_url =
      get_env("RAZORPAY_API_URL").unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());

    let email_api_url = get_env("EMAIL_API_URL").unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string());
    let email_api_key = get_env("EMAIL_API_KEY")?;
    let email_from_name = get_env("EMAIL_FROM_NAME").unwrap_or_else(|_| "Rasoi Gadget".to_string());
    let email_from_address = get_env("EMAIL_FROM_ADDRESS").unwrap_or_else(|_| "noreply@rasoigadget.com".to_string());

    let admin_api_key = get_env("ADMIN_SECRET_KEY")?;

    let product_name = get_env("PRODUCT_NAME").unwrap_or_else(|_| "Satvik 3-Book Collection".to_string());
    let product_currency = get_env("PRODUCT_CURRENCY").unwrap_or_else(|_| "INR".to_string());
    let default_gst_percent = get_env("GST_PERCENT")
      .unwrap_or_else(|_| "18".to_string())
      .parse::<f64>()
      .map_err(|e| AppError::Config(format!("Invalid GST_PERCENT: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      razorpay_key_id,
      razorpay_key_secret,
      razorpay_webhook_secret,
      razorpay_api_url,
      email_api_url,
      email_api_key,
      email_from_name,
      email_from_address,
      admin_api_key,
      product_name,
      product_currency,
      default_gst_percent,
    })
  }
}
