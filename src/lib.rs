// src/lib.rs

//! Storefront API for the Satvik ebook collection: checkout-order creation
//! against the Razorpay gateway, dual-path payment verification (client
//! callback + webhook), invoice emailing with an append-only audit log,
//! OTP email authentication, an admin back-office, and CSV import of
//! historical Shopify orders.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
