// src/models/mod.rs

//! Contains data structures representing database entities.

pub mod archived_order;
pub mod contact_request;
pub mod email_log;
pub mod lead;
pub mod order;
pub mod otp;
pub mod setting;
pub mod user;

// Re-export the model structs for convenient access
pub use archived_order::ArchivedOrder;
pub use contact_request::ContactRequest;
pub use email_log::EmailLog;
pub use lead::Lead;
pub use order::{Order, OrderStatus};
pub use otp::Otp;
pub use setting::Setting;
pub use user::User;
