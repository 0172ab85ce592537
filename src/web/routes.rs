// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  admin_handlers, auth_handlers, contact_handlers, lead_handlers, order_handlers, payment_handlers,
  settings_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Payment Routes: checkout initiation plus the two verification paths
      .service(
        web::scope("/payment")
          .route("/create-order", web::post().to(payment_handlers::create_order_handler))
          .route("/verify", web::post().to(payment_handlers::verify_payment_handler))
          .route("/webhook", web::post().to(payment_handlers::webhook_handler)),
      )
      // OTP Authentication Routes
      .service(
        web::scope("/auth")
          .route("/send-otp", web::post().to(auth_handlers::send_otp_handler))
          .route("/verify-otp", web::post().to(auth_handlers::verify_otp_handler)),
      )
      // Customer Order Routes
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}/email-logs", web::get().to(order_handlers::email_logs_handler))
          .route("/{order_id}/resend-email", web::post().to(order_handlers::resend_email_handler))
          .route("/{order_id}/invoice", web::get().to(order_handlers::invoice_handler)),
      )
      // Admin Back-Office Routes (x-admin-key guarded, except the legacy
      // /admin/orders endpoint which keeps its ?key= form)
      .service(
        web::scope("/admin")
          .route("/orders", web::get().to(admin_handlers::legacy_orders_handler))
          .route("/all-orders", web::get().to(admin_handlers::all_orders_handler))
          .route("/contact-requests", web::get().to(admin_handlers::list_contact_requests_handler))
          .route("/contact-requests", web::patch().to(admin_handlers::update_contact_request_handler))
          .route("/leads", web::get().to(admin_handlers::list_leads_handler))
          .route("/archived-orders", web::get().to(admin_handlers::list_archived_orders_handler))
          .route("/archived-orders/{order_id}", web::get().to(admin_handlers::get_archived_order_handler))
          .route("/import-archived-orders", web::post().to(admin_handlers::import_archived_orders_handler))
          .route("/test-email", web::post().to(admin_handlers::test_email_handler)),
      )
      // Settings (GET is public: the landing page reads price and hero image)
      .service(
        web::scope("/settings")
          .route("", web::get().to(settings_handlers::get_settings_handler))
          .route("", web::post().to(settings_handlers::update_setting_handler)),
      )
      // Public lead capture and contact form
      .route("/contact", web::post().to(contact_handlers::submit_contact_handler))
      .route("/leads", web::post().to(lead_handlers::capture_lead_handler)),
  );
}
