// src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::web::handlers::{
  cloudinary_handlers, delivery_handlers, firebase_handlers, payment_handlers,
};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Backend server is running",
    "timestamp": chrono::Utc::now().to_rfc3339(),
  }))
}

/// Catch-all for unmatched routes, wired via `default_service`.
pub async fn not_found_handler() -> HttpResponse {
  HttpResponse::NotFound().json(json!({
    "success": false,
    "message": "Route not found",
  }))
}

// Called from `main.rs` (and the API tests) to configure the Actix app.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/api/health", web::get().to(health_check_handler))
    // Generic document CRUD
    .service(
      web::scope("/api/firebase")
        .route(
          "/{collection}",
          web::get().to(firebase_handlers::list_collection),
        )
        .route(
          "/{collection}",
          web::post().to(firebase_handlers::add_document),
        )
        .route(
          "/{collection}/{id}",
          web::get().to(firebase_handlers::get_document),
        )
        .route(
          "/{collection}/{id}",
          web::put().to(firebase_handlers::update_document),
        )
        .route(
          "/{collection}/{id}",
          web::delete().to(firebase_handlers::delete_document),
        ),
    )
    // Media management
    .service(
      web::scope("/api/cloudinary")
        .route("/upload", web::post().to(cloudinary_handlers::upload_image))
        .route(
          "/delete/{public_id}",
          web::delete().to(cloudinary_handlers::delete_image),
        )
        .route(
          "/details/{public_id}",
          web::get().to(cloudinary_handlers::image_details),
        ),
    )
    // Payment gateway
    .service(
      web::scope("/api/payment")
        .route(
          "/create-order",
          web::post().to(payment_handlers::create_order),
        )
        .route(
          "/verify-payment",
          web::post().to(payment_handlers::verify_payment),
        )
        .route(
          "/order/{order_id}",
          web::get().to(payment_handlers::order_details),
        )
        .route(
          "/payment/{payment_id}",
          web::get().to(payment_handlers::payment_details),
        ),
    )
    // Delivery workflow
    .service(
      web::scope("/delivery")
        .route(
          "/auth/register",
          web::post().to(delivery_handlers::register_agent),
        )
        .route("/orders", web::get().to(delivery_handlers::assigned_orders))
        .route(
          "/order/{id}",
          web::get().to(delivery_handlers::order_details),
        )
        .route(
          "/order/{id}/status",
          web::put().to(delivery_handlers::update_order_status),
        ),
    );
}
