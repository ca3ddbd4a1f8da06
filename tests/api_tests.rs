// tests/api_tests.rs
mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::{order_doc, test_config, MemoryStore, StaticIdentityVerifier};
use electromart_backend::models::OrderStatus;
use electromart_backend::services::{DocumentStore, IdentityVerifier};
use electromart_backend::state::AppState;
use electromart_backend::web::{configure_app_routes, not_found_handler};

const AGENT_TOKEN: &str = "agent-token";
const AGENT_ID: &str = "agent-1";

fn test_state(store: Arc<MemoryStore>) -> AppState {
  let identity: Arc<dyn IdentityVerifier> = Arc::new(
    StaticIdentityVerifier::new().with_token(AGENT_TOKEN, AGENT_ID, "a@x.com"),
  );
  let store: Arc<dyn DocumentStore> = store;
  AppState::with_collaborators(test_config(), store, identity)
}

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state))
        .configure(configure_app_routes)
        .default_service(web::route().to(not_found_handler)),
    )
    .await
  };
}

#[actix_web::test]
async fn health_check_reports_liveness() {
  let app = init_app!(test_state(MemoryStore::new()));

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["message"], "Backend server is running");
  assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn unknown_routes_answer_the_failure_envelope() {
  let app = init_app!(test_state(MemoryStore::new()));

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/nonsense").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
  assert_eq!(body["message"], "Route not found");
}

#[actix_web::test]
async fn delivery_routes_require_a_bearer_token() {
  let app = init_app!(test_state(MemoryStore::new()));

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/delivery/orders").to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
  assert_eq!(body["message"], "Authentication required");

  // A non-bearer scheme is rejected before any identity lookup.
  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/delivery/orders")
      .insert_header(("Authorization", "Basic abc"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/delivery/orders")
      .insert_header(("Authorization", "Bearer unknown-token"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Invalid or expired token");
}

#[actix_web::test]
async fn agent_registration_round_trips() {
  let app = init_app!(test_state(MemoryStore::new()));

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/delivery/auth/register")
      .set_json(json!({
        "name": "A",
        "email": "a@x.com",
        "phone": "9998887776",
        "vehicleType": "bike"
      }))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["role"], "delivery");
  assert!(body["data"]["id"].is_string());

  // Missing fields are a validation error, not a 500.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/delivery/auth/register")
      .set_json(json!({"name": "A", "email": "a@x.com"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn status_update_drives_the_workflow_end_to_end() {
  let store = MemoryStore::new();
  store.seed("orders", "ord-1", order_doc(Some(AGENT_ID), OrderStatus::Shipped));
  let app = init_app!(test_state(store.clone()));

  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/delivery/order/ord-1/status")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .set_json(json!({"status": "out_for_delivery"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["message"], "Order status updated successfully");
  assert_eq!(body["data"]["orderStatus"], "OUT_FOR_DELIVERY");

  let stored = store.stored("orders", "ord-1").unwrap();
  assert_eq!(stored["orderStatus"], "OUT_FOR_DELIVERY");
  assert_eq!(stored["statusTimeline"].as_array().unwrap().len(), 2);

  // The detail view and the filtered listing both see the new status.
  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/delivery/order/ord-1")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["orderStatus"], "OUT_FOR_DELIVERY");

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/delivery/orders?status=out_for_delivery")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn status_update_rejections_map_to_the_right_codes() {
  let store = MemoryStore::new();
  store.seed("orders", "ord-1", order_doc(Some(AGENT_ID), OrderStatus::OutForDelivery));
  store.seed("orders", "ord-2", order_doc(Some("someone-else"), OrderStatus::Shipped));
  let app = init_app!(test_state(store));

  // Downgrade -> 400
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/delivery/order/ord-1/status")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .set_json(json!({"status": "shipped"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  // Status outside the settable subset -> 400
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/delivery/order/ord-1/status")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .set_json(json!({"status": "processing"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  // Missing status field -> 400
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/delivery/order/ord-1/status")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .set_json(json!({}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  // Someone else's order -> 403
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/delivery/order/ord-2/status")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .set_json(json!({"status": "delivered"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  // Unknown order -> 404
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri("/delivery/order/no-such/status")
      .insert_header(("Authorization", format!("Bearer {}", AGENT_TOKEN)))
      .set_json(json!({"status": "delivered"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn document_crud_passes_through_to_the_store() {
  let store = MemoryStore::new();
  let app = init_app!(test_state(store));

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/firebase/products")
      .set_json(json!({"name": "Keyboard", "userId": "user-1", "price": 2499}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  let id = body["data"]["id"].as_str().unwrap().to_string();

  // Listing, with and without the userId filter.
  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/firebase/products")
      .set_json(json!({"name": "Mouse", "userId": "user-2", "price": 799}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let resp = test::call_service(
    &app,
    test::TestRequest::get().uri("/api/firebase/products").to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 2);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/firebase/products?userId=user-1")
      .to_request(),
  )
  .await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(body["data"][0]["name"], "Keyboard");

  // Partial update merges fields.
  let resp = test::call_service(
    &app,
    test::TestRequest::put()
      .uri(&format!("/api/firebase/products/{}", id))
      .set_json(json!({"price": 1999}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["price"], 1999);
  assert_eq!(body["data"]["name"], "Keyboard");

  // Delete, then the fetch is a 404.
  let resp = test::call_service(
    &app,
    test::TestRequest::delete()
      .uri(&format!("/api/firebase/products/{}", id))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri(&format!("/api/firebase/products/{}", id))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Document not found");
}

#[actix_web::test]
async fn unconfigured_payment_gateway_fails_fast() {
  let app = init_app!(test_state(MemoryStore::new()));

  let resp = test::call_service(
    &app,
    test::TestRequest::post()
      .uri("/api/payment/create-order")
      .set_json(json!({"amount": 50000, "currency": "INR"}))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
  assert!(body["message"].as_str().unwrap().contains("Razorpay"));
}

#[actix_web::test]
async fn unconfigured_media_store_fails_fast() {
  let app = init_app!(test_state(MemoryStore::new()));

  let resp = test::call_service(
    &app,
    test::TestRequest::get()
      .uri("/api/cloudinary/details/img_1")
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);
  assert!(body["message"].as_str().unwrap().contains("Cloudinary"));
}
