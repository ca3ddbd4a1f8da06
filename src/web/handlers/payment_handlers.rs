// src/web/handlers/payment_handlers.rs

//! Payment gateway passthrough: order creation, signature verification, and
//! record fetches.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CreateOrderPayload {
  pub amount: Option<i64>,
  pub currency: Option<String>,
  pub receipt: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct VerifyPaymentPayload {
  pub razorpay_order_id: Option<String>,
  pub razorpay_payment_id: Option<String>,
  pub razorpay_signature: Option<String>,
}

#[instrument(name = "handler::create_payment_order", skip(app_state, payload))]
pub async fn create_order(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let amount = payload
    .amount
    .ok_or_else(|| AppError::Validation("Amount is required".to_string()))?;

  let order = app_state
    .payments
    .create_order(amount, payload.currency, payload.receipt)
    .await?;

  Ok(HttpResponse::Created().json(json!({ "success": true, "data": order })))
}

#[instrument(name = "handler::verify_payment", skip(app_state, payload))]
pub async fn verify_payment(
  app_state: web::Data<AppState>,
  payload: web::Json<VerifyPaymentPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let (order_id, payment_id, signature) = match (
    payload.razorpay_order_id,
    payload.razorpay_payment_id,
    payload.razorpay_signature,
  ) {
    (Some(order_id), Some(payment_id), Some(signature)) => (order_id, payment_id, signature),
    _ => {
      return Err(AppError::Validation(
        "Missing required payment verification fields".to_string(),
      ))
    }
  };

  if app_state
    .payments
    .verify_signature(&order_id, &payment_id, &signature)?
  {
    info!(%order_id, %payment_id, "Payment signature verified");
    Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Payment verified successfully"
    })))
  } else {
    warn!(%order_id, %payment_id, "Payment signature mismatch");
    Ok(HttpResponse::BadRequest().json(json!({
      "success": false,
      "message": "Invalid payment signature"
    })))
  }
}

#[instrument(name = "handler::payment_order_details", skip(app_state))]
pub async fn order_details(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();

  let order = app_state.payments.fetch_order(&order_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": order })))
}

#[instrument(name = "handler::payment_details", skip(app_state))]
pub async fn payment_details(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let payment_id = path.into_inner();

  let payment = app_state.payments.fetch_payment(&payment_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": payment })))
}
