// src/web/handlers/delivery_handlers.rs

//! Delivery routes: public agent registration plus the bearer-protected
//! order views and the status-update workflow.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedAgent;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAgentPayload {
  pub name: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub vehicle_type: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AssignedOrdersQuery {
  pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct StatusUpdatePayload {
  pub status: Option<String>,
}

#[instrument(name = "handler::register_agent", skip(app_state, payload))]
pub async fn register_agent(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterAgentPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let (name, email, phone, vehicle_type) = match (
    payload.name.as_deref(),
    payload.email.as_deref(),
    payload.phone.as_deref(),
    payload.vehicle_type.as_deref(),
  ) {
    (Some(name), Some(email), Some(phone), Some(vehicle_type))
      if !name.is_empty() && !email.is_empty() && !phone.is_empty() && !vehicle_type.is_empty() =>
    {
      (name, email, phone, vehicle_type)
    }
    _ => {
      return Err(AppError::Validation(
        "Name, email, phone, and vehicleType are required".to_string(),
      ))
    }
  };

  let agent = app_state
    .delivery
    .register_agent(name, email, phone, vehicle_type)
    .await?;
  Ok(HttpResponse::Created().json(json!({ "success": true, "data": agent })))
}

#[instrument(
  name = "handler::assigned_orders",
  skip(app_state, auth, query),
  fields(agent_id = %auth.agent_id())
)]
pub async fn assigned_orders(
  app_state: web::Data<AppState>,
  auth: AuthenticatedAgent,
  query: web::Query<AssignedOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .delivery
    .assigned_orders(auth.agent_id(), query.status.as_deref())
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": orders })))
}

#[instrument(
  name = "handler::order_details",
  skip(app_state, auth, path),
  fields(agent_id = %auth.agent_id())
)]
pub async fn order_details(
  app_state: web::Data<AppState>,
  auth: AuthenticatedAgent,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();

  let order = app_state
    .delivery
    .order_details(&order_id, auth.agent_id())
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": order })))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, auth, path, payload),
  fields(agent_id = %auth.agent_id())
)]
pub async fn update_order_status(
  app_state: web::Data<AppState>,
  auth: AuthenticatedAgent,
  path: web::Path<String>,
  payload: web::Json<StatusUpdatePayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let status = payload
    .into_inner()
    .status
    .filter(|status| !status.is_empty())
    .ok_or_else(|| AppError::Validation("Status is required".to_string()))?;

  let updated = app_state
    .delivery
    .update_order_status(&order_id, &status, auth.agent_id())
    .await?;

  info!(%order_id, %status, "Order status update accepted");
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": updated,
    "message": "Order status updated successfully"
  })))
}
