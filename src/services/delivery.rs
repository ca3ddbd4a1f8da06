// src/services/delivery.rs

//! The delivery workflow: agent registration, assigned-order queries, and
//! the order-status transition rules.
//!
//! Transition rules, in full: an agent may only set SHIPPED,
//! OUT_FOR_DELIVERY, or DELIVERED; only on orders assigned to them; and
//! never to a status ranked below the order's current one. Re-applying the
//! current status is permitted and still appends a timeline entry. Every
//! accepted transition lands as a single store write carrying the new
//! status, the update timestamp, and the grown timeline.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::models::{DeliveryAgent, Order, OrderStatus, TimelineEntry};
use crate::services::firestore::DocumentStore;
use crate::utils;

const ORDERS_COLLECTION: &str = "orders";
const AGENTS_COLLECTION: &str = "users";

/// The statuses a delivery agent is allowed to request.
const AGENT_SETTABLE: [OrderStatus; 3] = [
  OrderStatus::Shipped,
  OrderStatus::OutForDelivery,
  OrderStatus::Delivered,
];

pub struct DeliveryService {
  store: Arc<dyn DocumentStore>,
}

impl DeliveryService {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }

  /// Registers a new delivery agent in the `users` collection with the
  /// fixed `delivery` role. Returns the stored record with its generated id.
  #[instrument(name = "delivery::register_agent", skip(self))]
  pub async fn register_agent(
    &self,
    name: &str,
    email: &str,
    phone: &str,
    vehicle_type: &str,
  ) -> Result<Value> {
    if !utils::validate_email(email) {
      return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if !utils::validate_phone(phone) {
      return Err(AppError::Validation("Invalid phone number".to_string()));
    }

    let agent = DeliveryAgent::new(name, email, phone, vehicle_type);
    let record = self
      .store
      .add(AGENTS_COLLECTION, serde_json::to_value(&agent)?)
      .await?;
    info!(agent_id = ?record.get("id"), "Delivery agent registered");
    Ok(record)
  }

  /// All orders assigned to the agent, optionally narrowed to one status.
  /// The filter is normalized to upper-case before comparing. Returns the
  /// full result set, unpaginated.
  #[instrument(name = "delivery::assigned_orders", skip(self))]
  pub async fn assigned_orders(
    &self,
    agent_id: &str,
    status_filter: Option<&str>,
  ) -> Result<Vec<Value>> {
    let mut orders = self
      .store
      .query_eq(ORDERS_COLLECTION, "assignedDeliveryBoyId", agent_id)
      .await?;

    if let Some(filter) = status_filter {
      let wanted = filter.to_uppercase();
      orders.retain(|order| {
        order
          .get("orderStatus")
          .and_then(Value::as_str)
          .map(|status| status == wanted)
          .unwrap_or(false)
      });
    }
    Ok(orders)
  }

  /// Fetches one order and checks it is assigned to the requesting agent.
  /// This is the only place assignment authorization happens; the status
  /// update below goes through it so the check runs exactly once per
  /// external request.
  #[instrument(name = "delivery::order_details", skip(self))]
  pub async fn order_details(&self, order_id: &str, agent_id: &str) -> Result<Order> {
    let doc = self
      .store
      .get(ORDERS_COLLECTION, order_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let order: Order = serde_json::from_value(doc)
      .map_err(|e| AppError::Internal(format!("Malformed order document: {}", e)))?;

    if order.assigned_delivery_boy_id.as_deref() != Some(agent_id) {
      return Err(AppError::Unauthorized(
        "Order not assigned to this delivery agent".to_string(),
      ));
    }
    Ok(order)
  }

  /// Advances an order's status and appends the matching timeline entry.
  /// Returns the updated record with the new status merged.
  #[instrument(name = "delivery::update_order_status", skip(self))]
  pub async fn update_order_status(
    &self,
    order_id: &str,
    requested: &str,
    agent_id: &str,
  ) -> Result<Value> {
    // Existence and assignment are checked before the requested status is
    // even parsed: an agent poking at someone else's order learns nothing
    // about which status values are acceptable.
    let mut order = self.order_details(order_id, agent_id).await?;
    let new_status = parse_requested_status(requested)?;

    // A cancelled order carries no rank; the storefront flow never hands
    // one to an agent, and the permissive index check leaves it alone here.
    let current_rank = rank_of(order.order_status);
    let new_rank = rank_of(new_status);
    if new_rank < current_rank {
      return Err(AppError::InvalidTransition(
        "Cannot downgrade order status".to_string(),
      ));
    }

    let now = Utc::now();
    order.status_timeline.push(TimelineEntry {
      status: new_status,
      timestamp: now,
      description: Some(format!("Order status updated to {}", requested)),
    });
    order.order_status = new_status;
    order.updated_at = now;

    // Status, update stamp, and timeline land in one write so the logical
    // event commits or fails as a unit.
    self
      .store
      .update(
        ORDERS_COLLECTION,
        order_id,
        json!({
          "orderStatus": order.order_status,
          "updatedAt": order.updated_at,
          "statusTimeline": order.status_timeline,
        }),
      )
      .await?;

    info!(
      order_id,
      status = %new_status,
      timeline_len = order.status_timeline.len(),
      "Order status updated"
    );
    Ok(serde_json::to_value(&order)?)
  }
}

/// Parses an agent's requested status, case-insensitively, and restricts it
/// to the settable subset.
fn parse_requested_status(input: &str) -> Result<OrderStatus> {
  OrderStatus::parse(input)
    .filter(|status| AGENT_SETTABLE.contains(status))
    .ok_or_else(|| AppError::InvalidStatus("Invalid status update".to_string()))
}

fn rank_of(status: OrderStatus) -> i64 {
  status
    .progression_index()
    .map(|rank| rank as i64)
    .unwrap_or(-1)
}
