// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status. The first five variants form a fixed progression
/// whose rank forbids downgrades; `CANCELLED` sits outside the progression
/// and is never a legal target for the delivery workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
  #[default]
  OrderPlaced,
  Processing,
  Shipped,
  OutForDelivery,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  /// Rank within the fixed progression; `None` for `CANCELLED`.
  pub fn progression_index(self) -> Option<usize> {
    match self {
      OrderStatus::OrderPlaced => Some(0),
      OrderStatus::Processing => Some(1),
      OrderStatus::Shipped => Some(2),
      OrderStatus::OutForDelivery => Some(3),
      OrderStatus::Delivered => Some(4),
      OrderStatus::Cancelled => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::OrderPlaced => "ORDER_PLACED",
      OrderStatus::Processing => "PROCESSING",
      OrderStatus::Shipped => "SHIPPED",
      OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
      OrderStatus::Delivered => "DELIVERED",
      OrderStatus::Cancelled => "CANCELLED",
    }
  }

  /// Case-insensitive parse of the wire name.
  pub fn parse(input: &str) -> Option<Self> {
    match input.to_uppercase().as_str() {
      "ORDER_PLACED" => Some(OrderStatus::OrderPlaced),
      "PROCESSING" => Some(OrderStatus::Processing),
      "SHIPPED" => Some(OrderStatus::Shipped),
      "OUT_FOR_DELIVERY" => Some(OrderStatus::OutForDelivery),
      "DELIVERED" => Some(OrderStatus::Delivered),
      "CANCELLED" => Some(OrderStatus::Cancelled),
      _ => None,
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
  #[default]
  Pending,
  Paid,
  Failed,
  Refunded,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  #[serde(default)]
  pub product_id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub price: f64,
  #[serde(default)]
  pub quantity: u32,
  #[serde(default)]
  pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub state: String,
  #[serde(default)]
  pub zip_code: String,
}

/// One entry of the append-only status timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
  pub status: OrderStatus,
  pub timestamp: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// An order document. Fields default liberally: order documents are written
/// by the storefront through the generic document passthrough, so the
/// delivery workflow must tolerate partially populated records.
///
/// Invariant: once any status update has occurred, `order_status` equals the
/// status of the last timeline entry. Timeline entries are never removed or
/// reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default)]
  pub user_id: String,
  #[serde(default)]
  pub products: Vec<OrderItem>,
  #[serde(default)]
  pub total_amount: f64,
  #[serde(default)]
  pub shipping_charges: f64,
  #[serde(default)]
  pub tax_amount: f64,
  #[serde(default)]
  pub payment_id: String,
  #[serde(default)]
  pub payment_status: PaymentStatus,
  #[serde(default)]
  pub delivery_address: DeliveryAddress,
  #[serde(default)]
  pub order_status: OrderStatus,
  #[serde(default)]
  pub status_timeline: Vec<TimelineEntry>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assigned_delivery_boy_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub estimated_delivery: Option<DateTime<Utc>>,
  #[serde(default = "Utc::now")]
  pub created_at: DateTime<Utc>,
  #[serde(default = "Utc::now")]
  pub updated_at: DateTime<Utc>,
}
