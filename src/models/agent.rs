// src/models/agent.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DELIVERY_ROLE: &str = "delivery";

/// A delivery agent record in the `users` collection. Written once at
/// registration and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgent {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub name: String,
  pub email: String,
  pub phone: String,
  pub vehicle_type: String,
  pub role: String,
  pub created_at: DateTime<Utc>,
}

impl DeliveryAgent {
  pub fn new(name: &str, email: &str, phone: &str, vehicle_type: &str) -> Self {
    Self {
      id: None,
      name: name.to_string(),
      email: email.to_string(),
      phone: phone.to_string(),
      vehicle_type: vehicle_type.to_string(),
      role: DELIVERY_ROLE.to_string(),
      created_at: Utc::now(),
    }
  }
}
