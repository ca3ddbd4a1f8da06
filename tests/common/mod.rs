// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use electromart_backend::config::AppConfig;
use electromart_backend::errors::{AppError, Result};
use electromart_backend::models::OrderStatus;
use electromart_backend::services::{Claims, DocumentStore, IdentityVerifier};

/// In-memory document store mirroring the backing store's contract:
/// generated ids on insert, partial merges on update, id merged into every
/// returned record, NotFound on updating a missing document.
pub struct MemoryStore {
  collections: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryStore {
  pub fn new() -> Arc<Self> {
    Arc::new(Self {
      collections: Mutex::new(HashMap::new()),
    })
  }

  /// Inserts a document under a caller-chosen id.
  pub fn seed(&self, collection: &str, id: &str, doc: Value) {
    let mut collections = self.collections.lock().unwrap();
    collections
      .entry(collection.to_string())
      .or_default()
      .insert(id.to_string(), doc);
  }

  /// Raw stored copy, without the id merge, for write assertions.
  pub fn stored(&self, collection: &str, id: &str) -> Option<Value> {
    let collections = self.collections.lock().unwrap();
    collections
      .get(collection)
      .and_then(|docs| docs.get(id))
      .cloned()
  }
}

fn with_id(doc: &Value, id: &str) -> Value {
  let mut record = doc.as_object().cloned().unwrap_or_default();
  record.insert("id".to_string(), Value::String(id.to_string()));
  Value::Object(record)
}

#[async_trait]
impl DocumentStore for MemoryStore {
  async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
    Ok(self.stored(collection, id).map(|doc| with_id(&doc, id)))
  }

  async fn list(&self, collection: &str) -> Result<Vec<Value>> {
    let collections = self.collections.lock().unwrap();
    Ok(
      collections
        .get(collection)
        .map(|docs| docs.iter().map(|(id, doc)| with_id(doc, id)).collect())
        .unwrap_or_default(),
    )
  }

  async fn query_eq(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Value>> {
    let collections = self.collections.lock().unwrap();
    Ok(
      collections
        .get(collection)
        .map(|docs| {
          docs
            .iter()
            .filter(|(_, doc)| doc.get(field).and_then(Value::as_str) == Some(value))
            .map(|(id, doc)| with_id(doc, id))
            .collect()
        })
        .unwrap_or_default(),
    )
  }

  async fn add(&self, collection: &str, data: Value) -> Result<Value> {
    let id = Uuid::new_v4().simple().to_string();
    self.seed(collection, &id, data.clone());
    Ok(with_id(&data, &id))
  }

  async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<Value> {
    let mut collections = self.collections.lock().unwrap();
    let doc = collections
      .get_mut(collection)
      .and_then(|docs| docs.get_mut(id))
      .ok_or_else(|| AppError::NotFound("Updating document: document not found".to_string()))?;

    if let (Some(target), Some(updates)) = (doc.as_object_mut(), fields.as_object()) {
      for (key, value) in updates {
        target.insert(key.clone(), value.clone());
      }
    }
    Ok(with_id(doc, id))
  }

  async fn delete(&self, collection: &str, id: &str) -> Result<()> {
    let mut collections = self.collections.lock().unwrap();
    if let Some(docs) = collections.get_mut(collection) {
      docs.remove(id);
    }
    Ok(())
  }
}

/// Identity verifier backed by a fixed token table.
pub struct StaticIdentityVerifier {
  tokens: HashMap<String, Claims>,
}

impl StaticIdentityVerifier {
  pub fn new() -> Self {
    Self {
      tokens: HashMap::new(),
    }
  }

  pub fn with_token(mut self, token: &str, uid: &str, email: &str) -> Self {
    self.tokens.insert(
      token.to_string(),
      Claims {
        uid: uid.to_string(),
        email: Some(email.to_string()),
      },
    );
    self
  }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
  async fn verify(&self, token: &str) -> Result<Claims> {
    self
      .tokens
      .get(token)
      .cloned()
      .ok_or_else(|| AppError::Unauthenticated("Invalid or expired token".to_string()))
  }
}

/// Configuration with every external integration disabled; the store and
/// identity collaborators are injected separately.
pub fn test_config() -> AppConfig {
  AppConfig {
    server_port: 0,
    environment: "test".to_string(),
    allowed_origins: vec!["*".to_string()],
    admin_email_domain: "electromart.com".to_string(),
    firebase: None,
    cloudinary: None,
    razorpay: None,
  }
}

/// A realistic order document as the storefront writes them.
pub fn order_doc(assigned_to: Option<&str>, status: OrderStatus) -> Value {
  json!({
    "userId": "user-7",
    "products": [
      {"productId": "p-1", "name": "Wireless Router", "price": 1899.0, "quantity": 1, "image": "router.jpg"}
    ],
    "totalAmount": 1899.0,
    "shippingCharges": 38.0,
    "taxAmount": 341.82,
    "paymentId": "pay_seed001",
    "paymentStatus": "PAID",
    "deliveryAddress": {
      "name": "Priya S",
      "email": "priya@example.com",
      "phone": "9876543210",
      "address": "12 MG Road",
      "city": "Pune",
      "state": "MH",
      "zipCode": "411001"
    },
    "orderStatus": status.as_str(),
    "statusTimeline": [
      {"status": "ORDER_PLACED", "timestamp": "2026-08-01T09:00:00Z", "description": "Order placed"}
    ],
    "assignedDeliveryBoyId": assigned_to,
    "createdAt": "2026-08-01T09:00:00Z",
    "updatedAt": "2026-08-01T09:00:00Z"
  })
}
