// src/services/razorpay.rs

//! Payment gateway client: order creation, record fetches, refunds, and
//! HMAC signature verification for completed payments.

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::{info, instrument};

use crate::config::RazorpayConfig;
use crate::errors::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const API_BASE: &str = "https://api.razorpay.com/v1";

pub struct RazorpayService {
  backend: Option<RazorpayBackend>,
}

struct RazorpayBackend {
  http: reqwest::Client,
  key_id: String,
  key_secret: String,
}

/// A gateway order record. Amounts are in the smallest currency unit
/// (paise for INR).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
  pub id: String,
  pub amount: i64,
  pub currency: String,
  #[serde(default)]
  pub receipt: Option<String>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub created_at: Option<i64>,
}

impl RazorpayService {
  pub fn new(config: Option<RazorpayConfig>) -> Self {
    let backend = config.map(|cfg| RazorpayBackend {
      http: reqwest::Client::new(),
      key_id: cfg.key_id,
      key_secret: cfg.key_secret,
    });
    Self { backend }
  }

  pub fn is_configured(&self) -> bool {
    self.backend.is_some()
  }

  fn backend(&self) -> Result<&RazorpayBackend> {
    self.backend.as_ref().ok_or(AppError::PaymentUnavailable)
  }

  /// Creates a gateway order. The amount is taken in the smallest currency
  /// unit and must be positive; a receipt reference is generated when the
  /// caller does not supply one.
  #[instrument(name = "razorpay::create_order", skip(self))]
  pub async fn create_order(
    &self,
    amount: i64,
    currency: Option<String>,
    receipt: Option<String>,
  ) -> Result<GatewayOrder> {
    let backend = self.backend()?;

    if amount <= 0 {
      return Err(AppError::Validation(
        "Invalid amount. Amount must be greater than zero.".to_string(),
      ));
    }

    let currency = currency.unwrap_or_else(|| "INR".to_string());
    let receipt = receipt.unwrap_or_else(generate_receipt);

    let resp = backend
      .http
      .post(format!("{}/orders", API_BASE))
      .basic_auth(&backend.key_id, Some(&backend.key_secret))
      .json(&json!({
        "amount": amount,
        "currency": currency,
        "receipt": receipt,
      }))
      .send()
      .await?;

    let body = expect_gateway_success(resp, "Order creation").await?;
    let order: GatewayOrder = serde_json::from_value(body)
      .map_err(|e| AppError::Internal(format!("Unexpected gateway order shape: {}", e)))?;
    info!(order_id = %order.id, amount = order.amount, "Gateway order created");
    Ok(order)
  }

  /// Verifies the gateway's payment signature: HMAC-SHA256 over
  /// `"{order_id}|{payment_id}"` keyed with the shared secret, compared in
  /// constant time. Non-hex or wrong-length input is a format error, never a
  /// plain `false` — mismatched-length buffers cannot be compared safely.
  #[instrument(name = "razorpay::verify_signature", skip(self, signature))]
  pub fn verify_signature(
    &self,
    order_id: &str,
    payment_id: &str,
    signature: &str,
  ) -> Result<bool> {
    let backend = self.backend()?;

    let mut mac = HmacSha256::new_from_slice(backend.key_secret.as_bytes())
      .map_err(|e| AppError::Internal(format!("Signing key rejected: {}", e)))?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    let expected = mac.finalize().into_bytes();

    let provided = hex::decode(signature)
      .map_err(|_| AppError::SignatureFormat("signature is not valid hex".to_string()))?;
    if provided.len() != expected.len() {
      return Err(AppError::SignatureFormat(format!(
        "expected {} signature bytes, got {}",
        expected.len(),
        provided.len()
      )));
    }

    Ok(constant_time_eq(&expected, &provided))
  }

  #[instrument(name = "razorpay::fetch_order", skip(self))]
  pub async fn fetch_order(&self, order_id: &str) -> Result<Value> {
    let backend = self.backend()?;
    let resp = backend
      .http
      .get(format!("{}/orders/{}", API_BASE, order_id))
      .basic_auth(&backend.key_id, Some(&backend.key_secret))
      .send()
      .await?;
    expect_gateway_success(resp, "Order fetch").await
  }

  #[instrument(name = "razorpay::fetch_payment", skip(self))]
  pub async fn fetch_payment(&self, payment_id: &str) -> Result<Value> {
    let backend = self.backend()?;
    let resp = backend
      .http
      .get(format!("{}/payments/{}", API_BASE, payment_id))
      .basic_auth(&backend.key_id, Some(&backend.key_secret))
      .send()
      .await?;
    expect_gateway_success(resp, "Payment fetch").await
  }

  /// Refunds a captured payment, optionally partial. No HTTP route exposes
  /// this; it exists for the storefront's back-office tooling.
  #[instrument(name = "razorpay::refund_payment", skip(self, notes))]
  pub async fn refund_payment(
    &self,
    payment_id: &str,
    amount: Option<i64>,
    notes: Option<serde_json::Map<String, Value>>,
  ) -> Result<Value> {
    let backend = self.backend()?;

    let mut body = serde_json::Map::new();
    if let Some(amount) = amount {
      body.insert("amount".to_string(), json!(amount));
    }
    if let Some(notes) = notes {
      body.insert("notes".to_string(), Value::Object(notes));
    }

    let resp = backend
      .http
      .post(format!("{}/payments/{}/refund", API_BASE, payment_id))
      .basic_auth(&backend.key_id, Some(&backend.key_secret))
      .json(&Value::Object(body))
      .send()
      .await?;
    expect_gateway_success(resp, "Refund").await
  }
}

fn generate_receipt() -> String {
  let nonce: u32 = rand::thread_rng().gen_range(0..10_000);
  format!("receipt_{}_{}", Utc::now().timestamp_millis(), nonce)
}

/// Surfaces gateway rejections with the gateway's own description when one
/// is present in the error body.
async fn expect_gateway_success(resp: reqwest::Response, context: &str) -> Result<Value> {
  let status = resp.status();
  let body: Value = resp.json().await.unwrap_or(Value::Null);
  if status.is_success() {
    return Ok(body);
  }
  let description = body
    .pointer("/error/description")
    .and_then(Value::as_str)
    .unwrap_or("no error description");
  Err(AppError::Internal(format!(
    "{} rejected by payment gateway ({}): {}",
    context, status, description
  )))
}
