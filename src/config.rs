// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Immutable application configuration, resolved once at startup.
///
/// Each external integration has an optional credential group. A group that
/// is missing, or that still carries the placeholder values shipped in the
/// sample environment file, resolves to `None` and the matching service is
/// disabled for the process lifetime instead of crashing startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_port: u16,
  pub environment: String,
  pub allowed_origins: Vec<String>,
  pub admin_email_domain: String,

  pub firebase: Option<FirebaseConfig>,
  pub cloudinary: Option<CloudinaryConfig>,
  pub razorpay: Option<RazorpayConfig>,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
  pub project_id: String,
  pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
  pub cloud_name: String,
  pub api_key: String,
  pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
  pub key_id: String,
  pub key_secret: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let server_port = env::var("PORT")
      .unwrap_or_else(|_| "3000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;

    let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    let allowed_origins = env::var("ALLOWED_ORIGINS")
      .unwrap_or_else(|_| "*".to_string())
      .split(',')
      .map(|origin| origin.trim().to_string())
      .filter(|origin| !origin.is_empty())
      .collect();

    let admin_email_domain =
      env::var("ADMIN_EMAIL_DOMAIN").unwrap_or_else(|_| "electromart.com".to_string());

    let firebase = FirebaseConfig::resolve(
      env::var("FIREBASE_PROJECT_ID").ok(),
      env::var("FIREBASE_API_KEY").ok(),
    );
    let cloudinary = CloudinaryConfig::resolve(
      env::var("CLOUDINARY_CLOUD_NAME").ok(),
      env::var("CLOUDINARY_API_KEY").ok(),
      env::var("CLOUDINARY_API_SECRET").ok(),
    );
    let razorpay = RazorpayConfig::resolve(
      env::var("RAZORPAY_KEY_ID").ok(),
      env::var("RAZORPAY_KEY_SECRET").ok(),
    );

    tracing::info!(
      firebase_configured = firebase.is_some(),
      cloudinary_configured = cloudinary.is_some(),
      razorpay_configured = razorpay.is_some(),
      "Application configuration loaded."
    );

    Ok(Self {
      server_port,
      environment,
      allowed_origins,
      admin_email_domain,
      firebase,
      cloudinary,
      razorpay,
    })
  }

  pub fn allows_any_origin(&self) -> bool {
    self.allowed_origins.iter().any(|origin| origin == "*")
  }
}

/// True for empty values and the placeholder strings the sample environment
/// file ships with.
fn is_placeholder(value: &str) -> bool {
  value.is_empty() || value.contains("your") || value.contains("XXXXXXXX") || value.contains("...")
}

impl FirebaseConfig {
  fn resolve(project_id: Option<String>, api_key: Option<String>) -> Option<Self> {
    match (project_id, api_key) {
      (Some(project_id), Some(api_key))
        if !is_placeholder(&project_id) && !is_placeholder(&api_key) =>
      {
        Some(Self { project_id, api_key })
      }
      _ => {
        tracing::warn!(
          "Firebase configuration is incomplete. Firebase functionality will be disabled."
        );
        None
      }
    }
  }
}

impl CloudinaryConfig {
  fn resolve(
    cloud_name: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
  ) -> Option<Self> {
    match (cloud_name, api_key, api_secret) {
      (Some(cloud_name), Some(api_key), Some(api_secret))
        if !is_placeholder(&cloud_name)
          && !is_placeholder(&api_key)
          && api_key != "123456789012345"
          && !is_placeholder(&api_secret)
          && api_secret != "abcdefghijklmnopqrstuvwxyz123456" =>
      {
        Some(Self {
          cloud_name,
          api_key,
          api_secret,
        })
      }
      _ => {
        tracing::warn!(
          "Cloudinary configuration not found or using placeholder values. Image management will be disabled."
        );
        None
      }
    }
  }
}

impl RazorpayConfig {
  fn resolve(key_id: Option<String>, key_secret: Option<String>) -> Option<Self> {
    match (key_id, key_secret) {
      (Some(key_id), Some(key_secret))
        if !is_placeholder(&key_id)
          && !is_placeholder(&key_secret)
          && key_id != "rzp_test_abcdefghijklmnopqrstuvwxyz"
          && key_secret != "abcdefghijklmnopqrstuvwxyz1234567890abcd" =>
      {
        Some(Self { key_id, key_secret })
      }
      _ => {
        tracing::warn!(
          "Razorpay credentials not configured or using placeholder values. Payments will be disabled."
        );
        None
      }
    }
  }
}
