// src/services/cloudinary.rs

//! Media store client. Uploads and deletions go through the signed upload
//! API; metadata fetches use the admin API with basic auth.

use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::{info, instrument};

use crate::config::CloudinaryConfig;
use crate::errors::{AppError, Result};

pub const DEFAULT_FOLDER: &str = "products";

pub struct CloudinaryService {
  backend: Option<CloudinaryBackend>,
}

struct CloudinaryBackend {
  http: reqwest::Client,
  cloud_name: String,
  api_key: String,
  api_secret: String,
}

#[derive(Debug, Clone)]
pub struct UploadedMedia {
  pub public_id: String,
  pub url: String,
}

impl CloudinaryService {
  pub fn new(config: Option<CloudinaryConfig>) -> Self {
    let backend = config.map(|cfg| CloudinaryBackend {
      http: reqwest::Client::new(),
      cloud_name: cfg.cloud_name,
      api_key: cfg.api_key,
      api_secret: cfg.api_secret,
    });
    Self { backend }
  }

  pub fn is_configured(&self) -> bool {
    self.backend.is_some()
  }

  fn backend(&self) -> Result<&CloudinaryBackend> {
    self.backend.as_ref().ok_or(AppError::MediaUnavailable)
  }

  /// Uploads an image under the given name and folder, returning the public
  /// id and canonical delivery URL.
  #[instrument(name = "cloudinary::upload", skip(self, bytes), fields(size = bytes.len()))]
  pub async fn upload(&self, bytes: Vec<u8>, file_name: &str, folder: &str) -> Result<UploadedMedia> {
    let backend = self.backend()?;
    let timestamp = chrono::Utc::now().timestamp().to_string();

    let signature = backend.sign(&[
      ("folder", folder),
      ("public_id", file_name),
      ("timestamp", &timestamp),
      ("unique_filename", "false"),
      ("use_filename", "true"),
    ]);

    let form = reqwest::multipart::Form::new()
      .part(
        "file",
        reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string()),
      )
      .text("api_key", backend.api_key.clone())
      .text("timestamp", timestamp)
      .text("public_id", file_name.to_string())
      .text("folder", folder.to_string())
      .text("unique_filename", "false")
      .text("use_filename", "true")
      .text("signature", signature);

    let resp = backend
      .http
      .post(format!(
        "https://api.cloudinary.com/v1_1/{}/image/upload",
        backend.cloud_name
      ))
      .multipart(form)
      .send()
      .await?;
    let body = expect_media_success(resp, "Upload").await?;

    let public_id = body
      .get("public_id")
      .and_then(Value::as_str)
      .ok_or_else(|| AppError::Internal("Upload response missing public_id".to_string()))?
      .to_string();
    let url = body
      .get("secure_url")
      .and_then(Value::as_str)
      .unwrap_or_default()
      .to_string();

    info!(%public_id, "Image uploaded");
    Ok(UploadedMedia { public_id, url })
  }

  #[instrument(name = "cloudinary::delete", skip(self))]
  pub async fn delete(&self, public_id: &str) -> Result<Value> {
    let backend = self.backend()?;
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = backend.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

    let resp = backend
      .http
      .post(format!(
        "https://api.cloudinary.com/v1_1/{}/image/destroy",
        backend.cloud_name
      ))
      .form(&[
        ("public_id", public_id),
        ("timestamp", timestamp.as_str()),
        ("api_key", backend.api_key.as_str()),
        ("signature", signature.as_str()),
      ])
      .send()
      .await?;
    expect_media_success(resp, "Deletion").await
  }

  #[instrument(name = "cloudinary::details", skip(self))]
  pub async fn details(&self, public_id: &str) -> Result<Value> {
    let backend = self.backend()?;
    let resp = backend
      .http
      .get(format!(
        "https://api.cloudinary.com/v1_1/{}/resources/image/upload/{}",
        backend.cloud_name, public_id
      ))
      .basic_auth(&backend.api_key, Some(&backend.api_secret))
      .send()
      .await?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Err(AppError::NotFound(format!(
        "Media asset '{}' not found",
        public_id
      )));
    }
    expect_media_success(resp, "Metadata fetch").await
  }
}

impl CloudinaryBackend {
  /// Upload-API request signature: SHA-1 over the alphabetically sorted
  /// `key=value` parameter string with the API secret appended.
  fn sign(&self, params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
      .iter()
      .map(|(k, v)| format!("{}={}", k, v))
      .collect::<Vec<_>>()
      .join("&");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(self.api_secret.as_bytes());
    hex::encode(hasher.finalize())
  }
}

async fn expect_media_success(resp: reqwest::Response, context: &str) -> Result<Value> {
  let status = resp.status();
  let body: Value = resp.json().await.unwrap_or(Value::Null);
  if status.is_success() {
    return Ok(body);
  }
  let message = body
    .pointer("/error/message")
    .and_then(Value::as_str)
    .unwrap_or("no error message");
  Err(AppError::Internal(format!(
    "{} rejected by media store ({}): {}",
    context, status, message
  )))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unconfigured_media_store_fails_fast() {
    let service = CloudinaryService::new(None);
    assert!(!service.is_configured());
    assert!(matches!(
      service.backend().err().unwrap(),
      AppError::MediaUnavailable
    ));
  }

  #[test]
  fn request_signature_is_stable_over_parameter_order() {
    let backend = CloudinaryBackend {
      http: reqwest::Client::new(),
      cloud_name: "demo".to_string(),
      api_key: "k".to_string(),
      api_secret: "s3cret".to_string(),
    };
    let a = backend.sign(&[("public_id", "img_1"), ("timestamp", "1700000000")]);
    let b = backend.sign(&[("timestamp", "1700000000"), ("public_id", "img_1")]);
    assert_eq!(a, b);
    assert_eq!(a.len(), 40); // SHA-1 hex digest

    let other = backend.sign(&[("public_id", "img_2"), ("timestamp", "1700000000")]);
    assert_ne!(a, other);
  }
}
