// src/web/handlers/cloudinary_handlers.rs

//! Media passthrough: multipart upload plus delete/details by public id.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::cloudinary::DEFAULT_FOLDER;
use crate::state::AppState;

struct UploadForm {
  original_name: String,
  bytes: Vec<u8>,
  folder: String,
}

/// Reads the multipart payload: a required `image` file field and an
/// optional `folder` text field. Unknown fields are drained and ignored.
async fn read_upload_form(mut payload: Multipart) -> Result<UploadForm, AppError> {
  let mut image: Option<(String, Vec<u8>)> = None;
  let mut folder = DEFAULT_FOLDER.to_string();

  while let Some(mut field) = payload
    .try_next()
    .await
    .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {}", e)))?
  {
    let name = field.name().to_string();
    let mut data = Vec::new();
    while let Some(chunk) = field
      .try_next()
      .await
      .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {}", e)))?
    {
      data.extend_from_slice(&chunk);
    }

    match name.as_str() {
      "image" => {
        let original_name = field
          .content_disposition()
          .get_filename()
          .map(str::to_string)
          .unwrap_or_else(|| "upload".to_string());
        image = Some((original_name, data));
      }
      "folder" => {
        let value = String::from_utf8_lossy(&data).trim().to_string();
        if !value.is_empty() {
          folder = value;
        }
      }
      _ => {}
    }
  }

  let (original_name, bytes) = image
    .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
  Ok(UploadForm {
    original_name,
    bytes,
    folder,
  })
}

#[instrument(name = "handler::upload_image", skip(app_state, payload))]
pub async fn upload_image(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let form = read_upload_form(payload).await?;
  let size = form.bytes.len();

  // Millisecond prefix keeps repeated uploads of the same file distinct.
  let file_name = format!(
    "{}_{}",
    Utc::now().timestamp_millis(),
    form.original_name.replace(char::is_whitespace, "_")
  );

  let uploaded = app_state
    .media
    .upload(form.bytes, &file_name, &form.folder)
    .await?;
  info!(public_id = %uploaded.public_id, size, "Image upload accepted");

  Ok(HttpResponse::Created().json(json!({
    "success": true,
    "data": {
      "public_id": uploaded.public_id,
      "url": uploaded.url,
      "original_name": form.original_name,
      "size": size,
    }
  })))
}

#[instrument(name = "handler::delete_image", skip(app_state))]
pub async fn delete_image(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let public_id = path.into_inner();

  let result = app_state.media.delete(&public_id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "data": result,
    "message": "Image deleted successfully"
  })))
}

#[instrument(name = "handler::image_details", skip(app_state))]
pub async fn image_details(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let public_id = path.into_inner();

  let details = app_state.media.details(&public_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": details })))
}
