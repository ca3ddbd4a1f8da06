// src/web/handlers/firebase_handlers.rs

//! Generic document CRUD passthrough. No independent logic beyond input
//! validation and the response envelope; collections are addressed by name.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListQuery {
  #[serde(rename = "userId")]
  pub user_id: Option<String>,
}

#[instrument(name = "handler::get_document", skip(app_state))]
pub async fn get_document(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (collection, id) = path.into_inner();

  let document = app_state
    .store
    .get(&collection, &id)
    .await?
    .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": document })))
}

#[instrument(name = "handler::list_collection", skip(app_state, query))]
pub async fn list_collection(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
  let collection = path.into_inner();

  let documents = match &query.user_id {
    Some(user_id) => {
      app_state
        .store
        .query_eq(&collection, "userId", user_id)
        .await?
    }
    None => app_state.store.list(&collection).await?,
  };

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": documents })))
}

#[instrument(name = "handler::add_document", skip(app_state, body))]
pub async fn add_document(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let collection = path.into_inner();
  let data = body.into_inner();
  if !data.is_object() {
    return Err(AppError::Validation(
      "Document body must be a JSON object".to_string(),
    ));
  }

  let document = app_state.store.add(&collection, data).await?;
  Ok(HttpResponse::Created().json(json!({ "success": true, "data": document })))
}

#[instrument(name = "handler::update_document", skip(app_state, body))]
pub async fn update_document(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let (collection, id) = path.into_inner();
  let data = body.into_inner();
  if !data.is_object() {
    return Err(AppError::Validation(
      "Document body must be a JSON object".to_string(),
    ));
  }

  let document = app_state.store.update(&collection, &id, data).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": document })))
}

#[instrument(name = "handler::delete_document", skip(app_state))]
pub async fn delete_document(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (collection, id) = path.into_inner();

  app_state.store.delete(&collection, &id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Document deleted successfully"
  })))
}
