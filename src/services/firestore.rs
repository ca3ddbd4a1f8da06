// src/services/firestore.rs

//! Document store client over the Firestore REST v1 surface.
//!
//! The rest of the crate talks to the [`DocumentStore`] trait and works in
//! plain `serde_json::Value` documents; this module owns the translation to
//! Firestore's typed-value wire format and back.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::config::FirebaseConfig;
use crate::errors::{AppError, Result};

/// Generic collection/document CRUD with single-field equality queries.
/// Result documents carry their id merged into the record under `"id"`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;
  async fn list(&self, collection: &str) -> Result<Vec<Value>>;
  async fn query_eq(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Value>>;
  async fn add(&self, collection: &str, data: Value) -> Result<Value>;
  async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<Value>;
  async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

pub struct FirestoreStore {
  backend: Option<FirestoreBackend>,
}

struct FirestoreBackend {
  http: reqwest::Client,
  project_id: String,
  api_key: String,
}

impl FirestoreStore {
  /// An absent configuration group yields a store that fails every call with
  /// `StoreUnavailable` for the process lifetime.
  pub fn new(config: Option<FirebaseConfig>) -> Self {
    let backend = config.map(|cfg| FirestoreBackend {
      http: reqwest::Client::new(),
      project_id: cfg.project_id,
      api_key: cfg.api_key,
    });
    Self { backend }
  }

  pub fn is_configured(&self) -> bool {
    self.backend.is_some()
  }

  fn backend(&self) -> Result<&FirestoreBackend> {
    self.backend.as_ref().ok_or(AppError::StoreUnavailable)
  }
}

impl FirestoreBackend {
  fn collection_url(&self, collection: &str) -> String {
    format!(
      "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents/{}",
      self.project_id, collection
    )
  }

  fn document_url(&self, collection: &str, id: &str) -> String {
    format!("{}/{}", self.collection_url(collection), id)
  }

  fn run_query_url(&self) -> String {
    format!(
      "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents:runQuery",
      self.project_id
    )
  }
}

/// Reads a response body, mapping non-success statuses to the error taxonomy.
async fn read_json(resp: reqwest::Response, context: &str) -> Result<Value> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp.json::<Value>().await?);
  }
  let body = resp.text().await.unwrap_or_default();
  if status == reqwest::StatusCode::NOT_FOUND {
    return Err(AppError::NotFound(format!("{}: document not found", context)));
  }
  Err(AppError::Internal(format!(
    "{} failed with status {}: {}",
    context, status, body
  )))
}

#[async_trait]
impl DocumentStore for FirestoreStore {
  #[instrument(name = "firestore::get", skip(self))]
  async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
    let backend = self.backend()?;
    let resp = backend
      .http
      .get(backend.document_url(collection, id))
      .query(&[("key", backend.api_key.as_str())])
      .send()
      .await?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let doc = read_json(resp, "Fetching document").await?;
    Ok(Some(decode_document(&doc)))
  }

  #[instrument(name = "firestore::list", skip(self))]
  async fn list(&self, collection: &str) -> Result<Vec<Value>> {
    let backend = self.backend()?;
    let mut records = Vec::new();
    let mut page_token: Option<String> = None;

    // Follow continuation tokens so callers always see the full collection.
    loop {
      let mut query: Vec<(&str, String)> = vec![
        ("key", backend.api_key.clone()),
        ("pageSize", "300".to_string()),
      ];
      if let Some(token) = &page_token {
        query.push(("pageToken", token.clone()));
      }

      let resp = backend
        .http
        .get(backend.collection_url(collection))
        .query(&query)
        .send()
        .await?;
      let body = read_json(resp, "Listing collection").await?;

      if let Some(docs) = body.get("documents").and_then(Value::as_array) {
        records.extend(docs.iter().map(decode_document));
      }
      page_token = body
        .get("nextPageToken")
        .and_then(Value::as_str)
        .map(str::to_string);
      if page_token.is_none() {
        break;
      }
    }
    Ok(records)
  }

  #[instrument(name = "firestore::query_eq", skip(self))]
  async fn query_eq(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Value>> {
    let backend = self.backend()?;
    let query = json!({
      "structuredQuery": {
        "from": [{"collectionId": collection}],
        "where": {
          "fieldFilter": {
            "field": {"fieldPath": field},
            "op": "EQUAL",
            "value": {"stringValue": value},
          }
        }
      }
    });
    let resp = backend
      .http
      .post(backend.run_query_url())
      .query(&[("key", backend.api_key.as_str())])
      .json(&query)
      .send()
      .await?;
    let body = read_json(resp, "Running query").await?;
    // runQuery streams one result object per row; rows without a `document`
    // key are progress markers.
    let docs = body
      .as_array()
      .map(|rows| {
        rows
          .iter()
          .filter_map(|row| row.get("document"))
          .map(decode_document)
          .collect()
      })
      .unwrap_or_default();
    Ok(docs)
  }

  #[instrument(name = "firestore::add", skip(self, data))]
  async fn add(&self, collection: &str, data: Value) -> Result<Value> {
    let backend = self.backend()?;
    let fields = encode_fields(&data)?;
    let resp = backend
      .http
      .post(backend.collection_url(collection))
      .query(&[("key", backend.api_key.as_str())])
      .json(&json!({ "fields": fields }))
      .send()
      .await?;
    let doc = read_json(resp, "Adding document").await?;
    Ok(decode_document(&doc))
  }

  #[instrument(name = "firestore::update", skip(self, fields))]
  async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<Value> {
    let backend = self.backend()?;
    let field_names: Vec<String> = fields
      .as_object()
      .map(|map| map.keys().cloned().collect())
      .unwrap_or_default();
    let encoded = encode_fields(&fields)?;

    let mut query: Vec<(&str, String)> = vec![
      ("key", backend.api_key.clone()),
      // Refuse to create the document when it does not exist; a missing id
      // must surface as NotFound, not an insert.
      ("currentDocument.exists", "true".to_string()),
    ];
    for name in &field_names {
      query.push(("updateMask.fieldPaths", name.clone()));
    }

    let resp = backend
      .http
      .patch(backend.document_url(collection, id))
      .query(&query)
      .json(&json!({ "fields": encoded }))
      .send()
      .await?;
    let doc = read_json(resp, "Updating document").await?;
    Ok(decode_document(&doc))
  }

  #[instrument(name = "firestore::delete", skip(self))]
  async fn delete(&self, collection: &str, id: &str) -> Result<()> {
    let backend = self.backend()?;
    let resp = backend
      .http
      .delete(backend.document_url(collection, id))
      .query(&[("key", backend.api_key.as_str())])
      .send()
      .await?;
    read_json(resp, "Deleting document").await?;
    Ok(())
  }
}

// --- Typed-value codec ---

/// Encodes a JSON object into a Firestore `fields` map. The input must be an
/// object; documents are maps at the top level.
pub(crate) fn encode_fields(data: &Value) -> Result<Value> {
  let map = data
    .as_object()
    .ok_or_else(|| AppError::Validation("Document body must be a JSON object".to_string()))?;
  let fields: Map<String, Value> = map
    .iter()
    .map(|(k, v)| (k.clone(), encode_value(v)))
    .collect();
  Ok(Value::Object(fields))
}

fn encode_value(value: &Value) -> Value {
  match value {
    Value::Null => json!({ "nullValue": null }),
    Value::Bool(b) => json!({ "booleanValue": b }),
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        // Firestore carries 64-bit integers as decimal strings.
        json!({ "integerValue": i.to_string() })
      } else {
        json!({ "doubleValue": n.as_f64() })
      }
    }
    Value::String(s) => json!({ "stringValue": s }),
    Value::Array(items) => {
      let values: Vec<Value> = items.iter().map(encode_value).collect();
      json!({ "arrayValue": { "values": values } })
    }
    Value::Object(map) => {
      let fields: Map<String, Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
      json!({ "mapValue": { "fields": fields } })
    }
  }
}

/// Decodes a Firestore document resource into a flat record with the
/// document id merged under `"id"`.
pub(crate) fn decode_document(doc: &Value) -> Value {
  let mut record = doc
    .get("fields")
    .and_then(Value::as_object)
    .map(|fields| {
      fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect::<Map<String, Value>>()
    })
    .unwrap_or_default();

  if let Some(name) = doc.get("name").and_then(Value::as_str) {
    if let Some(id) = name.rsplit('/').next() {
      record.insert("id".to_string(), Value::String(id.to_string()));
    }
  }
  Value::Object(record)
}

fn decode_value(value: &Value) -> Value {
  let Some(map) = value.as_object() else {
    return Value::Null;
  };
  if let Some((kind, inner)) = map.iter().next() {
    match kind.as_str() {
      "nullValue" => Value::Null,
      "booleanValue" => inner.clone(),
      "integerValue" => inner
        .as_str()
        .and_then(|s| s.parse::<i64>().ok())
        .map(Value::from)
        .unwrap_or_else(|| inner.clone()),
      "doubleValue" => inner.clone(),
      // Timestamps come back as RFC3339 strings, which is also how this
      // service writes them; references and byte blobs pass through as-is.
      "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
      "arrayValue" => {
        let items = inner
          .get("values")
          .and_then(Value::as_array)
          .map(|values| values.iter().map(decode_value).collect())
          .unwrap_or_default();
        Value::Array(items)
      }
      "mapValue" => {
        let fields = inner
          .get("fields")
          .and_then(Value::as_object)
          .map(|fields| {
            fields
              .iter()
              .map(|(k, v)| (k.clone(), decode_value(v)))
              .collect::<Map<String, Value>>()
          })
          .unwrap_or_default();
        Value::Object(fields)
      }
      "geoPointValue" => inner.clone(),
      _ => Value::Null,
    }
  } else {
    Value::Null
  }
}
