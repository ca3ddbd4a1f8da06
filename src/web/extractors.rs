// src/web/extractors.rs

use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::services::Claims;
use crate::state::AppState;

/// Extracts and verifies the bearer token on protected delivery routes,
/// attaching the decoded claims before the handler body runs.
#[derive(Debug)]
pub struct AuthenticatedAgent {
  pub claims: Claims,
}

impl AuthenticatedAgent {
  pub fn agent_id(&self) -> &str {
    &self.claims.uid
  }
}

impl FromRequest for AuthenticatedAgent {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let header = req
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);

    Box::pin(async move {
      let state = state
        .ok_or_else(|| AppError::Internal("Application state is not attached".to_string()))?;

      let header = header.ok_or_else(|| {
        warn!("Rejected request without an Authorization header");
        AppError::Unauthenticated("Authentication required".to_string())
      })?;
      let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
          warn!("Rejected malformed Authorization header");
          AppError::Unauthenticated("Invalid authorization token".to_string())
        })?;

      let claims = state.identity.verify(token).await?;
      Ok(AuthenticatedAgent { claims })
    })
  }
}
