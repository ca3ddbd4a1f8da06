// src/services/identity.rs

//! Bearer-token verification against the identity provider, plus the coarse
//! admin gate used by administrative tooling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::FirebaseConfig;
use crate::errors::{AppError, Result};

/// Claims decoded from a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub uid: String,
  pub email: Option<String>,
}

impl Claims {
  /// Coarse administrative gate: the identity's email must belong to the
  /// organizational domain. This is a plain suffix check, not a role system,
  /// and takes no part in the delivery workflow's own decisions.
  pub fn require_admin(&self, admin_domain: &str) -> Result<()> {
    let suffix = format!("@{}", admin_domain);
    match &self.email {
      Some(email) if email.ends_with(&suffix) => Ok(()),
      _ => Err(AppError::Unauthorized("Admin access required".to_string())),
    }
  }
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
  async fn verify(&self, token: &str) -> Result<Claims>;
}

/// Verifies ID tokens through the Identity Toolkit `accounts:lookup` call.
/// Rides on the same credential group as the document store.
pub struct FirebaseIdentityVerifier {
  backend: Option<IdentityBackend>,
}

struct IdentityBackend {
  http: reqwest::Client,
  api_key: String,
}

impl FirebaseIdentityVerifier {
  pub fn new(config: Option<FirebaseConfig>) -> Self {
    let backend = config.map(|cfg| IdentityBackend {
      http: reqwest::Client::new(),
      api_key: cfg.api_key,
    });
    Self { backend }
  }
}

#[derive(Deserialize)]
struct LookupResponse {
  #[serde(default)]
  users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
  local_id: String,
  #[serde(default)]
  email: Option<String>,
}

#[async_trait]
impl IdentityVerifier for FirebaseIdentityVerifier {
  #[instrument(name = "identity::verify", skip(self, token))]
  async fn verify(&self, token: &str) -> Result<Claims> {
    let backend = self.backend.as_ref().ok_or(AppError::StoreUnavailable)?;

    let resp = backend
      .http
      .post("https://identitytoolkit.googleapis.com/v1/accounts:lookup")
      .query(&[("key", backend.api_key.as_str())])
      .json(&serde_json::json!({ "idToken": token }))
      .send()
      .await?;

    if !resp.status().is_success() {
      tracing::warn!(status = %resp.status(), "Token verification rejected by identity provider");
      return Err(AppError::Unauthenticated(
        "Invalid or expired token".to_string(),
      ));
    }

    let lookup: LookupResponse = resp.json().await?;
    let user = lookup.users.into_iter().next().ok_or_else(|| {
      AppError::Unauthenticated("Invalid or expired token".to_string())
    })?;

    Ok(Claims {
      uid: user.local_id,
      email: user.email,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn admin_gate_matches_the_domain_suffix() {
    let admin = Claims {
      uid: "u1".into(),
      email: Some("ops@electromart.com".into()),
    };
    assert!(admin.require_admin("electromart.com").is_ok());

    let outsider = Claims {
      uid: "u2".into(),
      email: Some("ops@example.com".into()),
    };
    assert!(matches!(
      outsider.require_admin("electromart.com"),
      Err(AppError::Unauthorized(_))
    ));

    // A bare suffix match without the separator must not pass.
    let lookalike = Claims {
      uid: "u3".into(),
      email: Some("ops@evilelectromart.com".into()),
    };
    assert!(lookalike.require_admin("electromart.com").is_err());

    let anonymous = Claims {
      uid: "u4".into(),
      email: None,
    };
    assert!(anonymous.require_admin("electromart.com").is_err());
  }
}
