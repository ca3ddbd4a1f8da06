// src/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
  CloudinaryService, DeliveryService, DocumentStore, FirebaseIdentityVerifier, FirestoreStore,
  IdentityVerifier, RazorpayService,
};

/// Shared application state: each external integration is constructed once
/// at startup from the resolved configuration and lives for the process.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn DocumentStore>,
  pub identity: Arc<dyn IdentityVerifier>,
  pub media: Arc<CloudinaryService>,
  pub payments: Arc<RazorpayService>,
  pub delivery: Arc<DeliveryService>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Production wiring: real platform clients behind the service traits.
  pub fn from_config(config: AppConfig) -> Self {
    let store: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(config.firebase.clone()));
    let identity: Arc<dyn IdentityVerifier> =
      Arc::new(FirebaseIdentityVerifier::new(config.firebase.clone()));
    Self::with_collaborators(config, store, identity)
  }

  /// Wiring with caller-supplied store and identity collaborators; tests
  /// inject in-memory fakes through this.
  pub fn with_collaborators(
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityVerifier>,
  ) -> Self {
    let media = Arc::new(CloudinaryService::new(config.cloudinary.clone()));
    let payments = Arc::new(RazorpayService::new(config.razorpay.clone()));
    let delivery = Arc::new(DeliveryService::new(Arc::clone(&store)));
    Self {
      store,
      identity,
      media,
      payments,
      delivery,
      config: Arc::new(config),
    }
  }
}
