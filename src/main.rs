// src/main.rs

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use electromart_backend::config::AppConfig;
use electromart_backend::errors::AppError;
use electromart_backend::state::AppState;
use electromart_backend::web::{configure_app_routes, not_found_handler};

const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

fn build_cors(state: &AppState) -> Cors {
  if state.config.allows_any_origin() {
    return Cors::permissive();
  }
  let mut cors = Cors::default()
    .allow_any_method()
    .allow_any_header()
    .max_age(3600);
  for origin in &state.config.allowed_origins {
    cors = cors.allowed_origin(origin);
  }
  cors
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting ElectroMart backend server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };
  let server_port = app_config.server_port;

  let app_state = AppState::from_config(app_config);

  tracing::info!(
    firebase_configured = app_state.config.firebase.is_some(),
    cloudinary_configured = app_state.media.is_configured(),
    razorpay_configured = app_state.payments.is_configured(),
    environment = %app_state.config.environment,
    "External integrations resolved"
  );

  let server_address = format!("0.0.0.0:{}", server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .app_data(
        web::JsonConfig::default()
          .limit(BODY_LIMIT_BYTES)
          .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
      )
      .app_data(web::PayloadConfig::new(BODY_LIMIT_BYTES))
      .wrap(build_cors(&app_state))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
      .default_service(web::route().to(not_found_handler))
  })
  .bind(&server_address)?
  .run()
  .await
}
