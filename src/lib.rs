// src/lib.rs

//! ElectroMart backend facade.
//!
//! Nearly all substantive work is delegated to three external platforms:
//! a document store that doubles as the identity provider, a media CDN,
//! and a payment gateway. The one piece of real decision logic lives in
//! the delivery service's order-status workflow (monotonic progression,
//! authorization by assignment, append-only status timeline).

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
