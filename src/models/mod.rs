// src/models/mod.rs

//! Data structures for the records held by the external document store.

pub mod agent;
pub mod order;

pub use agent::DeliveryAgent;
pub use order::{DeliveryAddress, Order, OrderItem, OrderStatus, PaymentStatus, TimelineEntry};
