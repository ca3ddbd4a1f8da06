// src/services/mod.rs

//! Collaborator-facing services. Three of them (document store, media store,
//! payment gateway) are thin clients over external platforms; the delivery
//! service carries the order-status workflow, the one piece of real decision
//! logic in this backend.

pub mod cloudinary;
pub mod delivery;
pub mod firestore;
pub mod identity;
pub mod razorpay;

pub use cloudinary::CloudinaryService;
pub use delivery::DeliveryService;
pub use firestore::{DocumentStore, FirestoreStore};
pub use identity::{Claims, FirebaseIdentityVerifier, IdentityVerifier};
pub use razorpay::RazorpayService;
