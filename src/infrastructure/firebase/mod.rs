//! Firebase integration: Identity Toolkit and Firestore REST APIs

mod client;
mod firestore;
mod identity;

pub use client::{FirebaseClient, ServiceAccount};
pub use firestore::{decode_fields, encode_fields, FirestoreDocumentStore};
pub use identity::FirebaseIdentityProvider;
