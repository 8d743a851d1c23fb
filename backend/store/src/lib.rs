pub mod auth;
pub mod document;
pub mod firestore;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use firestore::FirestoreStore;
