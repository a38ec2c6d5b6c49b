// staybook-api: Async Rust client for the REST-over-JSON document store

pub mod collection;
pub mod error;
pub mod filter;
pub mod store;
pub mod transport;

pub use collection::CollectionClient;
pub use error::Error;
pub use filter::EqualityFilter;
pub use store::DocumentStore;
