//! Dataset loading and memoization

pub mod cache;
pub mod loader;
pub mod schema;

pub use cache::DatasetCache;
pub use loader::{load_listings, parse_listings, Dataset, LoadError};
pub use schema::ListingSchema;
