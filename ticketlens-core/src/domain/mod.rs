//! Domain types for TicketLens

pub mod ids;
pub mod listing;

pub use ids::DatasetHash;
pub use listing::{parse_timestamp, Listing, TimestampError};
