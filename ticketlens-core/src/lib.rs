//! TicketLens Core — listing loader, filter pipeline, chart series, reports.
//!
//! This crate contains everything behind the dashboard:
//! - Domain types (listings, dataset hashes)
//! - Gzip/plain JSON loader with per-record validation and a content-keyed cache
//! - Filter criteria validated at construction
//! - Pure filter / summarize / distribution / time-sort pipeline
//! - Chart-ready scatter and trend series
//! - TOML dashboard defaults and facet extraction
//! - JSON, CSV and Markdown report export

pub mod charts;
pub mod config;
pub mod criteria;
pub mod data;
pub mod domain;
pub mod facets;
pub mod pipeline;
pub mod report;
pub mod view;

pub use config::{ConfigError, DashboardConfig};
pub use criteria::{CriteriaError, FilterCriteria, PriceRange, Selection};
pub use data::{load_listings, Dataset, DatasetCache, LoadError};
pub use domain::{DatasetHash, Listing};
pub use pipeline::{PriceBucket, PriceStats, Summary};
pub use view::{run, DashboardView};
