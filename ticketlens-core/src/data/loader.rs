//! Listing file loader.
//!
//! Reads a JSON array of listing objects, gzip-compressed or plain, and
//! validates every record into an immutable [`Dataset`]. Compression is
//! detected from the gzip magic bytes, not the file extension.

use flate2::read::GzDecoder;
use serde_json::Value;
use std::borrow::Cow;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::schema::listing_from_value;
use crate::domain::{DatasetHash, Listing};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors from reading and validating a listing file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("gzip decode failed: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of listing objects at the top level")]
    NotAnArray,

    #[error("record {index}: field '{field}' {reason}")]
    InvalidRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

/// The full, immutable listing set for one source file.
///
/// Cloning is cheap: the listings sit behind an `Arc` and are shared by
/// every clone. Nothing hands out mutable access.
#[derive(Debug, Clone)]
pub struct Dataset {
    hash: DatasetHash,
    listings: Arc<[Listing]>,
}

impl Dataset {
    pub fn hash(&self) -> &DatasetHash {
        &self.hash
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// True when both handles point at the same shared listing buffer.
    pub fn shares_storage_with(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.listings, &other.listings)
    }
}

/// Read and validate a listing file.
pub fn load_listings(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_listings(&bytes)?;
    tracing::info!(
        path = %path.display(),
        listings = dataset.len(),
        hash = dataset.hash().short(),
        "loaded listings"
    );
    Ok(dataset)
}

/// Parse raw file bytes (gzip or plain JSON) into a [`Dataset`].
///
/// The dataset hash is taken over the raw bytes as stored on disk.
pub fn parse_listings(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let hash = DatasetHash::of_bytes(bytes);
    let json = decompress_if_gzip(bytes)?;

    let value: Value = serde_json::from_slice(&json)?;
    let records = value.as_array().ok_or(LoadError::NotAnArray)?;

    let listings = records
        .iter()
        .enumerate()
        .map(|(i, rec)| listing_from_value(i, rec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset {
        hash,
        listings: listings.into(),
    })
}

fn decompress_if_gzip(bytes: &[u8]) -> Result<Cow<'_, [u8]>, LoadError> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }
    let mut out = Vec::with_capacity(bytes.len() * 4);
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(LoadError::Decompress)?;
    Ok(Cow::Owned(out))
}
