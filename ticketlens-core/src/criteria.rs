//! Filter criteria — validated at construction, consumed by the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("price bound is NaN")]
    NanBound,

    #[error("minimum price {min} is greater than maximum price {max}")]
    InvertedRange { min: f64, max: f64 },
}

/// Either "no filter" or an exact label match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Build from an optional label; `None` and the literal "All" mean no filter.
    pub fn from_option(label: Option<&str>) -> Self {
        match label {
            None | Some("All") => Selection::All,
            Some(s) => Selection::Only(s.to_string()),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(want) => want == label,
        }
    }
}

/// Inclusive price bounds with `min <= max`.
///
/// Fields are private so an inverted range cannot be built. Infinite bounds
/// serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, CriteriaError> {
        if min.is_nan() || max.is_nan() {
            return Err(CriteriaError::NanBound);
        }
        if min > max {
            return Err(CriteriaError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Range that admits every price.
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[derive(Serialize, Deserialize)]
struct RawPriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl Serialize for PriceRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawPriceRange {
            min: Some(self.min).filter(|v| v.is_finite()),
            max: Some(self.max).filter(|v| v.is_finite()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PriceRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPriceRange::deserialize(deserializer)?;
        PriceRange::new(
            raw.min.unwrap_or(f64::NEG_INFINITY),
            raw.max.unwrap_or(f64::INFINITY),
        )
        .map_err(serde::de::Error::custom)
    }
}

/// The full set of predicates applied to a listing set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub section: Selection,
    pub row: Selection,
    /// Case-insensitive id substring; empty means no filter.
    pub id_substring: String,
    pub price: PriceRange,
}

impl FilterCriteria {
    /// Criteria that keep every listing.
    pub fn no_filter() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterCriteriaBuilder {
        FilterCriteriaBuilder::default()
    }
}

/// Incremental construction; price bounds are checked in `build`.
#[derive(Debug, Default)]
pub struct FilterCriteriaBuilder {
    section: Selection,
    row: Selection,
    id_substring: String,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

impl FilterCriteriaBuilder {
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Selection::Only(section.into());
        self
    }

    pub fn row(mut self, row: impl Into<String>) -> Self {
        self.row = Selection::Only(row.into());
        self
    }

    pub fn id_substring(mut self, needle: impl Into<String>) -> Self {
        self.id_substring = needle.into();
        self
    }

    pub fn min_price(mut self, min: f64) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn build(self) -> Result<FilterCriteria, CriteriaError> {
        let price = PriceRange::new(
            self.min_price.unwrap_or(f64::NEG_INFINITY),
            self.max_price.unwrap_or(f64::INFINITY),
        )?;
        Ok(FilterCriteria {
            section: self.section,
            row: self.row,
            id_substring: self.id_substring,
            price,
        })
    }
}
