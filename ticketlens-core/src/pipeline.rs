//! Filter-and-summarize pipeline.
//!
//! Every function here is pure: listings in, derived view out. The source
//! listings are only borrowed, never mutated, and nothing is cached between
//! calls.

use serde::{Deserialize, Serialize};

use crate::criteria::FilterCriteria;
use crate::domain::Listing;

/// Price statistics over a non-empty subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// Count plus price statistics. `prices` is `None` when the subset is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub prices: Option<PriceStats>,
}

impl Summary {
    pub fn has_data(&self) -> bool {
        self.prices.is_some()
    }
}

/// One bar of the price distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    pub price: f64,
    pub count: usize,
}

/// Keep the listings that satisfy every predicate in `criteria`, in input order.
///
/// Accepts any iterator of borrowed listings, so an already filtered subset
/// can be filtered again.
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let needle = criteria.id_substring.to_lowercase();
    records
        .into_iter()
        .filter(|l| matches(l, criteria, &needle))
        .collect()
}

/// Single-listing predicate behind [`filter`]. `needle_lower` is the
/// lowercased id substring.
pub fn matches(listing: &Listing, criteria: &FilterCriteria, needle_lower: &str) -> bool {
    criteria.section.matches(&listing.section)
        && criteria.row.matches(&listing.row)
        && (needle_lower.is_empty() || listing.id_contains_lowercase(needle_lower))
        && criteria.price.contains(listing.price)
}

pub fn summarize(subset: &[&Listing]) -> Summary {
    let count = subset.len();
    if count == 0 {
        return Summary {
            count,
            prices: None,
        };
    }

    // Running mean stays finite for any finite non-negative prices; a plain
    // sum overflows near f64::MAX.
    let (mean, min, max) = subset.iter().enumerate().fold(
        (0.0_f64, f64::INFINITY, f64::NEG_INFINITY),
        |(mean, min, max), (i, l)| {
            (
                mean + (l.price - mean) / (i + 1) as f64,
                min.min(l.price),
                max.max(l.price),
            )
        },
    );

    Summary {
        count,
        prices: Some(PriceStats { mean, max, min }),
    }
}

/// Count listings per exact price, ascending by price.
pub fn price_distribution(subset: &[&Listing]) -> Vec<PriceBucket> {
    let mut prices: Vec<f64> = subset.iter().map(|l| l.price).collect();
    prices.sort_by(|a, b| a.total_cmp(b));

    let mut buckets: Vec<PriceBucket> = Vec::new();
    for price in prices {
        match buckets.last_mut() {
            Some(last) if last.price == price => last.count += 1,
            _ => buckets.push(PriceBucket { price, count: 1 }),
        }
    }
    buckets
}

/// Stable ascending sort by timestamp.
pub fn sort_by_time<'a>(subset: &[&'a Listing]) -> Vec<&'a Listing> {
    let mut sorted = subset.to_vec();
    sorted.sort_by_key(|l| l.timestamp);
    sorted
}

/// True when the subset spans at least two distinct timestamps.
pub fn has_multiple_distinct_timestamps(subset: &[&Listing]) -> bool {
    match subset.split_first() {
        Some((first, rest)) => rest.iter().any(|l| l.timestamp != first.timestamp),
        None => false,
    }
}
