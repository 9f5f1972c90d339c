//! Chart-ready series derived from a filtered subset.
//!
//! Nothing here draws. These are the shapes handed to a scatter renderer
//! (grade vs price) and to the two line renderers (price and grade over
//! time), one line per listing id.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::Listing;
use crate::pipeline::has_multiple_distinct_timestamps;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub id: Option<String>,
    pub grade: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// All observations of one listing id, in time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: Option<String>,
    pub points: Vec<TrendPoint>,
}

/// Which listing field a trend line follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    Price,
    Grade,
}

impl TrendMetric {
    fn value(self, listing: &Listing) -> f64 {
        match self {
            TrendMetric::Price => listing.price,
            TrendMetric::Grade => listing.grade,
        }
    }
}

/// A trend line is only meaningful across two or more distinct timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendView {
    NotEnoughData,
    Series { series: Vec<Series> },
}

impl TrendView {
    pub fn series(&self) -> &[Series] {
        match self {
            TrendView::NotEnoughData => &[],
            TrendView::Series { series } => series,
        }
    }
}

pub fn grade_price_points(subset: &[&Listing]) -> Vec<ScatterPoint> {
    subset
        .iter()
        .map(|l| ScatterPoint {
            id: l.id.clone(),
            grade: l.grade,
            price: l.price,
        })
        .collect()
}

/// Group a time-sorted subset into one series per id.
///
/// `sorted` should come from [`crate::pipeline::sort_by_time`]; point order
/// within each series follows the input order. Series appear in the order
/// their id is first seen.
pub fn trend(sorted: &[&Listing], metric: TrendMetric) -> TrendView {
    if !has_multiple_distinct_timestamps(sorted) {
        return TrendView::NotEnoughData;
    }

    let mut series: Vec<Series> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for l in sorted {
        let slot = *index.entry(l.id.as_deref()).or_insert_with(|| {
            series.push(Series {
                id: l.id.clone(),
                points: Vec::new(),
            });
            series.len() - 1
        });
        series[slot].points.push(TrendPoint {
            timestamp: l.timestamp,
            value: metric.value(l),
        });
    }

    TrendView::Series { series }
}

pub fn price_trend(sorted: &[&Listing]) -> TrendView {
    trend(sorted, TrendMetric::Price)
}

pub fn grade_trend(sorted: &[&Listing]) -> TrendView {
    trend(sorted, TrendMetric::Grade)
}
