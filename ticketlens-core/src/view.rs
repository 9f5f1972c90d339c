//! One pass of the pipeline, bundled for the renderers.

use crate::charts::{grade_price_points, grade_trend, price_trend, ScatterPoint, TrendView};
use crate::criteria::FilterCriteria;
use crate::domain::Listing;
use crate::pipeline::{filter, price_distribution, sort_by_time, summarize, PriceBucket, Summary};

/// Everything a dashboard refresh shows, computed from one set of criteria.
///
/// `rows` borrows from the source listings and keeps their original order
/// (the table view). The trend views are built from the time-sorted subset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    pub rows: Vec<&'a Listing>,
    pub summary: Summary,
    pub distribution: Vec<PriceBucket>,
    pub scatter: Vec<ScatterPoint>,
    pub price_trend: TrendView,
    pub grade_trend: TrendView,
}

pub fn run<'a>(records: &'a [Listing], criteria: &FilterCriteria) -> DashboardView<'a> {
    let rows = filter(records, criteria);
    let sorted = sort_by_time(&rows);

    let view = DashboardView {
        summary: summarize(&rows),
        distribution: price_distribution(&rows),
        scatter: grade_price_points(&rows),
        price_trend: price_trend(&sorted),
        grade_trend: grade_trend(&sorted),
        rows,
    };

    tracing::debug!(
        total = records.len(),
        matched = view.rows.len(),
        buckets = view.distribution.len(),
        "pipeline run"
    );
    view
}
