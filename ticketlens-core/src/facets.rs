//! Filter choices offered to the user, derived from the full listing set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::DashboardConfig;
use crate::criteria::{FilterCriteria, PriceRange, Selection};
use crate::domain::Listing;

/// Distinct labels and the price span of a listing set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    pub sections: Vec<String>,
    pub rows: Vec<String>,
    pub price_floor: Option<f64>,
    pub price_peak: Option<f64>,
}

impl Facets {
    pub fn of(records: &[Listing]) -> Self {
        Self {
            sections: sections(records),
            rows: rows(records),
            price_floor: price_floor(records),
            price_peak: records.iter().map(|l| l.price).reduce(f64::max),
        }
    }
}

/// Sorted distinct section labels. Labels sort as text, so "1000" precedes "112".
pub fn sections(records: &[Listing]) -> Vec<String> {
    distinct(records.iter().map(|l| l.section.as_str()))
}

/// Sorted distinct row labels.
pub fn rows(records: &[Listing]) -> Vec<String> {
    distinct(records.iter().map(|l| l.row.as_str()))
}

pub fn price_floor(records: &[Listing]) -> Option<f64> {
    records.iter().map(|l| l.price).reduce(f64::min)
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Criteria a fresh session starts with.
///
/// The configured default section is preselected only when the data has it.
/// The price range runs from the cheapest listing to the configured ceiling;
/// when the cheapest listing is above the ceiling the range collapses to the
/// floor instead of inverting.
pub fn default_criteria(records: &[Listing], config: &DashboardConfig) -> FilterCriteria {
    let section = match &config.default_section {
        Some(s) if records.iter().any(|l| &l.section == s) => Selection::Only(s.clone()),
        _ => Selection::All,
    };

    let floor = price_floor(records).unwrap_or(0.0);
    let ceiling = config.default_price_ceiling.max(floor);
    let price = PriceRange::new(floor, ceiling).unwrap_or_else(|_| PriceRange::unbounded());

    FilterCriteria {
        section,
        row: Selection::All,
        id_substring: String::new(),
        price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;

    fn listing(section: &str, row: &str, price: f64) -> Listing {
        Listing {
            id: Some(format!("{section}-{row}")),
            section: section.into(),
            row: row.into(),
            price,
            grade: 1.0,
            timestamp: parse_timestamp("2024-09-10T12:00:00").unwrap(),
        }
    }

    fn records() -> Vec<Listing> {
        vec![
            listing("114", "2", 250.0),
            listing("112", "5", 100.0),
            listing("1000", "5", 80.0),
            listing("112", "10", 1800.0),
        ]
    }

    #[test]
    fn sections_are_sorted_text() {
        assert_eq!(sections(&records()), vec!["1000", "112", "114"]);
        assert_eq!(rows(&records()), vec!["10", "2", "5"]);
    }

    #[test]
    fn facets_capture_price_span() {
        let f = Facets::of(&records());
        assert_eq!(f.price_floor, Some(80.0));
        assert_eq!(f.price_peak, Some(1800.0));

        let empty = Facets::of(&[]);
        assert!(empty.sections.is_empty());
        assert_eq!(empty.price_floor, None);
    }

    #[test]
    fn default_section_selected_when_present() {
        let c = default_criteria(&records(), &DashboardConfig::default());
        assert_eq!(c.section, Selection::Only("112".into()));
        assert_eq!(c.row, Selection::All);
        assert_eq!(c.price.min(), 80.0);
        assert_eq!(c.price.max(), 1600.0);
    }

    #[test]
    fn default_section_falls_back_to_all() {
        let records = vec![listing("300", "1", 40.0)];
        let c = default_criteria(&records, &DashboardConfig::default());
        assert_eq!(c.section, Selection::All);
    }

    #[test]
    fn floor_above_ceiling_does_not_invert() {
        let records = vec![listing("112", "1", 2000.0)];
        let c = default_criteria(&records, &DashboardConfig::default());
        assert_eq!(c.price.min(), 2000.0);
        assert_eq!(c.price.max(), 2000.0);
    }
}
