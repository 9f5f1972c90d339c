//! Reporting and export — JSON, CSV and Markdown artifacts.
//!
//! - **JSON**: the full dashboard snapshot with a schema version
//! - **CSV**: filtered table and price distribution for spreadsheets
//! - **Markdown**: the summary block as the dashboard prints it
//!
//! Reports newer than [`SCHEMA_VERSION`] are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charts::{ScatterPoint, TrendView};
use crate::criteria::FilterCriteria;
use crate::domain::{DatasetHash, Listing};
use crate::pipeline::{PriceBucket, Summary};
use crate::view::DashboardView;

pub const SCHEMA_VERSION: u32 = 1;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Serializable snapshot of one dashboard refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub dataset_hash: DatasetHash,
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub distribution: Vec<PriceBucket>,
    pub scatter: Vec<ScatterPoint>,
    pub price_trend: TrendView,
    pub grade_trend: TrendView,
}

impl DashboardReport {
    pub fn from_view(
        view: &DashboardView<'_>,
        criteria: &FilterCriteria,
        dataset_hash: &DatasetHash,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            dataset_hash: dataset_hash.clone(),
            criteria: criteria.clone(),
            summary: view.summary,
            distribution: view.distribution.clone(),
            scatter: view.scatter.clone(),
            price_trend: view.price_trend.clone(),
            grade_trend: view.grade_trend.clone(),
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize DashboardReport to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<DashboardReport> {
    let report: DashboardReport =
        serde_json::from_str(json).context("failed to deserialize DashboardReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Filtered table as CSV. Columns: id, section, row, price, grade, timestamp.
/// A missing id is written as an empty cell.
pub fn export_listings_csv(rows: &[&Listing]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["id", "section", "row", "price", "grade", "timestamp"])?;

    for l in rows {
        wtr.write_record([
            l.id.as_deref().unwrap_or(""),
            l.section.as_str(),
            l.row.as_str(),
            l.price.to_string().as_str(),
            l.grade.to_string().as_str(),
            l.timestamp.format(TIMESTAMP_FORMAT).to_string().as_str(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush listings CSV")?;
    String::from_utf8(bytes).context("listings CSV is not UTF-8")
}

/// Price distribution as CSV. Columns: price, count.
pub fn export_distribution_csv(buckets: &[PriceBucket]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["price", "count"])?;
    for b in buckets {
        wtr.write_record([b.price.to_string(), b.count.to_string()])?;
    }
    let bytes = wtr.into_inner().context("failed to flush distribution CSV")?;
    String::from_utf8(bytes).context("distribution CSV is not UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

/// The "Data Summary" block. An empty subset prints "no data" rather than
/// a number.
pub fn render_summary_markdown(summary: &Summary) -> String {
    let mut md = String::from("### Data Summary\n\n");
    md.push_str(&format!("- Number of records: {}\n", summary.count));
    match &summary.prices {
        Some(p) => {
            md.push_str(&format!("- Average Price: ${:.2}\n", p.mean));
            md.push_str(&format!("- Maximum Price: ${:.2}\n", p.max));
            md.push_str(&format!("- Minimum Price: ${:.2}\n", p.min));
        }
        None => {
            md.push_str("- Average Price: no data\n");
            md.push_str("- Maximum Price: no data\n");
            md.push_str("- Minimum Price: no data\n");
        }
    }
    md
}

// ─── Artifacts ──────────────────────────────────────────────────────

/// Write `report.json`, `listings.csv`, `distribution.csv` and `summary.md`
/// into `dir`, creating it if needed. Returns the written paths.
pub fn save_report(dir: &Path, report: &DashboardReport, rows: &[&Listing]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let artifacts = [
        ("report.json", export_json(report)?),
        ("listings.csv", export_listings_csv(rows)?),
        ("distribution.csv", export_distribution_csv(&report.distribution)?),
        ("summary.md", render_summary_markdown(&report.summary)),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, contents) in artifacts {
        let path = dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "report saved");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;
    use crate::pipeline::PriceStats;
    use crate::view::run;

    fn listings() -> Vec<Listing> {
        vec![
            Listing {
                id: Some("A".into()),
                section: "112".into(),
                row: "5".into(),
                price: 100.0,
                grade: 3.0,
                timestamp: parse_timestamp("2024-09-10T12:00:00").unwrap(),
            },
            Listing {
                id: None,
                section: "112".into(),
                row: "5".into(),
                price: 120.5,
                grade: 4.0,
                timestamp: parse_timestamp("2024-09-11T12:30:00.5").unwrap(),
            },
        ]
    }

    fn report_for(records: &[Listing]) -> DashboardReport {
        let criteria = FilterCriteria::no_filter();
        let view = run(records, &criteria);
        DashboardReport::from_view(&view, &criteria, &DatasetHash::of_bytes(b"fixture"))
    }

    #[test]
    fn json_roundtrip() {
        let records = listings();
        let report = report_for(&records);
        let json = export_json(&report).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(report, back);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let records = listings();
        let mut report = report_for(&records);
        report.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&report).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn empty_summary_serializes_prices_as_null() {
        let report = report_for(&[]);
        let json = export_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["summary"]["prices"].is_null());
        assert_eq!(value["summary"]["count"], 0);
    }

    #[test]
    fn listings_csv_has_header_and_rows() {
        let records = listings();
        let rows: Vec<&Listing> = records.iter().collect();
        let csv = export_listings_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,section,row,price,grade,timestamp");
        assert_eq!(lines[1], "A,112,5,100,3,2024-09-10T12:00:00");
        assert_eq!(lines[2], ",112,5,120.5,4,2024-09-11T12:30:00.500");
    }

    #[test]
    fn distribution_csv() {
        let buckets = vec![
            PriceBucket { price: 100.0, count: 2 },
            PriceBucket { price: 250.0, count: 1 },
        ];
        let csv = export_distribution_csv(&buckets).unwrap();
        assert_eq!(csv, "price,count\n100,2\n250,1\n");
    }

    #[test]
    fn summary_markdown_formats_currency() {
        let summary = Summary {
            count: 3,
            prices: Some(PriceStats {
                mean: 150.0,
                max: 250.0,
                min: 100.0,
            }),
        };
        let md = render_summary_markdown(&summary);
        assert!(md.contains("Number of records: 3"));
        assert!(md.contains("Average Price: $150.00"));
        assert!(md.contains("Maximum Price: $250.00"));
        assert!(md.contains("Minimum Price: $100.00"));
    }

    #[test]
    fn summary_markdown_without_data() {
        let md = render_summary_markdown(&Summary {
            count: 0,
            prices: None,
        });
        assert!(md.contains("Number of records: 0"));
        assert!(md.contains("Average Price: no data"));
        assert!(!md.contains('$'));
    }

    #[test]
    fn save_report_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let records = listings();
        let report = report_for(&records);
        let rows: Vec<&Listing> = records.iter().collect();

        let written = save_report(&dir.path().join("out"), &report, &rows).unwrap();
        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }
        let json = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
        assert_eq!(import_json(&json).unwrap(), report);
    }
}
