//! Source-file field layout and per-record validation.
//!
//! The input is a JSON array of objects keyed by short field names
//! (`sid`, `r`, `p`). Each object is checked field by field so a bad row
//! is reported by index and field name instead of failing the whole parse
//! with an opaque serde message.

use serde_json::{Map, Value};

use super::loader::LoadError;
use crate::domain::{parse_timestamp, Listing};

/// Field names in the source file.
pub struct ListingSchema;

impl ListingSchema {
    pub const ID: &'static str = "id";
    pub const SECTION: &'static str = "sid";
    pub const ROW: &'static str = "r";
    pub const PRICE: &'static str = "p";
    pub const GRADE: &'static str = "grade";
    pub const TIMESTAMP: &'static str = "timestamp";
}

/// Validate one source object into a [`Listing`].
pub fn listing_from_value(index: usize, value: &Value) -> Result<Listing, LoadError> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid(index, "<record>", "is not a JSON object".into()))?;

    let id = optional_label(index, obj, ListingSchema::ID)?;
    let section = required_label(index, obj, ListingSchema::SECTION)?;
    let row = required_label(index, obj, ListingSchema::ROW)?;

    let price = required_number(index, obj, ListingSchema::PRICE)?;
    if price < 0.0 {
        return Err(invalid(index, ListingSchema::PRICE, format!("is negative ({price})")));
    }
    let grade = required_number(index, obj, ListingSchema::GRADE)?;

    let raw_ts = match obj.get(ListingSchema::TIMESTAMP) {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => return Err(missing(index, ListingSchema::TIMESTAMP)),
        Some(other) => {
            return Err(invalid(
                index,
                ListingSchema::TIMESTAMP,
                format!("must be a string, got {other}"),
            ))
        }
    };
    let timestamp = parse_timestamp(raw_ts)
        .map_err(|e| invalid(index, ListingSchema::TIMESTAMP, e.to_string()))?;

    Ok(Listing {
        id,
        section,
        row,
        price,
        grade,
        timestamp,
    })
}

fn missing(index: usize, field: &'static str) -> LoadError {
    LoadError::InvalidRecord {
        index,
        field,
        reason: "is missing".into(),
    }
}

fn invalid(index: usize, field: &'static str, reason: String) -> LoadError {
    LoadError::InvalidRecord {
        index,
        field,
        reason,
    }
}

/// Categorical labels arrive as strings or bare integers. Integers keep
/// their decimal text; nothing is parsed back into a number.
fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::Number(n) => n.as_f64().map(|f| {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                f.to_string()
            }
        }),
        _ => None,
    }
}

fn optional_label(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, LoadError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => label_text(v)
            .map(Some)
            .ok_or_else(|| invalid(index, field, format!("must be a string or integer, got {v}"))),
    }
}

fn required_label(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<String, LoadError> {
    optional_label(index, obj, field)?.ok_or_else(|| missing(index, field))
}

fn required_number(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, LoadError> {
    let n = match obj.get(field) {
        None | Some(Value::Null) => return Err(missing(index, field)),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match n {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(invalid(index, field, "must be a finite number".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good_record() -> Value {
        json!({
            "id": "T-1",
            "sid": "112",
            "r": "5",
            "p": 100.0,
            "grade": 3,
            "timestamp": "2024-09-10T12:00:00"
        })
    }

    #[test]
    fn valid_record_converts() {
        let l = listing_from_value(0, &good_record()).unwrap();
        assert_eq!(l.id.as_deref(), Some("T-1"));
        assert_eq!(l.section, "112");
        assert_eq!(l.row, "5");
        assert_eq!(l.price, 100.0);
        assert_eq!(l.grade, 3.0);
    }

    #[test]
    fn numeric_section_stays_a_label() {
        let mut rec = good_record();
        rec["sid"] = json!(112);
        rec["r"] = json!(7.0);
        let l = listing_from_value(0, &rec).unwrap();
        assert_eq!(l.section, "112");
        assert_eq!(l.row, "7");
    }

    #[test]
    fn leading_zero_labels_are_preserved() {
        let mut rec = good_record();
        rec["r"] = json!("05");
        let l = listing_from_value(0, &rec).unwrap();
        assert_eq!(l.row, "05");
    }

    #[test]
    fn null_id_is_allowed() {
        let mut rec = good_record();
        rec["id"] = Value::Null;
        let l = listing_from_value(0, &rec).unwrap();
        assert!(l.id.is_none());
    }

    #[test]
    fn missing_price_names_the_field() {
        let mut rec = good_record();
        rec.as_object_mut().unwrap().remove("p");
        let err = listing_from_value(4, &rec).unwrap_err();
        match err {
            LoadError::InvalidRecord { index, field, .. } => {
                assert_eq!(index, 4);
                assert_eq!(field, "p");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut rec = good_record();
        rec["p"] = json!(-1.0);
        assert!(listing_from_value(0, &rec).is_err());
    }

    #[test]
    fn numeric_string_price_is_accepted() {
        let mut rec = good_record();
        rec["p"] = json!("249.50");
        let l = listing_from_value(0, &rec).unwrap();
        assert_eq!(l.price, 249.5);
    }

    #[test]
    fn bad_timestamp_is_reported() {
        let mut rec = good_record();
        rec["timestamp"] = json!("not a time");
        let err = listing_from_value(2, &rec).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn non_object_record_is_rejected() {
        let err = listing_from_value(0, &json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }
}
