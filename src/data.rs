use anyhow::{anyhow, Context, Result};
use serde_json::{Number, Value};
use std::io::Read;

use crate::model::Record;

/// Build records from a JSON array of objects
pub fn records_from_json(value: &Value) -> Result<Vec<Record>> {
    let array = value
        .as_array()
        .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

    array
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_object()
                .cloned()
                .ok_or_else(|| anyhow!("Item {} in data array is not an object", idx))
        })
        .collect()
}

/// Build records from CSV text with a header row.
///
/// Cells that parse as finite numbers become JSON numbers so key inference
/// treats them as value fields; everything else stays a string.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        anyhow::bail!("CSV data has no header row");
    }

    let mut records = Vec::new();
    for (row_idx, row) in rdr.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read CSV row {}", row_idx + 1))?;
        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.clone(), csv_cell_value(cell));
        }
        records.push(record);
    }

    Ok(records)
}

fn csv_cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    match cell.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(cell.to_string()),
    }
}

/// True when the value is a JSON number (the only thing key inference counts
/// as a value field)
pub fn is_numeric(value: &Value) -> bool {
    value.is_number()
}

/// Value to plot on a cartesian axis: numbers and numeric strings, nothing
/// else. Missing or non-numeric cells leave a gap.
pub fn plot_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Loose numeric coercion used for totals: numbers pass through, numeric
/// strings are parsed, booleans count as 1/0, everything else is 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if coerced.is_finite() {
        coerced
    } else {
        0.0
    }
}

/// Text shown for a category cell
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Format a number with thousands separators and at most three decimals
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // past 1e15 an f64 carries no thousandths, and scaling could overflow
    let rounded = if value.abs() < 1e15 {
        (value * 1000.0).round() / 1000.0
    } else {
        value.trunc()
    };
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let frac = format!("{:.3}", abs - abs.trunc());
    let frac = frac.trim_start_matches('0').trim_end_matches('0').trim_end_matches('.');

    let digits = format!("{:.0}", abs.trunc());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && (digits != "0" || !frac.is_empty()) { "-" } else { "" };
    format!("{}{}{}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_json() {
        let records = records_from_json(&json!([{ "a": 1 }, { "a": 2 }])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], json!(2));
    }

    #[test]
    fn test_records_from_json_not_array() {
        let err = records_from_json(&json!({ "a": 1 })).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_records_from_json_non_object_item() {
        let err = records_from_json(&json!([{ "a": 1 }, 3])).unwrap_err();
        assert!(err.to_string().contains("Item 1"));
    }

    #[test]
    fn test_records_from_csv_types_cells() {
        let csv = "month, exports, note\nJan, 4200, ok\nFeb, 4500.5,\n";
        let records = records_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["month", "exports", "note"]);
        assert_eq!(records[0]["month"], json!("Jan"));
        assert_eq!(records[0]["exports"], json!(4200));
        assert_eq!(records[1]["exports"], json!(4500.5));
        assert_eq!(records[1]["note"], Value::Null);
    }

    #[test]
    fn test_plot_value() {
        assert_eq!(plot_value(Some(&json!(3.5))), Some(3.5));
        assert_eq!(plot_value(Some(&json!(" 12 "))), Some(12.0));
        assert_eq!(plot_value(Some(&json!("n/a"))), None);
        assert_eq!(plot_value(Some(&json!(true))), None);
        assert_eq!(plot_value(None), None);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(480))), 480.0);
        assert_eq!(coerce_number(Some(&json!("30"))), 30.0);
        assert_eq!(coerce_number(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(""))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(Some(&json!("Europe"))), "Europe");
        assert_eq!(display_value(Some(&json!(2019))), "2019");
        assert_eq!(display_value(None), "");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.0), "1,234,567");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(12.5), "12.5");
        assert_eq!(format_grouped(-4200.25), "-4,200.25");
        assert_eq!(format_grouped(0.0), "0");
    }

    #[test]
    fn test_format_grouped_beyond_u64() {
        assert_eq!(format_grouped(1e20), "100,000,000,000,000,000,000");
        assert_eq!(format_grouped(-1e20), "-100,000,000,000,000,000,000");

        let huge = format_grouped(1e306);
        let digits = huge.replace(',', "");
        assert!(digits.chars().all(|c| c.is_ascii_digit()), "{huge}");
        assert!(digits.len() >= 306);
    }
}
