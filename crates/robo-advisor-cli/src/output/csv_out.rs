use serde_json::{Map, Value};
use std::io;

use super::{cell, headers, is_row_list, ROW_FIELDS};

type Writer<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Lists of rows (catalog, holdings, suggestions, value path) become one
/// record per row; anything else is written as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(rows) if is_row_list(body) => write_rows(&mut wtr, rows),
        Value::Object(map) => match primary_rows(map) {
            Some(rows) => write_rows(&mut wtr, rows),
            None => write_fields(&mut wtr, map),
        },
        Value::Array(items) => {
            for item in items {
                let _ = wtr.write_record([cell(item)]);
            }
        }
        other => {
            let _ = wtr.write_record([cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn primary_rows(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    ROW_FIELDS.iter().find_map(|key| {
        map.get(*key)
            .filter(|v| is_row_list(v))
            .and_then(Value::as_array)
    })
}

fn write_fields(wtr: &mut Writer<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &cell(val)]);
    }
}

fn write_rows(wtr: &mut Writer<'_>, rows: &[Value]) {
    let headers = headers(rows);
    let _ = wtr.write_record(&headers);
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}
