use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, headers, is_row_list};

/// Format output as tables: scalar fields first, then one table per list
/// of rows, then warnings and methodology from the envelope.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_object(result);
                print_envelope_notes(map);
            }
            Some(other) => {
                print_value(other);
                print_envelope_notes(map);
            }
            None => print_object(map),
        },
        other => print_value(other),
    }
}

fn print_value(value: &Value) {
    match value {
        Value::Object(map) => print_object(map),
        Value::Array(rows) if is_row_list(value) => print_rows(rows),
        Value::Array(items) if items.is_empty() => println!("(empty)"),
        Value::Array(items) => {
            for item in items {
                println!("{}", cell(item));
            }
        }
        other => println!("{}", cell(other)),
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !is_row_list(val) {
            builder.push_record([key.as_str(), &cell(val)]);
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in map {
        if let Value::Array(rows) = val {
            if is_row_list(val) {
                println!("\n{}:", key);
                print_rows(rows);
            }
        }
    }
}

fn print_rows(rows: &[Value]) {
    let headers = headers(rows);
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default())
            .collect();
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
