use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{nested_rows, plain};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else if let Some(Value::Array(rows)) = map.get("results") {
                let summary: Map<String, Value> = map
                    .iter()
                    .filter(|(k, _)| k.as_str() != "results")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                print_fields(&summary);
                println!();
                print_rows(rows);
            } else {
                print_result(map);
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", plain(value)),
    }
}

/// Scalar fields as a Field/Value table, then any nested row list as its own table.
fn print_result(result: &Map<String, Value>) {
    let nested = nested_rows(result);
    let scalars: Map<String, Value> = result
        .iter()
        .filter(|(k, _)| nested.map(|(name, _)| name != k.as_str()).unwrap_or(true))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    print_fields(&scalars);

    if let Some((name, rows)) = nested {
        println!("\n{name}:");
        print_rows(rows);
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for item in rows {
            println!("{}", format_cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => items.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        _ => plain(value),
    }
}
