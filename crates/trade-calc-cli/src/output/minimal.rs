use serde_json::Value;

use super::plain;

/// Headline figure of each calculator, in lookup order.
const HEADLINE_KEYS: [&str; 5] = [
    "installment",
    "total_value",
    "average_price",
    "summary_text",
    "converted_time",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in HEADLINE_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", plain(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    if let Value::Array(items) = result_obj {
        println!("{} entries", items.len());
        return;
    }

    println!("{}", plain(result_obj));
}
