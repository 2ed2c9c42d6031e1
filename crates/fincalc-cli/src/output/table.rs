use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use fincalc_core::format::{format_currency, format_percent};

/// Fields carried as percent units.
const PERCENT_KEYS: &[&str] = &[
    "yield_to_maturity",
    "current_yield",
    "equivalent_apr",
    "residual_percent",
    "funded_percent",
    "after_tax_return",
    "real_return",
    "effective_annual_rate",
    "front_end_ratio",
    "back_end_ratio",
    "front_end_limit",
    "back_end_limit",
    "interest_rate",
];

/// Decimal fields that are neither money nor percent.
const PLAIN_KEYS: &[&str] = &[
    "periods",
    "macaulay_duration",
    "modified_duration",
    "days_in_period",
    "years_to_maturity",
    "declining_rate",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        print_flat_object(res_map);
    } else {
        print_flat_object(envelope);
    }

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

/// Scalar fields go in a two-column table; nested objects are flattened with a
/// dotted prefix and arrays of records are printed afterwards as their own tables.
fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(&str, &[Value])> = Vec::new();

    push_fields(&mut builder, "", map, &mut sections);
    println!("{}", Table::from(builder));

    for (name, rows) in sections {
        println!("\n{}:", name);
        print_array_table(rows);
    }
}

fn push_fields<'a>(
    builder: &mut Builder,
    prefix: &str,
    map: &'a Map<String, Value>,
    sections: &mut Vec<(&'a str, &'a [Value])>,
) {
    for (key, val) in map {
        let label = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => push_fields(builder, &label, inner, sections),
            Value::Array(arr) if arr.first().is_some_and(Value::is_object) => {
                sections.push((key.as_str(), arr.as_slice()));
            }
            _ => builder.push_record([label.as_str(), &format_field(key, val)]),
        }
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_field(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Decimals arrive as strings; render them as currency or percent by field name.
fn format_field(key: &str, value: &Value) -> String {
    let Value::String(s) = value else {
        return format_value(value);
    };
    let Ok(d) = Decimal::from_str(s) else {
        return s.clone();
    };
    if PERCENT_KEYS.contains(&key) {
        format_percent(d)
    } else if PLAIN_KEYS.contains(&key) {
        s.clone()
    } else {
        format_currency(d, false)
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
