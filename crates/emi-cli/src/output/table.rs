use colored::Colorize;
use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Schedule row fields in display order, with their column headers
const SCHEDULE_COLUMNS: [(&str, &str); 6] = [
    ("month", "Month"),
    ("starting_balance", "Starting Balance"),
    ("emi", "EMI"),
    ("interest_paid", "Interest Paid"),
    ("principal_paid", "Principal Paid"),
    ("ending_balance", "Ending Balance"),
];

/// Keys of the schedule summary shown under the rows
const SUMMARY_KEYS: [&str; 4] = [
    "emi",
    "total_interest_paid",
    "total_principal_paid",
    "final_balance",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(note) = value.get("notification") {
        print_notification(note);
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_notification(note: &Value) {
    let severity = note
        .get("severity")
        .and_then(Value::as_str)
        .unwrap_or("info");
    let message = note.get("message").and_then(Value::as_str).unwrap_or("");
    let tag = match severity {
        "error" => severity.red().bold(),
        "warning" => severity.yellow().bold(),
        "success" => severity.green().bold(),
        _ => severity.normal(),
    };
    eprintln!("{}: {}", tag, message);
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Some(rows) = result.get("rows").and_then(Value::as_array) {
        print_schedule_rows(rows);
        print_schedule_summary(result);
    } else {
        print_flat_object(result);
    }

    // Print warnings if any
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

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_schedule_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty schedule)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS.map(|(_, header)| header));

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = SCHEDULE_COLUMNS
                .iter()
                .map(|(key, _)| map.get(*key).map(|v| format_value(v)).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    let table = Table::from(builder);
    println!("{}", table);
}

fn print_schedule_summary(result: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for key in SUMMARY_KEYS {
        if let Some(val) = result.get(key) {
            builder.push_record([key, &format_value(val)]);
        }
    }
    let table = Table::from(builder);
    println!("\n{}", table);
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
