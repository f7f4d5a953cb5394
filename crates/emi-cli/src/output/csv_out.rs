use serde_json::Value;
use std::io;

/// Schedule row fields in column order
const SCHEDULE_FIELDS: [&str; 6] = [
    "month",
    "starting_balance",
    "emi",
    "interest_paid",
    "principal_paid",
    "ending_balance",
];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(note) = value.get("notification") {
        let _ = wtr.write_record(["severity", "title", "message"]);
        let _ = wtr.write_record([
            note.get("severity").and_then(Value::as_str).unwrap_or(""),
            note.get("title").and_then(Value::as_str).unwrap_or(""),
            note.get("message").and_then(Value::as_str).unwrap_or(""),
        ]);
        let _ = wtr.flush();
        return;
    }

    match value {
        Value::Object(map) => {
            let rows = map
                .get("result")
                .and_then(|r| r.get("rows"))
                .and_then(Value::as_array);
            if let Some(rows) = rows {
                write_schedule_csv(&mut wtr, rows);
            } else if let Some(Value::Object(result)) = map.get("result") {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_schedule_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let _ = wtr.write_record(SCHEDULE_FIELDS);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = SCHEDULE_FIELDS
                .iter()
                .map(|key| {
                    map.get(*key)
                        .map(|v| format_csv_value(v))
                        .unwrap_or_default()
                })
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
