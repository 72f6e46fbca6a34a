use serde_json::Value;
use std::io;

const ROW_COLUMNS: [&str; 6] = [
    "index",
    "payment_total",
    "principal_portion",
    "interest_portion",
    "bonus_portion",
    "remaining_balance",
];

/// Write output as CSV to stdout. Schedule rows become one record each;
/// scalar results become field,value pairs. Full precision, no rounding.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);

    if let Some(rows) = result.get("rows").and_then(Value::as_array) {
        write_rows(&mut wtr, rows);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &scalar(val)]);
        }
    } else {
        let _ = wtr.write_record([&scalar(result)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let _ = wtr.write_record(ROW_COLUMNS);

    for row in rows {
        let record: Vec<String> = ROW_COLUMNS
            .iter()
            .map(|col| row.get(*col).map(scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
