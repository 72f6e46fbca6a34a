use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;
use tabled::{builder::Builder, Table};

/// Format output as a table. Currency amounts are rounded to whole units
/// with thousands separators; rounding happens here and nowhere else.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                if let Some(rows) = result.get("rows").and_then(Value::as_array) {
                    print_schedule(rows, result);
                } else {
                    print_fields(result);
                }
                print_envelope_notes(map);
            } else {
                print_fields(value);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_schedule(rows: &[Value], result: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["#", "Payment", "Principal", "Interest", "Bonus", "Balance"]);

    for row in rows {
        let bonus = row.get("bonus_portion");
        builder.push_record([
            row.get("index").map(|v| v.to_string()).unwrap_or_default(),
            money(row.get("payment_total")),
            money(row.get("principal_portion")),
            money(row.get("interest_portion")),
            if is_zero(bonus) {
                "-".to_string()
            } else {
                money(bonus)
            },
            money(row.get("remaining_balance")),
        ]);
    }

    println!("{}", Table::from(builder));
    println!();
    println!("Periods elapsed: {}", plain(result.get("periods_elapsed")));
    println!("Total paid:      {}", money(result.get("total_paid")));
    println!("Total interest:  {}", money(result.get("total_interest")));
    println!("Total bonus:     {}", money(result.get("total_bonus")));
}

fn print_fields(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.to_string(), money(Some(val))]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
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

/// Round a currency amount to whole units and group the thousands.
/// Non-numeric values fall through unchanged.
fn money(value: Option<&Value>) -> String {
    let Some(v) = value else {
        return String::new();
    };
    match as_decimal(v) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            group_thousands(&rounded.to_string())
        }
        None => plain(Some(v)),
    }
}

fn plain(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn is_zero(value: Option<&Value>) -> bool {
    value
        .and_then(as_decimal)
        .map(|d| d.is_zero())
        .unwrap_or(false)
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, body) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));

    let mut grouped = String::with_capacity(body.len() + body.len() / 3);
    for (i, c) in body.chars().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("84686"), "84,686");
        assert_eq!(group_thousands("30000000"), "30,000,000");
        assert_eq!(group_thousands("512"), "512");
        assert_eq!(group_thousands("-1234"), "-1,234");
    }

    #[test]
    fn test_money_rounds_string_decimals() {
        let v = Value::String("84685.7096".to_string());
        assert_eq!(money(Some(&v)), "84,686");
    }
}
