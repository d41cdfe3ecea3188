//! Number formatting for terminal tables

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `$1,234.56`, negative values as `-$1,234.56`
pub fn format_currency(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && total_cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(total_cents / 100),
        total_cents % 100
    )
}

/// `$1,235` with no cents, for wide columns
pub fn format_currency_short(value: f64) -> String {
    let whole = value.abs().round() as u64;
    let sign = if value < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(whole))
}

/// Fraction as a percentage with two decimals
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Percentile label such as `P5` or `P50`
pub fn format_percentile_label(p: f64) -> String {
    format!("P{}", (p * 100.0).round() as u32)
}
