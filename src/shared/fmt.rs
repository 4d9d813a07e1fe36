//! Display formatting for metric values.

/// Decimal places for a value of this magnitude: none from 100 up, two down
/// to 1.0, and below that enough to reach past the leading zeros (capped
/// at 8).
fn decimals_for(value: f64) -> usize {
    let abs = value.abs();
    if abs >= 100.0 {
        0
    } else if abs >= 1.0 || abs == 0.0 {
        2
    } else {
        (abs.log10().floor().abs() as usize + 2).min(8)
    }
}

/// Format with auto-detected decimal places.
pub fn display(amount: &f64) -> String {
    display_with_decimals(amount, decimals_for(*amount))
}

/// Format with explicit decimal places, trimming trailing fractional zeros
/// and grouping thousands.
pub fn display_with_decimals(amount: &f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, amount);
    let trimmed = match fixed.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{}.{}", int, frac)
            }
        }
        None => fixed,
    };
    group_thousands(&trimmed)
}

fn group_thousands(raw: &str) -> String {
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };

    let mut out = String::from(sign);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a ratio metric (ROI, drawdown) as a signed percentage string.
pub fn display_percent(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{}{}%", sign, display_with_decimals(&value, 2))
}
