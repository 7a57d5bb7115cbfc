use thiserror::Error;

/// Money is represented as integer cents so balance arithmetic stays exact.
/// 1 unit = 100 cents, so 1,250.50 = 125050 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount with thousands separators.
/// Example: 125050 -> "1,250.50", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();
    let remainder = abs_cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{:02}", sign, grouped, remainder)
}

/// Parse a decimal string into cents.
/// Accepts an optional sign, `,` or `_` as thousands separators and at most
/// two decimal places. Example: "1,250.5" -> 125050, "-3" -> -300
pub fn parse_cents(input: &str) -> Result<Cents, MoneyError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return Err(MoneyError::Empty);
    }

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (digits, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(MoneyError::InvalidFormat(input.to_string()));
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(units_str) || !all_digits(decimal_str) {
        return Err(MoneyError::InvalidFormat(input.to_string()));
    }
    if decimal_str.len() > 2 {
        return Err(MoneyError::TooPrecise(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| MoneyError::Overflow(input.to_string()))?
    };
    let fraction: i64 = match decimal_str.len() {
        0 => 0,
        // "5" after the point means 50 cents
        1 => decimal_str.parse::<i64>().unwrap_or(0) * 10,
        _ => decimal_str.parse().unwrap_or(0),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(|| MoneyError::Overflow(input.to_string()))?;

    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{0}', expected something like 1,250.50")]
    InvalidFormat(String),

    #[error("amount '{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("amount '{0}' is too large")]
    Overflow(String),
}
