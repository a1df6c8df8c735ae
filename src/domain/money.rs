use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 currency unit = 100 cents, so 150.00 = 15000 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 15000 -> "150.00", -4000 -> "-40.00"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal string into cents.
/// Example: "150" -> 15000, "2.5" -> 250, "0.01" -> 1.
/// More than two decimal places are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if digits.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (units_str, decimal_str) = match digits.split_once('.') {
        Some((u, d)) => {
            if d.contains('.') {
                return Err(ParseCentsError::InvalidFormat);
            }
            (u, d)
        }
        None => (digits, ""),
    };

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    // Pad or truncate the decimal part to exactly two digits. Truncation
    // must respect char boundaries; anything non-ASCII fails the parse.
    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        _ => decimal_str
            .get(..2)
            .ok_or(ParseCentsError::InvalidFormat)?
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::InvalidFormat)?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
