use std::fmt;

/// Money is integer cents to keep wallet arithmetic exact.
/// 1 unit = 100 cents, so a deposit of "50.00" is 5000 cents.
pub type Cents = i64;

/// Format cents as a decimal string.
/// Example: 5000 -> "50.00". Negative values keep their sign so outgoing
/// history lines can render as "-12.34".
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse decimal input from a form field or shell argument into cents.
/// Accepts "50", "50.5", "50.00"; rejects signs, empty input, and more than
/// two decimal places. Amounts entering the wallet are never negative, so a
/// leading '-' is an input error rather than a sign.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('+') || input.starts_with('-') {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (units_str, decimal_str) = match input.split_once('.') {
        Some(parts) => parts,
        None => (input, ""),
    };

    let units: i64 = if units_str.is_empty() && !decimal_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let decimal: i64 = match decimal_str.len() {
        0 => 0,
        // "12.5" means 12.50
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        2 => decimal_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
        _ => return Err(ParseCentsError::TooPrecise),
    };

    Ok(units * 100 + decimal)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    TooPrecise,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooPrecise => write!(f, "amounts support at most two decimal places"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
