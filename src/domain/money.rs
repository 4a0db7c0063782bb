use std::fmt;

/// Amounts are integer cents to avoid floating-point drift in sums.
/// Entry amounts are magnitudes: always >= 0, with direction carried by
/// the entry type.
pub type Cents = i64;

/// Format cents as a decimal string. Example: 5550 -> "55.50"
pub fn format_cents(cents: Cents) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Parse a decimal magnitude into cents.
/// Example: "40.00" -> 4000, "15.5" -> 1550, "100" -> 10000
///
/// Negative values are rejected (sign belongs to the entry type), as is
/// anything finer than whole cents: silently dropping fractions of a
/// cent would mis-record the ledger.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ParseCentsError::NegativeAmount);
    }

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            let units = parse_digits(parts[0])?;
            units
                .checked_mul(100)
                .ok_or(ParseCentsError::InvalidFormat)
        }
        2 => {
            let units = if parts[0].is_empty() {
                0
            } else {
                parse_digits(parts[0])?
            };

            let decimal_str = parts[1];
            let decimal_cents: i64 = match decimal_str.len() {
                0 => 0,
                // Single digit like "5" means 50 cents
                1 => parse_digits(decimal_str)? * 10,
                2 => parse_digits(decimal_str)?,
                _ => return Err(ParseCentsError::TooManyDecimals),
            };

            units
                .checked_mul(100)
                .and_then(|cents| cents.checked_add(decimal_cents))
                .ok_or(ParseCentsError::InvalidFormat)
        }
        _ => Err(ParseCentsError::InvalidFormat),
    }
}

/// Digits only: `i64::from_str` also accepts a sign character, which
/// would let "1.-5" slip through as 0.95.
fn parse_digits(s: &str) -> Result<i64, ParseCentsError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseCentsError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    NegativeAmount,
    TooManyDecimals,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::NegativeAmount => write!(f, "amount must not be negative"),
            ParseCentsError::TooManyDecimals => {
                write!(f, "amounts are limited to whole cents (two decimal places)")
            }
        }
    }
}

impl std::error::Error for ParseCentsError {}
