//! User price parsing and currency formatting.
//!
//! Accepts plain decimal amounts with an optional leading `$` and
//! optional `,` grouping: `22000`, `$22,000.50`, `22,000.5`.
//! Anything else (signs, exponents, `inf`, letters) is rejected.

/// Reasons a user-supplied price string is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceInputError {
    #[error("No price supplied")]
    Empty,

    #[error("Not a decimal amount: {0:?}")]
    NotDecimal(String),

    #[error("Amount out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse a user-supplied price such as `$22,000.50`.
pub fn parse_price_input(raw: &str) -> Result<f64, PriceInputError> {
    let trimmed = raw.trim();
    let unprefixed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let digits: String = unprefixed.chars().filter(|c| *c != ',').collect();

    if digits.is_empty() {
        return Err(PriceInputError::Empty);
    }
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(PriceInputError::NotDecimal(raw.to_string()));
    }

    let value: f64 = digits
        .parse()
        .map_err(|_| PriceInputError::NotDecimal(raw.to_string()))?;

    if !value.is_finite() {
        return Err(PriceInputError::OutOfRange(raw.to_string()));
    }
    Ok(value)
}

/// Absolute distance between a user's price and the estimate.
pub fn price_difference(user_price: f64, estimate: f64) -> f64 {
    (estimate - user_price).abs()
}

/// Format as dollars with two decimal places, e.g. `$250.00`.
pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}
