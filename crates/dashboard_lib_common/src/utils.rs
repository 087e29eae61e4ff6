use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use web3::types::U256;

/// Largest power of ten that still fits in U256 (10^77)
pub const MAX_DECIMALS: u8 = 77;

pub fn datetime_from_u256_timestamp(timestamp: U256) -> Option<DateTime<Utc>> {
    if timestamp > U256::from(i64::MAX as u64) {
        return None;
    }
    DateTime::from_timestamp(timestamp.as_u64() as i64, 0)
}

#[derive(Debug, Clone)]
pub struct ConversionError {
    pub msg: String,
}

impl ConversionError {
    pub fn from(msg: String) -> Self {
        Self { msg }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error during conversion: {}", self.msg)
    }
}

impl Error for ConversionError {
    fn description(&self) -> &str {
        "Conversion error"
    }
}

fn decimal_base(decimals: u8) -> Result<U256, ConversionError> {
    if decimals > MAX_DECIMALS {
        return Err(ConversionError::from(format!(
            "Decimals: {decimals} cannot be greater than {MAX_DECIMALS}"
        )));
    }
    Ok(U256::exp10(decimals as usize))
}

/// Scale a human readable decimal string (i.e. "12.5") into base units.
///
/// Works on the digits directly so no precision is lost for any number of decimals.
/// Input with more fractional digits than `decimals` is rejected instead of rounded.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, ConversionError> {
    let base = decimal_base(decimals)?;
    let input = input.trim();
    if input.is_empty() {
        return Err(ConversionError::from("Amount cannot be empty".to_string()));
    }
    if input.starts_with('-') {
        return Err(ConversionError::from(format!(
            "Amount cannot be negative: {input}"
        )));
    }
    let (int_part, frac_part) = match input.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (input, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ConversionError::from(format!("Invalid amount: {input}")));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ConversionError::from(format!(
            "Amount is not a number: {input}"
        )));
    }
    if frac_part.len() > decimals as usize {
        return Err(ConversionError::from(format!(
            "Amount {input} has more than {decimals} fractional digits"
        )));
    }

    let int_value = if int_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(int_part)
            .map_err(|err| ConversionError::from(format!("Overflow when parsing integer part: {err:?}")))?
    };
    let frac_value = if frac_part.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", frac_part, width = decimals as usize);
        U256::from_dec_str(&padded)
            .map_err(|err| ConversionError::from(format!("Overflow when parsing fractional part: {err:?}")))?
    };

    int_value
        .checked_mul(base)
        .and_then(|scaled| scaled.checked_add(frac_value))
        .ok_or_else(|| ConversionError::from(format!("Overflow when scaling amount {input}")))
}

/// Format base units into a human readable decimal string without trailing zeros
pub fn format_units(amount: U256, decimals: u8) -> Result<String, ConversionError> {
    let base = decimal_base(decimals)?;
    let int_part = amount / base;
    let frac_part = amount % base;
    if frac_part.is_zero() {
        return Ok(int_part.to_string());
    }
    let frac = format!("{:0>width$}", frac_part.to_string(), width = decimals as usize);
    Ok(format!("{}.{}", int_part, frac.trim_end_matches('0')))
}

/// Input layer validation for amounts the user wants to spend
pub fn parse_spend_amount(input: &str, decimals: u8) -> Result<U256, ConversionError> {
    let amount = parse_units(input, decimals)?;
    if amount.is_zero() {
        return Err(ConversionError::from(
            "Amount has to be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

/// Syntax check of a typed amount before the token decimals are known
pub fn validate_amount_input(input: &str) -> Result<(), ConversionError> {
    let fraction_digits = input.trim().split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0);
    let decimals = u8::try_from(fraction_digits)
        .ok()
        .filter(|d| *d <= MAX_DECIMALS)
        .ok_or_else(|| ConversionError::from(format!("Too many fractional digits in {input}")))?;
    parse_spend_amount(input, decimals).map(|_| ())
}
