use validator::ValidationError;

/// Fewest digits a client phone may carry.
pub const MIN_PHONE_DIGITS: usize = 8;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Reduce a phone number to the digits used for duplicate matching.
///
/// Strips every non-digit, then one leading `20` country code, then one
/// leading `0`. Lossy on purpose: `+20 010...` and `010...` collapse to the
/// same key. May return an empty string.
pub fn normalize_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.strip_prefix("20").unwrap_or(&digits);
    let digits = digits.strip_prefix('0').unwrap_or(digits);
    digits.to_string()
}

/// Shape check for client phones: only digits, spaces and `+ - ( ) .`,
/// with 8 to 15 digits in total.
pub fn validate_phone(raw: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
    if raw.trim().is_empty() || !raw.chars().all(allowed) {
        return Err(ValidationError::new("phone_shape")
            .with_message("phone number may only contain digits, spaces and + - ( ) .".into()));
    }

    let digit_count = raw.chars().filter(|c| c.is_ascii_digit()).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digit_count) {
        return Err(ValidationError::new("phone_length")
            .with_message("phone number must have between 8 and 15 digits".into()));
    }

    Ok(())
}
