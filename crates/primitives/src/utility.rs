use rust_decimal::Decimal;
use validator::ValidationError;

const MIN_MSISDN_LEN: usize = 10;
const MAX_MSISDN_LEN: usize = 13;

/// Amounts are stored as `NUMERIC(10, 2)`.
const MAX_AMOUNT_SCALE: u32 = 2;
const MAX_AMOUNT_EXCLUSIVE: i64 = 100_000_000;

/// Accepts digits only, with an optional leading `+`, e.g. `254708374149`.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    if digits.len() < MIN_MSISDN_LEN || digits.len() > MAX_MSISDN_LEN {
        return Err(error("phone_number_length"));
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(error("phone_number_invalid_character"));
    }

    Ok(())
}

pub fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("amount_not_positive")
            .with_message("Amount must be greater than zero".into()));
    }

    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ValidationError::new("amount_too_precise")
            .with_message("Amount cannot have more than two decimal places".into()));
    }

    if *amount >= Decimal::from(MAX_AMOUNT_EXCLUSIVE) {
        let mut err = ValidationError::new("amount_too_large")
            .with_message("Amount is too large".into());
        err.add_param("max_exclusive".into(), &MAX_AMOUNT_EXCLUSIVE);
        return Err(err);
    }

    Ok(())
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Must not be blank".into()));
    }
    Ok(())
}

/// Daraja wants the MSISDN without the `+`.
pub fn normalize_phone_number(phone: &str) -> String {
    phone.trim().trim_start_matches('+').to_string()
}

fn error(code: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.add_param("min_length".into(), &MIN_MSISDN_LEN);
    err.add_param("max_length".into(), &MAX_MSISDN_LEN);
    err
}
