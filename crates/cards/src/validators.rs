//! Validators for the card fields.
//!
//! Every validator is a total function of its inputs. Calendar checks take the current date as
//! an argument in their `_at` variant.

use common_enums::{CardType, FieldPolicy, InputFieldUiState};
use common_utils::{date_time, validation as utils};
use masking::{PeekInterface, Secret};
use time::{Date, Month};

use crate::{consts, CardNumber, ExpiryDate, FieldState, InvalidReason, Validation};

/// Validate a card number.
///
/// Checks in order: illegal characters, too long, too short, unsupported brand, Luhn checksum.
/// A short number or a failed checksum below `max_length` is [`Validation::Partial`], the
/// shopper may still be typing. `max_length` defaults to the longest card number.
pub fn validate_card_number(
    raw_number: &str,
    enable_luhn_check: bool,
    is_brand_supported: bool,
    max_length: Option<usize>,
) -> FieldState<CardNumber> {
    let card_number = CardNumber::new(raw_number);
    let number = card_number.peek();
    let length = card_number.len();
    let max_length = max_length
        .unwrap_or(consts::MAXIMUM_CARD_NUMBER_LENGTH)
        .min(consts::MAXIMUM_CARD_NUMBER_LENGTH);

    let validation = if !number.chars().all(|c| c.is_ascii_digit()) {
        Validation::Invalid(InvalidReason::CardNumberIllegalCharacters)
    } else if length > consts::MAXIMUM_CARD_NUMBER_LENGTH {
        Validation::Invalid(InvalidReason::CardNumberTooLong)
    } else if length < consts::MINIMUM_CARD_NUMBER_LENGTH {
        Validation::Partial
    } else if !is_brand_supported {
        Validation::Invalid(InvalidReason::CardNumberUnsupportedBrand)
    } else if !enable_luhn_check || utils::luhn_checksum_passes(number) {
        Validation::Valid
    } else if length >= max_length {
        Validation::Invalid(InvalidReason::CardNumberLuhnCheckFailed)
    } else {
        Validation::Partial
    };

    FieldState::new(card_number, validation)
}

/// Validate an expiry date against today's date.
pub fn validate_expiry_date(
    expiry_date: ExpiryDate,
    policy: Option<FieldPolicy>,
) -> FieldState<ExpiryDate> {
    validate_expiry_date_at(expiry_date, policy, date_time::today())
}

/// Validate an expiry date against `today`.
///
/// The accepted window runs from three months in the past up to thirty years in the future.
/// An absent date is valid when the brand makes the field optional or hidden. A month outside
/// 1..=12 or a year below 1 is invalid whatever the policy.
pub fn validate_expiry_date_at(
    expiry_date: ExpiryDate,
    policy: Option<FieldPolicy>,
    today: Date,
) -> FieldState<ExpiryDate> {
    let invalid = Validation::Invalid(InvalidReason::ExpiryDateInvalid);

    let validation = if expiry_date.exists() {
        match expiry_date.last_day() {
            Some(last_day) => {
                let in_max_year_range =
                    expiry_date.year <= today.year() + consts::MAXIMUM_YEARS_IN_FUTURE;
                let in_min_month_range = months_before(today, consts::MAXIMUM_EXPIRED_MONTHS)
                    .is_some_and(|max_past| last_day >= max_past);

                match (in_max_year_range, in_min_month_range) {
                    (true, true) => Validation::Valid,
                    (false, _) => Validation::Invalid(InvalidReason::ExpiryDateTooFarInFuture),
                    (true, false) => Validation::Invalid(InvalidReason::ExpiryDateTooOld),
                }
            }
            None => invalid,
        }
    } else if expiry_date == ExpiryDate::EMPTY_DATE
        && matches!(policy, Some(FieldPolicy::Optional | FieldPolicy::Hidden))
    {
        Validation::Valid
    } else {
        invalid
    };

    FieldState::new(expiry_date, validation)
}

/// Same day `months` months earlier, clamped to the end of a shorter month.
fn months_before(date: Date, months: i32) -> Option<Date> {
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months;
    let year = month_index.div_euclid(12);
    let month = Month::try_from(u8::try_from(month_index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).ok()
}

/// Validate a security code for a brand, given the current state of the field.
///
/// A hidden field is not collected and always valid. American Express codes have four digits,
/// every other brand three.
pub fn validate_security_code(
    security_code: &str,
    card_type: Option<CardType>,
    ui_state: InputFieldUiState,
) -> FieldState<Secret<String>> {
    let normalized = utils::normalize(security_code);
    let length = normalized.chars().count();

    let validation = if ui_state.is_hidden() {
        Validation::Valid
    } else if !normalized.chars().all(|c| c.is_ascii_digit()) {
        Validation::Invalid(InvalidReason::SecurityCodeInvalid)
    } else if ui_state == InputFieldUiState::Optional && length == 0 {
        Validation::Valid
    } else {
        let expected_length = if card_type.is_some_and(CardType::has_four_digit_security_code) {
            consts::AMEX_SECURITY_CODE_SIZE
        } else {
            consts::GENERAL_CARD_SECURITY_CODE_SIZE
        };
        if length == expected_length {
            Validation::Valid
        } else {
            Validation::Invalid(InvalidReason::SecurityCodeInvalid)
        }
    };

    FieldState::new(Secret::new(normalized), validation)
}

/// A holder name is only rejected when it is required and blank.
pub fn validate_holder_name(holder_name: &str, is_required: bool) -> FieldState<Secret<String>> {
    let validation = if is_required && holder_name.trim().is_empty() {
        Validation::Invalid(InvalidReason::HolderNameRequired)
    } else {
        Validation::Valid
    };

    FieldState::new(Secret::new(holder_name.to_string()), validation)
}
