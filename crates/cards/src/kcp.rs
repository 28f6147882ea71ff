//! Korean KCP authentication fields.

use common_enums::KcpBirthDateOrTaxNumberHint;
use common_utils::validation::{is_digits_only, normalize};
use masking::Secret;
use time::{Date, Month};

use crate::{consts, FieldState, InvalidReason, Validation};

/// Validate the birth date (`yyMMdd`) or the ten digit business tax number.
pub fn validate_birth_date_or_tax_number(input: &str) -> FieldState<Secret<String>> {
    let normalized = normalize(input);
    let is_valid = is_digits_only(&normalized)
        && match normalized.len() {
            consts::KCP_BIRTH_DATE_LENGTH => is_valid_birth_date(&normalized),
            consts::KCP_TAX_NUMBER_LENGTH => true,
            _ => false,
        };

    let validation = if is_valid {
        Validation::Valid
    } else {
        Validation::Invalid(InvalidReason::KcpBirthDateOrTaxNumberInvalid)
    };
    FieldState::new(Secret::new(normalized), validation)
}

/// The password field takes the first two digits of the card password.
pub fn validate_card_password(input: &str) -> FieldState<Secret<String>> {
    let normalized = normalize(input);
    let validation =
        if is_digits_only(&normalized) && normalized.len() == consts::KCP_PASSWORD_LENGTH {
            Validation::Valid
        } else {
            Validation::Invalid(InvalidReason::KcpCardPasswordInvalid)
        };
    FieldState::new(Secret::new(normalized), validation)
}

/// Anything longer than a birth date must be a tax number.
pub fn birth_date_or_tax_number_hint(input: &str) -> KcpBirthDateOrTaxNumberHint {
    if input.chars().count() > consts::KCP_BIRTH_DATE_LENGTH {
        KcpBirthDateOrTaxNumberHint::TaxNumber
    } else {
        KcpBirthDateOrTaxNumberHint::BirthDate
    }
}

fn is_valid_birth_date(yymmdd: &str) -> bool {
    let part = |range: std::ops::Range<usize>| yymmdd.get(range).and_then(|s| s.parse::<u8>().ok());
    let (Some(year), Some(month), Some(day)) = (part(0..2), part(2..4), part(4..6)) else {
        return false;
    };

    // Any century works for the check, 2000 keeps 29 February of `00` valid.
    Month::try_from(month)
        .ok()
        .and_then(|month| Date::from_calendar_date(2000 + i32::from(year), month, day).ok())
        .is_some()
}
