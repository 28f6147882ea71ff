//! Custom validations and input normalisation shared by the card field validators.

use crate::consts::DIGIT_SEPARATORS;

/// Remove every whitespace and `-` separator from the input.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && !DIGIT_SEPARATORS.contains(c))
        .collect()
}

/// Whether the input is non-empty and made of ASCII digits only.
pub fn is_digits_only(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

/// Number of ASCII digits anywhere in the input.
pub fn digit_count(input: &str) -> usize {
    input.chars().filter(char::is_ascii_digit).count()
}

/// Validates the standard mod-10 checksum over a digit string.
///
/// Returns `false` for empty input and for any non-digit character.
pub fn luhn_checksum_passes(number: &str) -> bool {
    let mut sum: u32 = 0;
    for (index, c) in number.chars().rev().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if index % 2 == 1 {
            let doubled = digit * 2;
            if doubled >= 10 {
                doubled - 9
            } else {
                doubled
            }
        } else {
            digit
        };
    }
    !number.is_empty() && sum % 10 == 0
}
