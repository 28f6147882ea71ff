//! Brazilian social security numbers: CPF for individuals, CNPJ for businesses.

#![deny(clippy::invalid_regex)]

use std::sync::LazyLock;

use common_utils::validation::digit_count;
use masking::Secret;
use regex::Regex;
use router_env::logger;

use crate::{FieldState, InvalidReason, Validation};

const CPF_DIGIT_LIMIT: usize = 11;
const CNPJ_DIGIT_LIMIT: usize = 14;

static CPF_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$")
        .map_err(|_err| logger::error!(?_err))
        .ok()
});

static CNPJ_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$")
        .map_err(|_err| logger::error!(?_err))
        .ok()
});

fn is_match(regex: &LazyLock<Option<Regex>>, input: &str) -> bool {
    regex.as_ref().is_some_and(|regex| regex.is_match(input))
}

/// Validate a CPF (`ddd.ddd.ddd-dd`) or CNPJ (`dd.ddd.ddd/dddd-dd`).
///
/// While fewer digits than the next format needs are typed the field is [`Validation::Partial`].
pub fn validate_social_security_number(input: &str) -> FieldState<Secret<String>> {
    let input = input.trim();
    let invalid = Validation::Invalid(InvalidReason::SocialSecurityNumberInvalid);

    let validation = match digit_count(input) {
        count if count < CPF_DIGIT_LIMIT => Validation::Partial,
        CPF_DIGIT_LIMIT if is_match(&CPF_REGEX, input) => Validation::Valid,
        CPF_DIGIT_LIMIT => invalid,
        count if count < CNPJ_DIGIT_LIMIT => Validation::Partial,
        CNPJ_DIGIT_LIMIT if is_match(&CNPJ_REGEX, input) => Validation::Valid,
        _ => invalid,
    };

    FieldState::new(Secret::new(input.to_string()), validation)
}
