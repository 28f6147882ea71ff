//! Field states produced by the validators.

use serde::Serialize;

/// Why a field value is rejected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvalidReason {
    CardNumberIllegalCharacters,
    CardNumberTooLong,
    CardNumberUnsupportedBrand,
    CardNumberLuhnCheckFailed,
    ExpiryDateInvalid,
    ExpiryDateTooFarInFuture,
    ExpiryDateTooOld,
    SecurityCodeInvalid,
    HolderNameRequired,
    SocialSecurityNumberInvalid,
    KcpBirthDateOrTaxNumberInvalid,
    KcpCardPasswordInvalid,
    AddressFieldRequired,
}

impl InvalidReason {
    /// Errors that are shown while the shopper is still editing the field.
    pub fn show_error_while_editing(self) -> bool {
        matches!(
            self,
            Self::CardNumberIllegalCharacters
                | Self::CardNumberTooLong
                | Self::CardNumberUnsupportedBrand
        )
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum Validation {
    #[default]
    Valid,
    Invalid(InvalidReason),
    /// Incomplete input that can still become valid. Neither an error nor submittable.
    Partial,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Invalid(reason) => Some(*reason),
            Self::Valid | Self::Partial => None,
        }
    }

    /// Whether the UI shows the error while the field still has focus.
    pub fn show_error_while_editing(&self) -> bool {
        self.invalid_reason()
            .is_some_and(InvalidReason::show_error_while_editing)
    }
}

/// A field value together with its validation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FieldState<T> {
    pub value: T,
    pub validation: Validation,
}

impl<T> FieldState<T> {
    pub fn new(value: T, validation: Validation) -> Self {
        Self { value, validation }
    }

    pub fn valid(value: T) -> Self {
        Self::new(value, Validation::Valid)
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }
}
