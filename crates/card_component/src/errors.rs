//! Errors raised by the card component.
//!
//! Field validation never fails with an error, it produces `Validation::Invalid` or
//! `Validation::Partial`. The types here cover integrator mistakes and collaborator failures.

pub use common_utils::errors::CustomResult;

/// Invalid merchant configuration, raised when the configuration is constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Client key must not be empty")]
    MissingClientKey,
    #[error("Client key does not match the {environment} environment")]
    InvalidClientKey { environment: String },
    #[error("Installment values must be greater than 1, found {value}")]
    InvalidInstallmentValue { value: u32 },
    #[error("Installment options are defined more than once for card brand {card_brand}")]
    DuplicateInstallmentCardBrand { card_brand: String },
    #[error("Unknown card brand in configuration: {tx_variant}")]
    UnknownCardBrand { tx_variant: String },
    #[error("Failed to load settings")]
    SettingsLoadFailed,
}

/// Errors published on the component error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CardComponentError {
    #[error("Unable to fetch the encryption public key")]
    PublicKeyFetchFailed,
    #[error("Unable to detect the card type")]
    CardTypeDetectionFailed,
    #[error("Unable to fetch the address list")]
    AddressListFetchFailed,
    #[error("Failed to encrypt the card fields")]
    EncryptionFailed,
    #[error("Encryption public key is not available")]
    MissingPublicKey,
    #[error("Card input is not valid")]
    InvalidInput,
}

/// Returned by the opaque field encryptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncryptionError {
    #[error("Encryption public key is malformed")]
    InvalidPublicKey,
    #[error("Failed to encrypt field {field}")]
    FieldEncryptionFailed { field: &'static str },
}

/// Returned by the network collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed")]
    RequestFailed { endpoint: &'static str },
    #[error("Failed to deserialize the response of {endpoint}")]
    ResponseDeserializationFailed { endpoint: &'static str },
    #[error("Failed to encrypt the request")]
    RequestEncryptionFailed,
}

pub type CardComponentResult<T> = CustomResult<T, CardComponentError>;
