//! Collaborators the card component depends on.
//!
//! Network access and field encryption are provided by the integrating application. The
//! component only relies on the contracts below.

use cards::{CardBrand, CardNumber, DetectedCardType};
use common_enums::{Environment, FieldPolicy};
use futures::stream::BoxStream;
use masking::Secret;
use serde::{Deserialize, Serialize};

use crate::{
    address::AddressItem,
    errors::{ApiError, CustomResult, EncryptionError},
};

/// Supplies the client encryption public key.
#[async_trait::async_trait]
pub trait PublicKeyRepository: Send + Sync {
    async fn fetch_public_key(
        &self,
        environment: Environment,
        client_key: &Secret<String>,
    ) -> CustomResult<Secret<String>, ApiError>;
}

/// Detection results for one card number.
///
/// The stream may yield a local estimate followed by a confirmed result. An `Err` item means the
/// detection failed, the component then continues without detected brands.
pub type DetectedCardTypesStream =
    BoxStream<'static, CustomResult<Vec<DetectedCardType>, ApiError>>;

pub trait DetectCardTypeRepository: Send + Sync {
    fn detect_card_type(
        &self,
        card_number: &CardNumber,
        public_key: Option<&Secret<String>>,
        supported_card_brands: &[CardBrand],
        environment: Environment,
        client_key: &Secret<String>,
    ) -> DetectedCardTypesStream;
}

/// Country and state lists of the full address form.
#[async_trait::async_trait]
pub trait AddressRepository: Send + Sync {
    async fn get_country_list(
        &self,
        shopper_locale: &str,
        environment: Environment,
    ) -> CustomResult<Vec<AddressItem>, ApiError>;

    async fn get_state_list(
        &self,
        shopper_locale: &str,
        environment: Environment,
        country_code: &str,
    ) -> CustomResult<Vec<AddressItem>, ApiError>;
}

/// Card fields handed to the encryptor. Fields left `None` are not encrypted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnencryptedCard {
    pub number: Option<CardNumber>,
    pub expiry_month: Option<Secret<String>>,
    pub expiry_year: Option<Secret<String>>,
    pub cvc: Option<Secret<String>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EncryptedCard {
    pub encrypted_card_number: Option<Secret<String>>,
    pub encrypted_expiry_month: Option<Secret<String>>,
    pub encrypted_expiry_year: Option<Secret<String>>,
    pub encrypted_security_code: Option<Secret<String>>,
}

/// Encrypts card fields with the client encryption public key.
pub trait CardEncryptor: Send + Sync {
    fn encrypt_fields(
        &self,
        card: &UnencryptedCard,
        public_key: &Secret<String>,
    ) -> CustomResult<EncryptedCard, EncryptionError>;

    /// Encrypts the BIN sent to the BIN lookup.
    fn encrypt_bin(
        &self,
        bin: &str,
        public_key: &Secret<String>,
    ) -> CustomResult<Secret<String>, EncryptionError>;
}

/// Encrypts a single named field.
pub trait GenericEncryptor: Send + Sync {
    fn encrypt_field(
        &self,
        field_key: &str,
        value: &Secret<String>,
        public_key: &Secret<String>,
    ) -> CustomResult<Secret<String>, EncryptionError>;
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLookupRequest {
    pub encrypted_bin: Secret<String>,
    pub request_id: String,
    pub supported_brands: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BinLookupResponse {
    #[serde(default)]
    pub brands: Vec<BinLookupBrand>,
    pub request_id: Option<String>,
    pub issuing_country_code: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BinLookupBrand {
    pub brand: Option<String>,
    pub enable_luhn_check: Option<bool>,
    pub supported: Option<bool>,
    pub cvc_policy: Option<FieldPolicy>,
    pub expiry_date_policy: Option<FieldPolicy>,
    pub pan_length: Option<usize>,
    pub payment_method_variant: Option<String>,
    pub localized_brand: Option<String>,
}

impl BinLookupBrand {
    /// A confirmed detection. Missing policies are required, a missing `supported` flag means
    /// the brand is supported and the Luhn check only applies when the lookup asks for it.
    pub fn into_detected_card_type(self) -> Option<DetectedCardType> {
        let card_brand = CardBrand::new(self.brand?);
        Some(DetectedCardType {
            card_brand,
            is_reliable: true,
            enable_luhn_check: self.enable_luhn_check.unwrap_or(false),
            cvc_policy: self.cvc_policy.unwrap_or_default(),
            expiry_date_policy: self.expiry_date_policy.unwrap_or_default(),
            is_supported: self.supported.unwrap_or(true),
            pan_length: self.pan_length,
            payment_method_variant: self.payment_method_variant,
            localized_brand: self.localized_brand,
            is_selected: false,
        })
    }
}

/// Calls the BIN lookup endpoint.
#[async_trait::async_trait]
pub trait BinLookupService: Send + Sync {
    async fn make_bin_lookup(
        &self,
        request: BinLookupRequest,
        environment: Environment,
        client_key: &Secret<String>,
    ) -> CustomResult<BinLookupResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn bin_lookup_defaults() {
        let response = serde_json::from_str::<BinLookupResponse>(
            r#"{"brands":[{"brand":"visa","cvcPolicy":"optional","enableLuhnCheck":true},{"enableLuhnCheck":false}]}"#,
        )
        .unwrap();

        let detected = response
            .brands
            .into_iter()
            .filter_map(BinLookupBrand::into_detected_card_type)
            .collect::<Vec<_>>();
        assert_eq!(detected.len(), 1);
        let visa = detected.first().unwrap();
        assert!(visa.is_reliable);
        assert!(visa.is_supported);
        assert!(visa.enable_luhn_check);
        assert_eq!(visa.cvc_policy, FieldPolicy::Optional);
        assert_eq!(visa.expiry_date_policy, FieldPolicy::Required);
    }

    #[test]
    fn luhn_check_is_opt_in() {
        let brand = BinLookupBrand {
            brand: Some("mc".to_string()),
            ..BinLookupBrand::default()
        };
        let detected = brand.into_detected_card_type().unwrap();
        assert!(!detected.enable_luhn_check);
    }
}
