//! Building the outbound payment payload from a validated [`CardOutputData`].

use std::sync::Arc;

use cards::{consts, CardBrand, CardNumber, DetectedCardType, ExpiryDate};
use common_enums::FundingSource;
use error_stack::{Report, ResultExt};
use masking::{PeekInterface, Secret};
use router_env::{logger, types::Tag};
use serde::Serialize;

use crate::{
    address::{self, Address},
    configuration::{Amount, CardComponentParams},
    consts::{ENCRYPTION_KEY_FOR_KCP_PASSWORD, PAYMENT_METHOD_TYPE_SCHEME},
    dual_brand::DualBrandData,
    errors::{CardComponentError, CustomResult},
    installments::{self, Installments},
    services::{CardEncryptor, EncryptedCard, GenericEncryptor, UnencryptedCard},
    types::CardOutputData,
};

/// Card payment method of the payment request. Card fields are only ever sent encrypted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentMethod {
    #[serde(rename = "type")]
    pub payment_method_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_card_number: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_expiry_month: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_expiry_year: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_security_code: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_source: Option<FundingSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_payment_method_id: Option<String>,
}

impl CardPaymentMethod {
    pub(crate) fn scheme() -> Self {
        Self {
            payment_method_type: PAYMENT_METHOD_TYPE_SCHEME.to_string(),
            ..Self::default()
        }
    }
}

/// Payment request data produced by the component. Empty while the form is not submittable.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentComponentData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<CardPaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_payment_method: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopper_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_security_number: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<Installments>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardComponentState {
    pub data: PaymentComponentData,
    pub is_input_valid: bool,
    /// The encryption public key is available.
    pub is_ready: bool,
    pub card_brand: Option<CardBrand>,
    pub bin_value: String,
    pub last_four_digits: Option<String>,
}

impl CardComponentState {
    pub fn is_valid(&self) -> bool {
        self.is_input_valid && self.is_ready
    }

    /// Placeholder state that carries no card data.
    pub(crate) fn empty(
        is_input_valid: bool,
        is_ready: bool,
        card_brand: Option<CardBrand>,
        bin_value: String,
    ) -> Self {
        Self {
            data: PaymentComponentData::default(),
            is_input_valid,
            is_ready,
            card_brand,
            bin_value,
            last_four_digits: None,
        }
    }
}

/// A built state, together with the encryption failure it was degraded by, if any.
pub type StateBuildResult = (CardComponentState, Option<Report<CardComponentError>>);

/// Builds [`CardComponentState`]s with the injected encryptors.
#[derive(Clone)]
pub struct ComponentStateBuilder {
    params: Arc<CardComponentParams>,
    card_encryptor: Arc<dyn CardEncryptor>,
    generic_encryptor: Arc<dyn GenericEncryptor>,
}

impl std::fmt::Debug for ComponentStateBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStateBuilder")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ComponentStateBuilder {
    pub fn new(
        params: Arc<CardComponentParams>,
        card_encryptor: Arc<dyn CardEncryptor>,
        generic_encryptor: Arc<dyn GenericEncryptor>,
    ) -> Self {
        Self {
            params,
            card_encryptor,
            generic_encryptor,
        }
    }

    /// Without a public key or with invalid input the state carries no payload. An encryption
    /// failure marks the input invalid and is returned next to the state.
    pub fn build(
        &self,
        output: &CardOutputData,
        public_key: Option<&Secret<String>>,
    ) -> StateBuildResult {
        let card_number = &output.card_number_state.value;
        let card_brand = output
            .dual_brand_data
            .as_ref()
            .and_then(|dual_brand_data| dual_brand_data.selected_brand.clone())
            .or_else(|| {
                output
                    .detected_card_types
                    .first()
                    .map(|detected| detected.card_brand.clone())
            });
        let bin_value = bin_value(card_number, output.card_number_state.is_valid());

        let Some(public_key) = public_key.filter(|_| output.is_valid()) else {
            return (
                CardComponentState::empty(output.is_valid(), public_key.is_some(), card_brand, bin_value),
                None,
            );
        };

        match self.payment_component_data(output, public_key) {
            Ok(data) => (
                CardComponentState {
                    data,
                    is_input_valid: true,
                    is_ready: true,
                    card_brand,
                    bin_value,
                    last_four_digits: Some(card_number.get_last4()),
                },
                None,
            ),
            Err(error) => {
                logger::error!(tag = %Tag::Encryption, ?error, "card encryption failed");
                (
                    CardComponentState::empty(false, true, card_brand, bin_value),
                    Some(error),
                )
            }
        }
    }

    fn payment_component_data(
        &self,
        output: &CardOutputData,
        public_key: &Secret<String>,
    ) -> CustomResult<PaymentComponentData, CardComponentError> {
        let encrypted_card = self.encrypt_card(output, public_key)?;

        let mut payment_method = CardPaymentMethod {
            encrypted_card_number: encrypted_card.encrypted_card_number,
            encrypted_expiry_month: encrypted_card.encrypted_expiry_month,
            encrypted_expiry_year: encrypted_card.encrypted_expiry_year,
            encrypted_security_code: encrypted_card
                .encrypted_security_code
                .filter(|_| !output.is_cvc_hidden()),
            holder_name: self
                .params
                .is_holder_name_required
                .then(|| output.holder_name_state.value.clone()),
            brand: payload_brand(&output.detected_card_types, output.dual_brand_data.as_ref()),
            funding_source: Some(self.params.funding_source),
            ..CardPaymentMethod::scheme()
        };

        if output.is_kcp_auth_required {
            payment_method.encrypted_password = Some(
                self.generic_encryptor
                    .encrypt_field(
                        ENCRYPTION_KEY_FOR_KCP_PASSWORD,
                        &output.kcp_card_password_state.value,
                        public_key,
                    )
                    .change_context(CardComponentError::EncryptionFailed)?,
            );
            payment_method.tax_number = Some(output.kcp_birth_date_or_tax_number_state.value.clone());
        }

        Ok(PaymentComponentData {
            payment_method: Some(payment_method),
            store_payment_method: output
                .show_store_payment_field
                .then_some(output.should_store_payment_method),
            shopper_reference: self.params.shopper_reference.clone(),
            amount: self.params.amount.clone(),
            social_security_number: output
                .is_social_security_number_required
                .then(|| output.social_security_number_state.value.clone()),
            billing_address: address::make_address_data(&output.address_state, output.address_ui_state),
            installments: if output.installment_options.is_empty() {
                None
            } else {
                installments::make_installment_model_object(output.installment_state.value.as_ref())
            },
        })
    }

    fn encrypt_card(
        &self,
        output: &CardOutputData,
        public_key: &Secret<String>,
    ) -> CustomResult<EncryptedCard, CardComponentError> {
        let security_code = &output.security_code_state.value;
        let expiry_date = output.expiry_date_state.value;

        let card = UnencryptedCard {
            number: Some(output.card_number_state.value.clone()),
            cvc: (!output.is_cvc_hidden() && !security_code.peek().is_empty())
                .then(|| security_code.clone()),
            ..expiry_fields(expiry_date)
        };

        self.card_encryptor
            .encrypt_fields(&card, public_key)
            .change_context(CardComponentError::EncryptionFailed)
    }
}

pub(crate) fn expiry_fields(expiry_date: ExpiryDate) -> UnencryptedCard {
    if expiry_date == ExpiryDate::EMPTY_DATE {
        return UnencryptedCard::default();
    }

    UnencryptedCard {
        expiry_month: Some(Secret::new(expiry_date.month.to_string())),
        expiry_year: Some(Secret::new(expiry_date.year.to_string())),
        ..UnencryptedCard::default()
    }
}

/// First 8 digits of a valid card number longer than 16 digits, else the first 6.
pub fn bin_value(card_number: &CardNumber, is_valid: bool) -> String {
    if is_valid && card_number.len() > consts::EXTENDED_BIN_CARD_NUMBER_LENGTH {
        card_number.get_extended_card_bin()
    } else {
        card_number.get_card_isin()
    }
}

/// Brand sent with the payment: the shopper's choice on a co-badged card, else the first reliable
/// brand, else the first detected one.
fn payload_brand(
    detected_card_types: &[DetectedCardType],
    dual_brand_data: Option<&DualBrandData>,
) -> Option<String> {
    match dual_brand_data {
        Some(dual_brand_data) => dual_brand_data
            .selected_brand
            .as_ref()
            .map(ToString::to_string),
        None => detected_card_types
            .iter()
            .find(|detected| detected.is_reliable)
            .or_else(|| detected_card_types.first())
            .map(|detected| detected.card_brand.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use common_enums::CardType;
    use test_case::test_case;

    use super::*;

    #[test_case("4111111111111111", true => "411111" ; "sixteen digits")]
    #[test_case("41111111111111111", true => "41111111" ; "seventeen digits")]
    #[test_case("41111111111111111", false => "411111" ; "invalid long number")]
    #[test_case("4111", false => "4111" ; "short number")]
    fn bin_length_follows_card_number(number: &str, is_valid: bool) -> String {
        bin_value(&CardNumber::new(number), is_valid)
    }

    #[test]
    fn empty_expiry_is_not_encrypted() {
        assert_eq!(expiry_fields(ExpiryDate::EMPTY_DATE), UnencryptedCard::default());
        let fields = expiry_fields(ExpiryDate::new(3, 2030));
        assert_eq!(fields.expiry_month, Some(Secret::new("3".to_string())));
        assert_eq!(fields.expiry_year, Some(Secret::new("2030".to_string())));
    }

    #[test]
    fn payload_brand_prefers_reliable() {
        let unreliable = DetectedCardType::estimated(CardType::CarteBancaire, false, true);
        let reliable = DetectedCardType::estimated(CardType::Visa, true, true);
        assert_eq!(
            payload_brand(&[unreliable.clone(), reliable], None),
            Some("visa".to_string())
        );
        assert_eq!(
            payload_brand(&[unreliable], None),
            Some("cartebancaire".to_string())
        );

        let not_selectable = DualBrandData {
            selected_brand: None,
            brand_options: Vec::new(),
            selectable: false,
        };
        assert_eq!(payload_brand(&[], Some(&not_selectable)), None);
    }
}
