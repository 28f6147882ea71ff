//! Input and output snapshots of the card form.

use cards::{CardBrand, CardNumber, DetectedCardType, ExpiryDate, FieldState};
use common_enums::{AddressFormUiState, InputFieldUiState, KcpBirthDateOrTaxNumberHint};
use masking::Secret;
use serde::Serialize;

use crate::{
    address::{AddressInputModel, AddressOutputData},
    dual_brand::DualBrandData,
    installments::InstallmentModel,
};

/// Raw shopper input. Owned by the form and only read through a shared borrow while reducing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardInputData {
    pub card_number: CardNumber,
    pub expiry_date: ExpiryDate,
    pub security_code: Secret<String>,
    pub holder_name: Secret<String>,
    pub social_security_number: Secret<String>,
    pub kcp_birth_date_or_tax_number: Secret<String>,
    pub kcp_card_password: Secret<String>,
    pub address: AddressInputModel,
    pub is_storing_payment_method_selected: bool,
    /// Brand picked by the shopper on a co-badged card.
    pub selected_card_brand: Option<CardBrand>,
    pub installment_option: Option<InstallmentModel>,
}

/// A single field update of [`CardInputData`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CardInputUpdate {
    CardNumber(CardNumber),
    ExpiryDate(ExpiryDate),
    SecurityCode(Secret<String>),
    HolderName(Secret<String>),
    SocialSecurityNumber(Secret<String>),
    KcpBirthDateOrTaxNumber(Secret<String>),
    KcpCardPassword(Secret<String>),
    Address(AddressInputModel),
    StorePaymentMethod(bool),
    SelectedCardBrand(Option<CardBrand>),
    InstallmentOption(Option<InstallmentModel>),
}

impl CardInputUpdate {
    pub fn apply(self, input: &mut CardInputData) {
        match self {
            Self::CardNumber(card_number) => input.card_number = card_number,
            Self::ExpiryDate(expiry_date) => input.expiry_date = expiry_date,
            Self::SecurityCode(security_code) => input.security_code = security_code,
            Self::HolderName(holder_name) => input.holder_name = holder_name,
            Self::SocialSecurityNumber(number) => input.social_security_number = number,
            Self::KcpBirthDateOrTaxNumber(value) => input.kcp_birth_date_or_tax_number = value,
            Self::KcpCardPassword(password) => input.kcp_card_password = password,
            Self::Address(address) => input.address = address,
            Self::StorePaymentMethod(selected) => input.is_storing_payment_method_selected = selected,
            Self::SelectedCardBrand(card_brand) => input.selected_card_brand = card_brand,
            Self::InstallmentOption(option) => input.installment_option = option,
        }
    }
}

/// Supported brand shown in the brand list of the form.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct CardListItem {
    pub card_brand: CardBrand,
    pub is_detected: bool,
}

/// Validated state of the whole form, replaced on every reduction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CardOutputData {
    pub card_number_state: FieldState<CardNumber>,
    pub expiry_date_state: FieldState<ExpiryDate>,
    pub security_code_state: FieldState<Secret<String>>,
    pub holder_name_state: FieldState<Secret<String>>,
    pub social_security_number_state: FieldState<Secret<String>>,
    pub kcp_birth_date_or_tax_number_state: FieldState<Secret<String>>,
    pub kcp_card_password_state: FieldState<Secret<String>>,
    pub address_state: AddressOutputData,
    pub installment_state: FieldState<Option<InstallmentModel>>,
    pub should_store_payment_method: bool,
    pub cvc_ui_state: InputFieldUiState,
    pub expiry_date_ui_state: InputFieldUiState,
    pub holder_name_ui_state: InputFieldUiState,
    pub show_store_payment_field: bool,
    /// Detected brands the merchant supports.
    pub detected_card_types: Vec<DetectedCardType>,
    pub is_social_security_number_required: bool,
    pub is_kcp_auth_required: bool,
    pub address_ui_state: AddressFormUiState,
    pub installment_options: Vec<InstallmentModel>,
    pub card_brands: Vec<CardListItem>,
    pub is_card_list_visible: bool,
    pub kcp_birth_date_or_tax_number_hint: KcpBirthDateOrTaxNumberHint,
    pub dual_brand_data: Option<DualBrandData>,
}

impl CardOutputData {
    /// Every collected field is valid. Fields that are not collected are always valid.
    pub fn is_valid(&self) -> bool {
        self.card_number_state.is_valid()
            && self.expiry_date_state.is_valid()
            && self.security_code_state.is_valid()
            && self.holder_name_state.is_valid()
            && self.social_security_number_state.is_valid()
            && self.kcp_birth_date_or_tax_number_state.is_valid()
            && self.kcp_card_password_state.is_valid()
            && self.installment_state.is_valid()
            && self.address_state.is_valid()
    }

    pub fn is_cvc_hidden(&self) -> bool {
        self.cvc_ui_state.is_hidden()
    }
}

/// Brand detection result reported to the BIN lookup observer.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLookupData {
    pub brand: String,
    pub payment_method_variant: Option<String>,
    pub is_reliable: bool,
}

impl From<&DetectedCardType> for BinLookupData {
    fn from(detected: &DetectedCardType) -> Self {
        Self {
            brand: detected.card_brand.to_string(),
            payment_method_variant: detected.payment_method_variant.clone(),
            is_reliable: detected.is_reliable,
        }
    }
}

#[cfg(test)]
mod tests {
    use masking::PeekInterface;

    use super::*;

    #[test]
    fn update_replaces_one_field() {
        let mut input = CardInputData::default();
        CardInputUpdate::CardNumber(CardNumber::new("4111 1111 1111 1111")).apply(&mut input);
        CardInputUpdate::SecurityCode(Secret::new("737".to_string())).apply(&mut input);

        assert_eq!(input.card_number.peek(), "4111111111111111");
        assert_eq!(input.security_code.peek(), "737");
        assert_eq!(input.expiry_date, ExpiryDate::EMPTY_DATE);
    }

    #[test]
    fn debug_output_does_not_leak_card_data() {
        let mut input = CardInputData::default();
        CardInputUpdate::CardNumber(CardNumber::new("4111111111111111")).apply(&mut input);
        CardInputUpdate::SecurityCode(Secret::new("737".to_string())).apply(&mut input);

        let debug = format!("{input:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("737"));
    }
}
