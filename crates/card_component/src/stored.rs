//! Payment with a card the shopper stored earlier. Only the security code is collected.

use std::sync::Arc;

use cards::{validators, CardBrand, CardNumber, DetectedCardType, ExpiryDate, FieldState};
use common_enums::{
    AddressFormUiState, CardType, FieldPolicy, InputFieldUiState, KcpBirthDateOrTaxNumberHint,
};
use error_stack::{Report, ResultExt};
use masking::{PeekInterface, Secret};
use router_env::{logger, types::Tag};
use serde::Deserialize;

use crate::{
    address::AddressOutputData,
    component_state::{CardComponentState, CardPaymentMethod, PaymentComponentData},
    configuration::CardComponentParams,
    errors::{CardComponentError, CustomResult},
    reducer,
    services::{CardEncryptor, UnencryptedCard},
    types::CardOutputData,
};

/// Stored card as returned by the payment methods call.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPaymentMethod {
    pub id: String,
    pub brand: Option<String>,
    pub last_four: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub holder_name: Option<String>,
}

impl StoredPaymentMethod {
    /// `EMPTY_DATE` when the stored month or year cannot be parsed.
    fn expiry_date(&self) -> ExpiryDate {
        let month = self.expiry_month.as_deref().map(str::parse::<i32>);
        let year = self.expiry_year.as_deref().map(str::parse::<i32>);
        match (month, year) {
            (Some(Ok(month)), Some(Ok(year))) => ExpiryDate::new(month, year),
            _ => {
                logger::error!(tag = %Tag::General, "failed to parse stored expiry date");
                ExpiryDate::EMPTY_DATE
            }
        }
    }
}

/// Drives the form of a stored card. Every change rebuilds the output and the state at once.
pub struct StoredCardDelegate {
    params: Arc<CardComponentParams>,
    stored_payment_method: StoredPaymentMethod,
    detected_card_type: DetectedCardType,
    card_encryptor: Arc<dyn CardEncryptor>,
    public_key: Option<Secret<String>>,
    security_code: Secret<String>,
    output_data: CardOutputData,
    component_state: CardComponentState,
    errors: Vec<Report<CardComponentError>>,
}

impl std::fmt::Debug for StoredCardDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCardDelegate")
            .field("stored_payment_method_id", &self.stored_payment_method.id)
            .field("output_data", &self.output_data)
            .field("component_state", &self.component_state)
            .finish_non_exhaustive()
    }
}

impl StoredCardDelegate {
    pub fn new(
        params: Arc<CardComponentParams>,
        stored_payment_method: StoredPaymentMethod,
        card_encryptor: Arc<dyn CardEncryptor>,
    ) -> Self {
        let card_brand = CardBrand::new(stored_payment_method.brand.clone().unwrap_or_default());
        let cvc_policy = if params.stored_cvc_hidden || card_brand.card_type() == Some(CardType::Bcmc)
        {
            FieldPolicy::Hidden
        } else {
            FieldPolicy::Required
        };
        let detected_card_type = DetectedCardType {
            card_brand,
            is_reliable: true,
            enable_luhn_check: true,
            cvc_policy,
            expiry_date_policy: FieldPolicy::Required,
            is_supported: true,
            pan_length: None,
            payment_method_variant: None,
            localized_brand: None,
            is_selected: false,
        };

        let output_data =
            create_output_data(&stored_payment_method, &detected_card_type, &Secret::default());
        let mut delegate = Self {
            params,
            stored_payment_method,
            detected_card_type,
            card_encryptor,
            public_key: None,
            security_code: Secret::default(),
            component_state: CardComponentState::default(),
            output_data,
            errors: Vec::new(),
        };
        delegate.on_input_data_changed();
        delegate
    }

    pub fn update_security_code(&mut self, security_code: Secret<String>) {
        self.security_code = security_code;
        self.on_input_data_changed();
    }

    pub fn set_public_key(&mut self, public_key: Secret<String>) {
        self.public_key = Some(public_key);
        self.on_input_data_changed();
    }

    /// Records a failed public key fetch.
    pub fn on_public_key_failure(&mut self, error: Report<CardComponentError>) {
        logger::error!(tag = %Tag::PublicKeyRequest, ?error, "public key fetch failed");
        self.errors.push(error);
    }

    pub fn output_data(&self) -> &CardOutputData {
        &self.output_data
    }

    pub fn component_state(&self) -> &CardComponentState {
        &self.component_state
    }

    /// Errors raised since the last call.
    pub fn take_errors(&mut self) -> Vec<Report<CardComponentError>> {
        std::mem::take(&mut self.errors)
    }

    pub fn submit(&self) -> CustomResult<CardComponentState, CardComponentError> {
        if !self.component_state.is_ready {
            return Err(Report::new(CardComponentError::MissingPublicKey));
        }
        if !self.component_state.is_input_valid {
            return Err(Report::new(CardComponentError::InvalidInput));
        }
        Ok(self.component_state.clone())
    }

    fn on_input_data_changed(&mut self) {
        self.output_data = create_output_data(
            &self.stored_payment_method,
            &self.detected_card_type,
            &self.security_code,
        );

        let (state, error) = self.create_component_state();
        self.component_state = state;
        self.errors.extend(error);
    }

    fn create_component_state(&self) -> (CardComponentState, Option<Report<CardComponentError>>) {
        let output = &self.output_data;
        let card_brand = Some(self.detected_card_type.card_brand.clone());

        let Some(public_key) = self.public_key.as_ref().filter(|_| output.is_valid()) else {
            return (
                CardComponentState::empty(
                    output.is_valid(),
                    self.public_key.is_some(),
                    card_brand,
                    String::new(),
                ),
                None,
            );
        };

        let security_code = &output.security_code_state.value;
        let card = UnencryptedCard {
            cvc: (!output.is_cvc_hidden() && !security_code.peek().is_empty())
                .then(|| security_code.clone()),
            ..UnencryptedCard::default()
        };

        match self
            .card_encryptor
            .encrypt_fields(&card, public_key)
            .change_context(CardComponentError::EncryptionFailed)
        {
            Ok(encrypted_card) => {
                let payment_method = CardPaymentMethod {
                    stored_payment_method_id: Some(self.stored_payment_method.id.clone()),
                    encrypted_security_code: encrypted_card
                        .encrypted_security_code
                        .filter(|_| !output.is_cvc_hidden()),
                    ..CardPaymentMethod::scheme()
                };
                let state = CardComponentState {
                    data: PaymentComponentData {
                        payment_method: Some(payment_method),
                        shopper_reference: self.params.shopper_reference.clone(),
                        amount: self.params.amount.clone(),
                        ..PaymentComponentData::default()
                    },
                    is_input_valid: true,
                    is_ready: true,
                    card_brand,
                    bin_value: String::new(),
                    last_four_digits: Some(output.card_number_state.value.get_last4()),
                };
                (state, None)
            }
            Err(error) => {
                logger::error!(tag = %Tag::Encryption, ?error, "stored card encryption failed");
                (
                    CardComponentState::empty(false, true, card_brand, String::new()),
                    Some(error),
                )
            }
        }
    }
}

/// Every field but the security code is taken as valid.
fn create_output_data(
    stored_payment_method: &StoredPaymentMethod,
    detected_card_type: &DetectedCardType,
    security_code: &Secret<String>,
) -> CardOutputData {
    let cvc_ui_state = match detected_card_type.cvc_policy {
        FieldPolicy::Required => InputFieldUiState::Required,
        FieldPolicy::Optional => InputFieldUiState::Optional,
        FieldPolicy::Hidden => InputFieldUiState::Hidden,
    };
    let card_number = CardNumber::new(
        stored_payment_method
            .last_four
            .as_deref()
            .unwrap_or_default(),
    );

    CardOutputData {
        card_number_state: FieldState::valid(card_number),
        expiry_date_state: FieldState::valid(stored_payment_method.expiry_date()),
        security_code_state: validators::validate_security_code(
            security_code.peek(),
            detected_card_type.card_type(),
            cvc_ui_state,
        ),
        holder_name_state: FieldState::valid(Secret::new(
            stored_payment_method.holder_name.clone().unwrap_or_default(),
        )),
        social_security_number_state: FieldState::valid(Secret::default()),
        kcp_birth_date_or_tax_number_state: FieldState::valid(Secret::default()),
        kcp_card_password_state: FieldState::valid(Secret::default()),
        address_state: AddressOutputData::default(),
        installment_state: FieldState::valid(None),
        should_store_payment_method: false,
        cvc_ui_state,
        expiry_date_ui_state: reducer::make_expiry_date_ui_state(Some(
            detected_card_type.expiry_date_policy,
        )),
        holder_name_ui_state: InputFieldUiState::Hidden,
        show_store_payment_field: false,
        detected_card_types: vec![detected_card_type.clone()],
        is_social_security_number_required: false,
        is_kcp_auth_required: false,
        address_ui_state: AddressFormUiState::None,
        installment_options: Vec::new(),
        card_brands: Vec::new(),
        is_card_list_visible: false,
        kcp_birth_date_or_tax_number_hint: KcpBirthDateOrTaxNumberHint::default(),
        dual_brand_data: None,
    }
}
