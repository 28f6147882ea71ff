//! Merchant configuration of the card component.

use cards::CardBrand;
use common_enums::{
    CardType, CvcVisibility, Environment, FundingSource, KcpAuthVisibility,
    SocialSecurityNumberVisibility,
};
use error_stack::report;
use masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    address::AddressConfiguration,
    consts,
    errors::{ConfigurationError, CustomResult},
    installments::InstallmentConfiguration,
};

/// Payment amount in minor units.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    pub value: i64,
    pub currency: String,
}

impl Amount {
    pub fn new(value: i64, currency: impl Into<String>) -> Self {
        Self {
            value,
            currency: currency.into(),
        }
    }

    pub(crate) fn divided_by(&self, parts: u32) -> Self {
        Self {
            value: self.value / i64::from(parts),
            currency: self.currency.clone(),
        }
    }
}

/// Validated parameters every card component operation reads.
#[derive(Clone, Debug)]
pub struct CardComponentParams {
    pub environment: Environment,
    pub client_key: Secret<String>,
    pub shopper_locale: String,
    pub supported_card_brands: Vec<CardBrand>,
    pub is_holder_name_required: bool,
    pub is_store_payment_field_visible: bool,
    pub shopper_reference: Option<String>,
    pub cvc_visibility: CvcVisibility,
    pub stored_cvc_hidden: bool,
    pub social_security_number_visibility: SocialSecurityNumberVisibility,
    pub kcp_auth_visibility: KcpAuthVisibility,
    pub address_configuration: AddressConfiguration,
    pub installment_configuration: Option<InstallmentConfiguration>,
    pub amount: Option<Amount>,
    pub funding_source: FundingSource,
}

impl CardComponentParams {
    pub fn is_social_security_number_required(&self) -> bool {
        self.social_security_number_visibility == SocialSecurityNumberVisibility::Show
    }

    pub fn is_kcp_auth_required(&self) -> bool {
        self.kcp_auth_visibility == KcpAuthVisibility::Show
    }

    pub fn is_brand_supported(&self, card_brand: &CardBrand) -> bool {
        self.supported_card_brands.contains(card_brand)
    }
}

/// Entry point of the configuration builder.
#[derive(Debug)]
pub struct CardConfiguration;

impl CardConfiguration {
    pub fn builder(environment: Environment, client_key: impl Into<String>) -> CardConfigurationBuilder {
        CardConfigurationBuilder::new(environment, client_key.into())
    }
}

#[derive(Clone, Debug)]
pub struct CardConfigurationBuilder {
    environment: Environment,
    client_key: String,
    shopper_locale: Option<String>,
    supported_card_brands: Vec<CardBrand>,
    is_holder_name_required: bool,
    is_store_payment_field_visible: bool,
    shopper_reference: Option<String>,
    cvc_visibility: CvcVisibility,
    stored_cvc_hidden: bool,
    social_security_number_visibility: SocialSecurityNumberVisibility,
    kcp_auth_visibility: KcpAuthVisibility,
    address_configuration: AddressConfiguration,
    installment_configuration: Option<InstallmentConfiguration>,
    amount: Option<Amount>,
    funding_source: FundingSource,
}

impl CardConfigurationBuilder {
    fn new(environment: Environment, client_key: String) -> Self {
        Self {
            environment,
            client_key,
            shopper_locale: None,
            supported_card_brands: Vec::new(),
            is_holder_name_required: false,
            is_store_payment_field_visible: true,
            shopper_reference: None,
            cvc_visibility: CvcVisibility::default(),
            stored_cvc_hidden: false,
            social_security_number_visibility: SocialSecurityNumberVisibility::default(),
            kcp_auth_visibility: KcpAuthVisibility::default(),
            address_configuration: AddressConfiguration::default(),
            installment_configuration: None,
            amount: None,
            funding_source: FundingSource::default(),
        }
    }

    pub fn shopper_locale(mut self, shopper_locale: impl Into<String>) -> Self {
        self.shopper_locale = Some(shopper_locale.into());
        self
    }

    pub fn supported_card_brands(mut self, card_brands: impl IntoIterator<Item = CardBrand>) -> Self {
        self.supported_card_brands = card_brands.into_iter().collect();
        self
    }

    pub fn holder_name_required(mut self, is_required: bool) -> Self {
        self.is_holder_name_required = is_required;
        self
    }

    pub fn store_payment_field_visible(mut self, is_visible: bool) -> Self {
        self.is_store_payment_field_visible = is_visible;
        self
    }

    pub fn shopper_reference(mut self, shopper_reference: impl Into<String>) -> Self {
        self.shopper_reference = Some(shopper_reference.into());
        self
    }

    pub fn cvc_visibility(mut self, cvc_visibility: CvcVisibility) -> Self {
        self.cvc_visibility = cvc_visibility;
        self
    }

    /// Shorthand for [`CvcVisibility::AlwaysHide`].
    pub fn hide_cvc(mut self, hide_cvc: bool) -> Self {
        if hide_cvc {
            self.cvc_visibility = CvcVisibility::AlwaysHide;
        }
        self
    }

    pub fn hide_stored_cvc(mut self, hide_stored_cvc: bool) -> Self {
        self.stored_cvc_hidden = hide_stored_cvc;
        self
    }

    pub fn social_security_number_visibility(
        mut self,
        visibility: SocialSecurityNumberVisibility,
    ) -> Self {
        self.social_security_number_visibility = visibility;
        self
    }

    pub fn kcp_auth_visibility(mut self, visibility: KcpAuthVisibility) -> Self {
        self.kcp_auth_visibility = visibility;
        self
    }

    pub fn address_configuration(mut self, address_configuration: AddressConfiguration) -> Self {
        self.address_configuration = address_configuration;
        self
    }

    pub fn installment_configuration(mut self, configuration: InstallmentConfiguration) -> Self {
        self.installment_configuration = Some(configuration);
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn funding_source(mut self, funding_source: FundingSource) -> Self {
        self.funding_source = funding_source;
        self
    }

    pub fn build(self) -> CustomResult<CardComponentParams, ConfigurationError> {
        let client_key = Secret::new(self.client_key);
        validate_client_key(&client_key, self.environment)?;

        let supported_card_brands = if self.supported_card_brands.is_empty() {
            default_supported_card_brands()
        } else {
            self.supported_card_brands
        };

        Ok(CardComponentParams {
            environment: self.environment,
            client_key,
            shopper_locale: self
                .shopper_locale
                .unwrap_or_else(|| consts::DEFAULT_SHOPPER_LOCALE.to_string()),
            supported_card_brands,
            is_holder_name_required: self.is_holder_name_required,
            is_store_payment_field_visible: self.is_store_payment_field_visible,
            shopper_reference: self.shopper_reference,
            cvc_visibility: self.cvc_visibility,
            stored_cvc_hidden: self.stored_cvc_hidden,
            social_security_number_visibility: self.social_security_number_visibility,
            kcp_auth_visibility: self.kcp_auth_visibility,
            address_configuration: self.address_configuration,
            installment_configuration: self.installment_configuration,
            amount: self.amount,
            funding_source: self.funding_source,
        })
    }
}

/// Brands accepted when the merchant does not list any.
pub fn default_supported_card_brands() -> Vec<CardBrand> {
    [CardType::Visa, CardType::Amex, CardType::Mastercard]
        .into_iter()
        .map(CardBrand::from)
        .collect()
}

/// Test keys start with `test_`, live keys with `live_`.
fn validate_client_key(
    client_key: &Secret<String>,
    environment: Environment,
) -> CustomResult<(), ConfigurationError> {
    let client_key = client_key.peek();
    if client_key.trim().is_empty() {
        return Err(report!(ConfigurationError::MissingClientKey));
    }

    let expected_prefix = match environment {
        Environment::Test => "test_",
        Environment::Europe
        | Environment::UnitedStates
        | Environment::Australia
        | Environment::India
        | Environment::Apse => "live_",
    };

    if client_key.starts_with(expected_prefix) {
        Ok(())
    } else {
        Err(report!(ConfigurationError::InvalidClientKey {
            environment: environment.to_string(),
        }))
    }
}
