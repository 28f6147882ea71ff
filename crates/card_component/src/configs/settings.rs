use std::path::PathBuf;

use cards::CardBrand;
use common_enums::{
    AddressFormUiState, CvcVisibility, Environment, KcpAuthVisibility,
    SocialSecurityNumberVisibility,
};
use error_stack::{report, ResultExt};
use masking::{ExposeInterface, Secret};
use router_env::{config::Log, env, logger};
use serde::Deserialize;

use crate::{
    address::{AddressConfiguration, AddressFieldPolicy},
    configuration::{CardConfiguration, CardConfigurationBuilder},
    errors::{ConfigurationError, CustomResult},
};

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub log: Log,
    pub card: CardSettings,
}

/// Card form configuration read from the settings files.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CardSettings {
    pub environment: Environment,
    pub client_key: Secret<String>,
    pub shopper_locale: Option<String>,
    /// Transaction variants, the default brand list when empty.
    pub supported_card_brands: Vec<String>,
    pub holder_name_required: bool,
    pub store_payment_field_visible: bool,
    pub shopper_reference: Option<String>,
    pub cvc_visibility: CvcVisibility,
    pub hide_stored_cvc: bool,
    pub social_security_number_visibility: SocialSecurityNumberVisibility,
    pub kcp_auth_visibility: KcpAuthVisibility,
    pub address: AddressSettings,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            environment: Environment::Test,
            client_key: Secret::default(),
            shopper_locale: None,
            supported_card_brands: Vec::new(),
            holder_name_required: false,
            store_payment_field_visible: true,
            shopper_reference: None,
            cvc_visibility: CvcVisibility::default(),
            hide_stored_cvc: false,
            social_security_number_visibility: SocialSecurityNumberVisibility::default(),
            kcp_auth_visibility: KcpAuthVisibility::default(),
            address: AddressSettings::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct AddressSettings {
    pub mode: AddressFormUiState,
    pub default_country_code: Option<String>,
    pub supported_country_codes: Vec<String>,
    pub policy: AddressPolicySettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AddressPolicySettings {
    pub required: bool,
    /// Brands for which a required address may be left empty.
    pub optional_for_card_brands: Vec<String>,
}

impl Default for AddressPolicySettings {
    fn default() -> Self {
        Self {
            required: true,
            optional_for_card_brands: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new() -> CustomResult<Self, ConfigurationError> {
        Self::with_config_path(None)
    }

    /// Loads `config/default.toml`, then the file of the current `RUN_ENV` (or the explicit
    /// path), then `CHECKOUT__` prefixed environment variables.
    pub fn with_config_path(config_path: Option<PathBuf>) -> CustomResult<Self, ConfigurationError> {
        let environment = env::which().to_string();
        let config_path = router_env::Config::config_path(&environment, config_path);

        let mut default_config_path = env::workspace_path();
        default_config_path.push("config");
        default_config_path.push("default.toml");

        let config = router_env::Config::builder(&environment)
            .change_context(ConfigurationError::SettingsLoadFailed)?
            .add_source(config::File::from(default_config_path).required(false))
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CHECKOUT")
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("card.supported_card_brands")
                    .with_list_parse_key("card.address.supported_country_codes")
                    .with_list_parse_key("card.address.policy.optional_for_card_brands"),
            )
            .build()
            .change_context(ConfigurationError::SettingsLoadFailed)?;

        config
            .try_deserialize()
            .map_err(|error| {
                logger::error!(?error, "unable to deserialize card component settings");
                report!(ConfigurationError::SettingsLoadFailed)
            })
            .attach_printable_lazy(|| format!("environment: {environment}"))
    }

    pub fn validate(&self) -> CustomResult<(), ConfigurationError> {
        self.card.validate()
    }
}

impl CardSettings {
    /// Merchant configuration described by these settings.
    ///
    /// Amount and installments are per payment, so they are left to the caller.
    pub fn card_configuration(&self) -> CustomResult<CardConfigurationBuilder, ConfigurationError> {
        let supported_card_brands = parse_card_brands(&self.supported_card_brands)?;
        let address_configuration = self.address.address_configuration()?;

        let mut builder =
            CardConfiguration::builder(self.environment, self.client_key.clone().expose())
                .supported_card_brands(supported_card_brands)
                .holder_name_required(self.holder_name_required)
                .store_payment_field_visible(self.store_payment_field_visible)
                .cvc_visibility(self.cvc_visibility)
                .hide_stored_cvc(self.hide_stored_cvc)
                .social_security_number_visibility(self.social_security_number_visibility)
                .kcp_auth_visibility(self.kcp_auth_visibility)
                .address_configuration(address_configuration);

        if let Some(shopper_locale) = &self.shopper_locale {
            builder = builder.shopper_locale(shopper_locale.clone());
        }
        if let Some(shopper_reference) = &self.shopper_reference {
            builder = builder.shopper_reference(shopper_reference.clone());
        }

        Ok(builder)
    }
}

impl AddressSettings {
    fn address_configuration(&self) -> CustomResult<AddressConfiguration, ConfigurationError> {
        let policy = self.policy.field_policy()?;
        Ok(match self.mode {
            AddressFormUiState::None => AddressConfiguration::None,
            AddressFormUiState::PostalCode => AddressConfiguration::PostalCode { policy },
            AddressFormUiState::FullAddress => AddressConfiguration::FullAddress {
                default_country_code: self.default_country_code.clone(),
                supported_country_codes: self.supported_country_codes.clone(),
                policy,
            },
        })
    }
}

impl AddressPolicySettings {
    fn field_policy(&self) -> CustomResult<AddressFieldPolicy, ConfigurationError> {
        if !self.optional_for_card_brands.is_empty() {
            return parse_card_brands(&self.optional_for_card_brands)
                .map(AddressFieldPolicy::OptionalForCardTypes);
        }
        Ok(if self.required {
            AddressFieldPolicy::Required
        } else {
            AddressFieldPolicy::Optional
        })
    }
}

/// Known brands and private label variants are accepted.
fn parse_card_brands(tx_variants: &[String]) -> CustomResult<Vec<CardBrand>, ConfigurationError> {
    tx_variants
        .iter()
        .map(|tx_variant| {
            let card_brand = CardBrand::new(tx_variant.trim());
            if card_brand.card_type().is_some() || card_brand.is_private_label() {
                Ok(card_brand)
            } else {
                Err(report!(ConfigurationError::UnknownCardBrand {
                    tx_variant: tx_variant.clone(),
                }))
            }
        })
        .collect()
}
