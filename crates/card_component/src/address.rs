//! Billing address form of the card component.

use cards::{CardBrand, FieldState, InvalidReason, Validation};
use common_enums::AddressFormUiState;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Which address fields the form collects.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum AddressConfiguration {
    #[default]
    None,
    PostalCode {
        policy: AddressFieldPolicy,
    },
    FullAddress {
        default_country_code: Option<String>,
        /// Countries offered in the selector, every country when empty.
        supported_country_codes: Vec<String>,
        policy: AddressFieldPolicy,
    },
}

impl AddressConfiguration {
    pub fn ui_state(&self) -> AddressFormUiState {
        match self {
            Self::None => AddressFormUiState::None,
            Self::PostalCode { .. } => AddressFormUiState::PostalCode,
            Self::FullAddress { .. } => AddressFormUiState::FullAddress,
        }
    }

    /// Whether the address can be left empty for the resolved brand.
    pub fn is_optional_for(&self, card_brand: Option<&CardBrand>) -> bool {
        match self {
            Self::None => true,
            Self::PostalCode { policy } | Self::FullAddress { policy, .. } => {
                policy.is_optional_for(card_brand)
            }
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum AddressFieldPolicy {
    #[default]
    Required,
    Optional,
    OptionalForCardTypes(Vec<CardBrand>),
}

impl AddressFieldPolicy {
    pub fn is_optional_for(&self, card_brand: Option<&CardBrand>) -> bool {
        match self {
            Self::Required => false,
            Self::Optional => true,
            Self::OptionalForCardTypes(card_brands) => {
                card_brand.is_some_and(|card_brand| card_brands.contains(card_brand))
            }
        }
    }
}

/// Country or state as returned by the address repository.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct AddressItem {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Country or state option of a selector.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct AddressListItem {
    pub name: String,
    pub code: String,
    pub selected: bool,
}

/// Address fields as typed by the shopper.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressInputModel {
    pub postal_code: String,
    pub street: String,
    pub state_or_province: String,
    pub house_number_or_name: String,
    pub apartment_suite: String,
    pub city: String,
    pub country: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AddressOutputData {
    pub postal_code: FieldState<String>,
    pub street: FieldState<String>,
    pub state_or_province: FieldState<String>,
    pub house_number_or_name: FieldState<String>,
    pub apartment_suite: FieldState<String>,
    pub city: FieldState<String>,
    pub country: FieldState<String>,
    pub is_optional: bool,
    pub country_options: Vec<AddressListItem>,
    pub state_options: Vec<AddressListItem>,
}

impl AddressOutputData {
    pub fn is_valid(&self) -> bool {
        [
            &self.postal_code,
            &self.street,
            &self.state_or_province,
            &self.house_number_or_name,
            &self.apartment_suite,
            &self.city,
            &self.country,
        ]
        .iter()
        .all(|field| field.is_valid())
    }
}

/// Billing address attached to the payment request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub postal_code: String,
    pub street: String,
    pub state_or_province: String,
    pub house_number_or_name: String,
    pub city: String,
    pub country: String,
}

/// Selects the item with `code`, or clears the selection when no item has it.
pub fn mark_address_list_item_selected(
    list: &[AddressListItem],
    code: Option<&str>,
) -> Vec<AddressListItem> {
    let code = code
        .filter(|code| !code.is_empty())
        .filter(|code| list.iter().any(|item| item.code == *code));

    list.iter()
        .map(|item| AddressListItem {
            selected: code.is_some_and(|code| item.code == code),
            ..item.clone()
        })
        .collect()
}

/// Country options for a full address form, restricted to the supported countries, with the
/// default country selected. The default is taken from the shopper locale when not configured.
pub fn initialize_country_options(
    shopper_locale: &str,
    configuration: &AddressConfiguration,
    country_list: &[AddressItem],
) -> Vec<AddressListItem> {
    let AddressConfiguration::FullAddress {
        default_country_code,
        supported_country_codes,
        ..
    } = configuration
    else {
        return Vec::new();
    };

    let options = country_list
        .iter()
        .filter(|country| {
            supported_country_codes.is_empty()
                || country
                    .id
                    .as_ref()
                    .is_some_and(|id| supported_country_codes.contains(id))
        })
        .map(|country| AddressListItem {
            name: country
                .name
                .clone()
                .or_else(|| country.id.clone())
                .unwrap_or_default(),
            code: country.id.clone().unwrap_or_default(),
            selected: false,
        })
        .collect::<Vec<_>>();

    let initial_country_code = default_country_code
        .clone()
        .unwrap_or_else(|| locale_country(shopper_locale).to_string());

    mark_address_list_item_selected(&options, Some(&initial_country_code))
}

/// State options with nothing selected.
pub fn initialize_state_options(state_list: &[AddressItem]) -> Vec<AddressListItem> {
    state_list
        .iter()
        .map(|state| AddressListItem {
            name: state.name.clone().unwrap_or_default(),
            code: state.id.clone().unwrap_or_default(),
            selected: false,
        })
        .collect()
}

/// Region part of a locale tag, `US` for `en-US` or `en_US`.
fn locale_country(shopper_locale: &str) -> &str {
    shopper_locale
        .split(['-', '_'])
        .nth(1)
        .unwrap_or_default()
}

/// Validate the address fields collected by the form.
///
/// An optional address accepts empty fields. The state is only required when the selected
/// country has states.
pub fn validate_address_input(
    input: &AddressInputModel,
    ui_state: AddressFormUiState,
    country_options: Vec<AddressListItem>,
    state_options: Vec<AddressListItem>,
    is_optional: bool,
) -> AddressOutputData {
    let required = |value: &str, collected: bool| {
        let validation = if collected && !is_optional && value.trim().is_empty() {
            Validation::Invalid(InvalidReason::AddressFieldRequired)
        } else {
            Validation::Valid
        };
        FieldState::new(value.to_string(), validation)
    };

    let (postal_code, full_address) = match ui_state {
        AddressFormUiState::None => (false, false),
        AddressFormUiState::PostalCode => (true, false),
        AddressFormUiState::FullAddress => (true, true),
    };

    AddressOutputData {
        postal_code: required(&input.postal_code, postal_code),
        street: required(&input.street, full_address),
        state_or_province: required(
            &input.state_or_province,
            full_address && !state_options.is_empty(),
        ),
        house_number_or_name: required(&input.house_number_or_name, full_address),
        apartment_suite: FieldState::valid(input.apartment_suite.clone()),
        city: required(&input.city, full_address),
        country: required(&input.country, full_address),
        is_optional,
        country_options,
        state_options,
    }
}

/// House number and apartment joined by a space, skipping empty parts.
pub fn make_house_number_or_name(house_number_or_name: &str, apartment_suite: &str) -> String {
    [house_number_or_name, apartment_suite]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Address for the payment request. Fields the shopper left empty are sent as placeholders.
pub fn make_address_data(output: &AddressOutputData, ui_state: AddressFormUiState) -> Option<Address> {
    let or_placeholder = |value: &str| {
        if value.is_empty() {
            consts::ADDRESS_NULL_PLACEHOLDER.to_string()
        } else {
            value.to_string()
        }
    };

    match ui_state {
        AddressFormUiState::FullAddress => Some(Address {
            postal_code: or_placeholder(&output.postal_code.value),
            street: or_placeholder(&output.street.value),
            state_or_province: or_placeholder(&output.state_or_province.value),
            house_number_or_name: or_placeholder(&make_house_number_or_name(
                &output.house_number_or_name.value,
                &output.apartment_suite.value,
            )),
            city: or_placeholder(&output.city.value),
            country: output.country.value.clone(),
        }),
        AddressFormUiState::PostalCode => Some(Address {
            postal_code: output.postal_code.value.clone(),
            street: consts::ADDRESS_NULL_PLACEHOLDER.to_string(),
            state_or_province: consts::ADDRESS_NULL_PLACEHOLDER.to_string(),
            house_number_or_name: consts::ADDRESS_NULL_PLACEHOLDER.to_string(),
            city: consts::ADDRESS_NULL_PLACEHOLDER.to_string(),
            country: consts::ADDRESS_COUNTRY_NULL_PLACEHOLDER.to_string(),
        }),
        AddressFormUiState::None => None,
    }
}
