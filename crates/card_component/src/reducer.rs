//! Reduction of the raw input and the latest detection result into a [`CardOutputData`].
//!
//! The reduction is a pure function of its arguments, so reducing the same input twice yields the
//! same snapshot.

use cards::{
    kcp, social_security_number, validators, CardBrand, DetectedCardType, FieldState,
};
use common_enums::{CvcVisibility, FieldPolicy, InputFieldUiState};
use common_utils::date_time;
use masking::PeekInterface;
use time::Date;

use crate::{
    address::{self, AddressListItem},
    configuration::CardComponentParams,
    dual_brand, installments,
    types::{CardInputData, CardListItem, CardOutputData},
};

pub fn create_output_data(
    params: &CardComponentParams,
    input: &CardInputData,
    detected_card_types: &[DetectedCardType],
    country_options: &[AddressListItem],
    state_options: &[AddressListItem],
) -> CardOutputData {
    create_output_data_at(
        params,
        input,
        detected_card_types,
        country_options,
        state_options,
        date_time::today(),
    )
}

/// [`create_output_data`] with the expiry date checked against `today`.
pub fn create_output_data_at(
    params: &CardComponentParams,
    input: &CardInputData,
    detected_card_types: &[DetectedCardType],
    country_options: &[AddressListItem],
    state_options: &[AddressListItem],
    today: Date,
) -> CardOutputData {
    let detected_card_types = mark_selected(detected_card_types, input.selected_card_brand.as_ref());
    let is_reliable = detected_card_types.iter().any(|detected| detected.is_reliable);
    let supported_card_types = detected_card_types
        .iter()
        .filter(|detected| detected.is_supported)
        .cloned()
        .collect::<Vec<_>>();

    // The shopper's brand choice is honoured even while it is not confirmed as supported.
    let selected_or_first = input
        .selected_card_brand
        .as_ref()
        .and_then(|selected| {
            detected_card_types
                .iter()
                .find(|detected| &detected.card_brand == selected)
        })
        .or_else(|| supported_card_types.first());

    let enable_luhn_check = selected_or_first.map_or(true, |detected| detected.enable_luhn_check);
    // Unsupported brands are only an error once the detection is reliable.
    let should_fail_with_unsupported_brand = selected_or_first.is_none() && is_reliable;

    let cvc_ui_state = make_cvc_ui_state(params.cvc_visibility, selected_or_first);
    let expiry_date_policy = selected_or_first.map(|detected| detected.expiry_date_policy);
    let selected_card_brand = selected_or_first.map(|detected| &detected.card_brand);

    let address_ui_state = params.address_configuration.ui_state();
    let address_state = address::validate_address_input(
        &input.address,
        address_ui_state,
        address::mark_address_list_item_selected(country_options, Some(input.address.country.as_str())),
        address::mark_address_list_item_selected(
            state_options,
            Some(input.address.state_or_province.as_str()),
        ),
        params
            .address_configuration
            .is_optional_for(selected_card_brand),
    );

    let installment_options = installments::make_installment_options(
        params.installment_configuration.as_ref(),
        params.funding_source,
        selected_card_brand,
        is_reliable,
        params.amount.as_ref(),
    );

    let is_social_security_number_required = params.is_social_security_number_required();
    let is_kcp_auth_required = params.is_kcp_auth_required();
    let kcp_birth_date_or_tax_number = input.kcp_birth_date_or_tax_number.peek();

    CardOutputData {
        card_number_state: validators::validate_card_number(
            input.card_number.peek(),
            enable_luhn_check,
            !should_fail_with_unsupported_brand,
            selected_or_first.and_then(|detected| detected.pan_length),
        ),
        expiry_date_state: validators::validate_expiry_date_at(
            input.expiry_date,
            expiry_date_policy,
            today,
        ),
        security_code_state: validators::validate_security_code(
            input.security_code.peek(),
            selected_or_first.and_then(DetectedCardType::card_type),
            cvc_ui_state,
        ),
        holder_name_state: validators::validate_holder_name(
            input.holder_name.peek(),
            params.is_holder_name_required,
        ),
        social_security_number_state: if is_social_security_number_required {
            social_security_number::validate_social_security_number(
                input.social_security_number.peek(),
            )
        } else {
            FieldState::valid(input.social_security_number.clone())
        },
        kcp_birth_date_or_tax_number_state: if is_kcp_auth_required {
            kcp::validate_birth_date_or_tax_number(kcp_birth_date_or_tax_number)
        } else {
            FieldState::valid(input.kcp_birth_date_or_tax_number.clone())
        },
        kcp_card_password_state: if is_kcp_auth_required {
            kcp::validate_card_password(input.kcp_card_password.peek())
        } else {
            FieldState::valid(input.kcp_card_password.clone())
        },
        address_state,
        installment_state: FieldState::valid(input.installment_option.clone()),
        should_store_payment_method: input.is_storing_payment_method_selected,
        cvc_ui_state,
        expiry_date_ui_state: make_expiry_date_ui_state(expiry_date_policy),
        holder_name_ui_state: if params.is_holder_name_required {
            InputFieldUiState::Required
        } else {
            InputFieldUiState::Hidden
        },
        show_store_payment_field: params.is_store_payment_field_visible,
        is_social_security_number_required,
        is_kcp_auth_required,
        address_ui_state,
        installment_options,
        card_brands: card_brands(&params.supported_card_brands, &supported_card_types),
        is_card_list_visible: !params.supported_card_brands.is_empty()
            && supported_card_types.is_empty(),
        kcp_birth_date_or_tax_number_hint: kcp::birth_date_or_tax_number_hint(
            kcp_birth_date_or_tax_number,
        ),
        dual_brand_data: dual_brand::process_detected_card_types(
            &detected_card_types,
            input.selected_card_brand.as_ref(),
        ),
        detected_card_types: supported_card_types,
    }
}

/// Flags the first detected type of the selected brand and clears every other flag.
fn mark_selected(
    detected_card_types: &[DetectedCardType],
    selected_card_brand: Option<&CardBrand>,
) -> Vec<DetectedCardType> {
    let selected_index = selected_card_brand.and_then(|selected| {
        detected_card_types
            .iter()
            .position(|detected| &detected.card_brand == selected)
    });

    detected_card_types
        .iter()
        .enumerate()
        .map(|(index, detected)| DetectedCardType {
            is_selected: Some(index) == selected_index,
            ..detected.clone()
        })
        .collect()
}

/// Until the brand is reliably known the field only shows for [`CvcVisibility::AlwaysShow`].
pub fn make_cvc_ui_state(
    cvc_visibility: CvcVisibility,
    detected_card_type: Option<&DetectedCardType>,
) -> InputFieldUiState {
    match detected_card_type.filter(|detected| detected.is_reliable) {
        Some(detected) => match (cvc_visibility, detected.cvc_policy) {
            (CvcVisibility::AlwaysHide, _) => InputFieldUiState::Hidden,
            (CvcVisibility::AlwaysShow | CvcVisibility::HideFirst, FieldPolicy::Optional) => {
                InputFieldUiState::Optional
            }
            (CvcVisibility::AlwaysShow | CvcVisibility::HideFirst, FieldPolicy::Hidden) => {
                InputFieldUiState::Hidden
            }
            (CvcVisibility::AlwaysShow | CvcVisibility::HideFirst, FieldPolicy::Required) => {
                InputFieldUiState::Required
            }
        },
        None => match cvc_visibility {
            CvcVisibility::AlwaysShow => InputFieldUiState::Required,
            CvcVisibility::HideFirst | CvcVisibility::AlwaysHide => InputFieldUiState::Hidden,
        },
    }
}

pub fn make_expiry_date_ui_state(expiry_date_policy: Option<FieldPolicy>) -> InputFieldUiState {
    match expiry_date_policy {
        Some(FieldPolicy::Optional) => InputFieldUiState::Optional,
        Some(FieldPolicy::Hidden) => InputFieldUiState::Hidden,
        Some(FieldPolicy::Required) | None => InputFieldUiState::Required,
    }
}

/// Every brand counts as detected while nothing is detected.
fn card_brands(
    supported_card_brands: &[CardBrand],
    detected_card_types: &[DetectedCardType],
) -> Vec<CardListItem> {
    let nothing_detected = detected_card_types.is_empty();
    supported_card_brands
        .iter()
        .map(|card_brand| CardListItem {
            card_brand: card_brand.clone(),
            is_detected: nothing_detected
                || detected_card_types
                    .iter()
                    .any(|detected| &detected.card_brand == card_brand),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use common_enums::CardType;
    use test_case::test_case;

    use super::*;

    fn detected(cvc_policy: FieldPolicy, is_reliable: bool) -> DetectedCardType {
        DetectedCardType {
            cvc_policy,
            ..DetectedCardType::estimated(CardType::Visa, is_reliable, true)
        }
    }

    #[test_case(CvcVisibility::AlwaysShow, FieldPolicy::Optional => InputFieldUiState::Optional)]
    #[test_case(CvcVisibility::AlwaysShow, FieldPolicy::Hidden => InputFieldUiState::Hidden)]
    #[test_case(CvcVisibility::AlwaysShow, FieldPolicy::Required => InputFieldUiState::Required)]
    #[test_case(CvcVisibility::HideFirst, FieldPolicy::Required => InputFieldUiState::Required)]
    #[test_case(CvcVisibility::HideFirst, FieldPolicy::Hidden => InputFieldUiState::Hidden)]
    #[test_case(CvcVisibility::AlwaysHide, FieldPolicy::Required => InputFieldUiState::Hidden)]
    fn cvc_ui_state_for_reliable_brand(
        visibility: CvcVisibility,
        policy: FieldPolicy,
    ) -> InputFieldUiState {
        make_cvc_ui_state(visibility, Some(&detected(policy, true)))
    }

    #[test_case(CvcVisibility::AlwaysShow => InputFieldUiState::Required)]
    #[test_case(CvcVisibility::HideFirst => InputFieldUiState::Hidden)]
    #[test_case(CvcVisibility::AlwaysHide => InputFieldUiState::Hidden)]
    fn cvc_ui_state_for_unreliable_brand(visibility: CvcVisibility) -> InputFieldUiState {
        make_cvc_ui_state(visibility, Some(&detected(FieldPolicy::Optional, false)))
    }

    #[test]
    fn selection_marks_a_single_entry() {
        let visa = DetectedCardType::estimated(CardType::Visa, true, true);
        let marked = mark_selected(
            &[visa.clone(), visa.clone()],
            Some(&CardBrand::from(CardType::Visa)),
        );
        assert_eq!(
            marked.iter().map(|detected| detected.is_selected).collect::<Vec<_>>(),
            vec![true, false]
        );
        assert!(mark_selected(&[visa], None).iter().all(|detected| !detected.is_selected));
    }

    #[test]
    fn card_list_marks_detected_brands() {
        let supported = vec![CardBrand::from(CardType::Visa), CardBrand::from(CardType::Amex)];
        let detected = [DetectedCardType::estimated(CardType::Amex, false, true)];

        let items = card_brands(&supported, &detected);
        assert_eq!(
            items.iter().map(|item| item.is_detected).collect::<Vec<_>>(),
            vec![false, true]
        );
        assert!(card_brands(&supported, &[]).iter().all(|item| item.is_detected));
    }
}
