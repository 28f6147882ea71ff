#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use card_component::{
    errors::CardComponentError, reducer::create_output_data_at, CardComponentParams,
    CardConfiguration, CardInputData, CardOutputData, ComponentStateBuilder,
};
use cards::{CardNumber, ExpiryDate};
use common_enums::{CardType, Environment, FieldPolicy, KcpAuthVisibility};
use masking::Secret;
use serde_json::json;
use time::macros::date;

fn builder(params: CardComponentParams, fail_encryption: bool) -> ComponentStateBuilder {
    ComponentStateBuilder::new(
        Arc::new(params),
        Arc::new(common::FakeCardEncryptor {
            fail: fail_encryption,
        }),
        Arc::new(common::FakeGenericEncryptor),
    )
}

fn visa_output(params: &CardComponentParams, input: CardInputData) -> CardOutputData {
    create_output_data_at(
        params,
        &input,
        &[common::reliable(CardType::Visa)],
        &[],
        &[],
        date!(2026 - 01 - 15),
    )
}

fn visa_input() -> CardInputData {
    CardInputData {
        card_number: CardNumber::new("4111111111111111"),
        expiry_date: ExpiryDate::new(3, 2030),
        security_code: Secret::new("737".to_string()),
        ..CardInputData::default()
    }
}

fn public_key() -> Secret<String> {
    Secret::new(common::PUBLIC_KEY.to_string())
}

#[test]
fn valid_card_produces_encrypted_payload() {
    let params = CardConfiguration::builder(Environment::Test, "test_client_key")
        .shopper_reference("shopper-42")
        .build()
        .unwrap();
    let output = visa_output(&params, visa_input());

    let (state, error) = builder(params, false).build(&output, Some(&public_key()));

    assert!(error.is_none());
    assert!(state.is_valid());
    assert_eq!(state.bin_value, "411111");
    assert_eq!(state.last_four_digits.as_deref(), Some("1111"));
    assert_eq!(
        serde_json::to_value(&state.data).unwrap(),
        json!({
            "paymentMethod": {
                "type": "scheme",
                "encryptedCardNumber": "enc(4111111111111111)",
                "encryptedExpiryMonth": "enc(3)",
                "encryptedExpiryYear": "enc(2030)",
                "encryptedSecurityCode": "enc(737)",
                "brand": "visa",
                "fundingSource": "credit"
            },
            "storePaymentMethod": false,
            "shopperReference": "shopper-42"
        })
    );
}

#[test]
fn missing_public_key_leaves_state_not_ready() {
    let params = common::params();
    let output = visa_output(&params, visa_input());

    let (state, error) = builder(params, false).build(&output, None);

    assert!(error.is_none());
    assert!(state.is_input_valid);
    assert!(!state.is_ready);
    assert_eq!(state.data.payment_method, None);
}

#[test]
fn invalid_input_carries_no_card_data() {
    let params = common::params();
    let input = CardInputData {
        security_code: Secret::new("7".to_string()),
        ..visa_input()
    };
    let output = visa_output(&params, input);

    let (state, error) = builder(params, false).build(&output, Some(&public_key()));

    assert!(error.is_none());
    assert!(!state.is_input_valid);
    assert!(state.is_ready);
    assert_eq!(state.data.payment_method, None);
    assert_eq!(state.bin_value, "411111");
}

#[test]
fn out_of_range_month_is_not_shipped_for_optional_expiry() {
    let params = common::params();
    let mut detected = common::reliable(CardType::Visa);
    detected.expiry_date_policy = FieldPolicy::Optional;
    let input = CardInputData {
        expiry_date: ExpiryDate::from_input("13/30"),
        ..visa_input()
    };
    let output =
        create_output_data_at(&params, &input, &[detected], &[], &[], date!(2026 - 01 - 15));

    let (state, error) = builder(params, false).build(&output, Some(&public_key()));

    assert!(error.is_none());
    assert!(!output.expiry_date_state.is_valid());
    assert!(!state.is_input_valid);
    assert_eq!(state.data.payment_method, None);
}

#[test]
fn encryption_failure_is_reported_once_and_invalidates_state() {
    let params = common::params();
    let output = visa_output(&params, visa_input());

    let (state, error) = builder(params, true).build(&output, Some(&public_key()));

    assert_eq!(
        error.map(|error| *error.current_context()),
        Some(CardComponentError::EncryptionFailed)
    );
    assert!(!state.is_input_valid);
    assert!(state.is_ready);
    assert_eq!(state.data.payment_method, None);
}

#[test]
fn kcp_password_is_encrypted_separately() {
    let params = CardConfiguration::builder(Environment::Test, "test_client_key")
        .kcp_auth_visibility(KcpAuthVisibility::Show)
        .build()
        .unwrap();
    let input = CardInputData {
        kcp_birth_date_or_tax_number: Secret::new("900101".to_string()),
        kcp_card_password: Secret::new("12".to_string()),
        ..visa_input()
    };
    let output = visa_output(&params, input);

    let (state, error) = builder(params, false).build(&output, Some(&public_key()));

    assert!(error.is_none());
    let payment_method = serde_json::to_value(state.data.payment_method.unwrap()).unwrap();
    assert_eq!(payment_method["encryptedPassword"], json!("enc(password:12)"));
    assert_eq!(payment_method["taxNumber"], json!("900101"));
}
