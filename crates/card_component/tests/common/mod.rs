#![allow(dead_code, clippy::unwrap_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use card_component::{
    address::AddressItem,
    delegate::CardServices,
    errors::{ApiError, CustomResult, EncryptionError},
    services::{
        AddressRepository, CardEncryptor, DetectCardTypeRepository, DetectedCardTypesStream,
        EncryptedCard, GenericEncryptor, PublicKeyRepository, UnencryptedCard,
    },
    CardComponentParams, CardConfiguration,
};
use cards::{CardBrand, CardNumber, DetectedCardType};
use common_enums::{CardType, Environment, FieldPolicy};
use error_stack::report;
use futures::StreamExt;
use masking::{PeekInterface, Secret};

pub const PUBLIC_KEY: &str = "10001|A237060180D24CDEF3E4E27D828BDB6A13E12C6959820770D7F2C1671DD0AEF4729670C20C6C5967C664D18955058B69549FBE8BF3609EF64832D7C033008A818700A9B0458641C5824F5FCBB9FF83D5A83EBDF079E73B81ACA9CA52FDBCAD7CD9D6A337A4511759FA21E34CD166B9BABD512DB7B2293C0FE48B97CAB3DE8F6F1A8E49C08D23A98E986B8A995A8F382220F06338622631435736FA064AEAC5BD223BAF42AF2B66F1FEA34EF3C297F09C10B364B994EA287A5602ACF153D0B4B09A604B987397684D19DBC5E6FE7E4FFE72390D28D6E21CA3391FA3CAADAD80A729FEF4823F6BE9711D4D51BF4DFCB6A3607686B34ACCE18329D415350FD0654D";

pub fn params() -> CardComponentParams {
    CardConfiguration::builder(Environment::Test, "test_client_key")
        .build()
        .unwrap()
}

/// A reliable, supported detection of `card_type` with the default local policies.
pub fn reliable(card_type: CardType) -> DetectedCardType {
    DetectedCardType::estimated(card_type, true, true)
}

pub fn with_cvc_policy(mut detected: DetectedCardType, cvc_policy: FieldPolicy) -> DetectedCardType {
    detected.cvc_policy = cvc_policy;
    detected
}

#[derive(Debug)]
pub struct FakePublicKeyRepository {
    pub public_key: Option<String>,
}

impl FakePublicKeyRepository {
    pub fn succeeding() -> Self {
        Self {
            public_key: Some(PUBLIC_KEY.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { public_key: None }
    }
}

#[async_trait::async_trait]
impl PublicKeyRepository for FakePublicKeyRepository {
    async fn fetch_public_key(
        &self,
        _environment: Environment,
        _client_key: &Secret<String>,
    ) -> CustomResult<Secret<String>, ApiError> {
        self.public_key
            .clone()
            .map(Secret::new)
            .ok_or_else(|| report!(ApiError::RequestFailed { endpoint: "publicKeys" }))
    }
}

/// Answers detection requests per card number. Unknown numbers detect nothing.
#[derive(Debug, Default)]
pub struct FakeDetectCardTypeRepository {
    detections: Mutex<HashMap<String, Option<Vec<DetectedCardType>>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeDetectCardTypeRepository {
    pub fn detects(self, card_number: &str, detected: Vec<DetectedCardType>) -> Self {
        self.detections
            .lock()
            .unwrap()
            .insert(card_number.to_string(), Some(detected));
        self
    }

    pub fn fails_for(self, card_number: &str) -> Self {
        self.detections
            .lock()
            .unwrap()
            .insert(card_number.to_string(), None);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl DetectCardTypeRepository for FakeDetectCardTypeRepository {
    fn detect_card_type(
        &self,
        card_number: &CardNumber,
        _public_key: Option<&Secret<String>>,
        _supported_card_brands: &[CardBrand],
        _environment: Environment,
        _client_key: &Secret<String>,
    ) -> DetectedCardTypesStream {
        let number = card_number.peek().clone();
        self.requests.lock().unwrap().push(number.clone());

        let result = match self.detections.lock().unwrap().get(&number) {
            Some(Some(detected)) => Ok(detected.clone()),
            Some(None) => Err(report!(ApiError::RequestFailed { endpoint: "binLookup" })),
            None => Ok(Vec::new()),
        };
        futures::stream::iter([result]).boxed()
    }
}

#[derive(Debug, Default)]
pub struct FakeAddressRepository {
    pub countries: Vec<AddressItem>,
    pub states: HashMap<String, Vec<AddressItem>>,
    state_requests: Mutex<Vec<String>>,
}

impl FakeAddressRepository {
    pub fn with_countries(countries: &[(&str, &str)]) -> Self {
        Self {
            countries: countries.iter().map(|(id, name)| address_item(id, name)).collect(),
            ..Self::default()
        }
    }

    pub fn with_states(mut self, country_code: &str, states: &[(&str, &str)]) -> Self {
        self.states.insert(
            country_code.to_string(),
            states.iter().map(|(id, name)| address_item(id, name)).collect(),
        );
        self
    }

    pub fn state_requests(&self) -> Vec<String> {
        self.state_requests.lock().unwrap().clone()
    }
}

pub fn address_item(id: &str, name: &str) -> AddressItem {
    AddressItem {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
    }
}

#[async_trait::async_trait]
impl AddressRepository for FakeAddressRepository {
    async fn get_country_list(
        &self,
        _shopper_locale: &str,
        _environment: Environment,
    ) -> CustomResult<Vec<AddressItem>, ApiError> {
        Ok(self.countries.clone())
    }

    async fn get_state_list(
        &self,
        _shopper_locale: &str,
        _environment: Environment,
        country_code: &str,
    ) -> CustomResult<Vec<AddressItem>, ApiError> {
        self.state_requests
            .lock()
            .unwrap()
            .push(country_code.to_string());
        Ok(self.states.get(country_code).cloned().unwrap_or_default())
    }
}

/// Wraps every value as `enc(<value>)`.
#[derive(Debug, Default)]
pub struct FakeCardEncryptor {
    pub fail: bool,
}

fn encrypted(value: &str) -> Secret<String> {
    Secret::new(format!("enc({value})"))
}

impl CardEncryptor for FakeCardEncryptor {
    fn encrypt_fields(
        &self,
        card: &UnencryptedCard,
        _public_key: &Secret<String>,
    ) -> CustomResult<EncryptedCard, EncryptionError> {
        if self.fail {
            return Err(report!(EncryptionError::FieldEncryptionFailed { field: "number" }));
        }
        Ok(EncryptedCard {
            encrypted_card_number: card.number.as_ref().map(|number| encrypted(number.peek())),
            encrypted_expiry_month: card.expiry_month.as_ref().map(|month| encrypted(month.peek())),
            encrypted_expiry_year: card.expiry_year.as_ref().map(|year| encrypted(year.peek())),
            encrypted_security_code: card.cvc.as_ref().map(|cvc| encrypted(cvc.peek())),
        })
    }

    fn encrypt_bin(
        &self,
        bin: &str,
        _public_key: &Secret<String>,
    ) -> CustomResult<Secret<String>, EncryptionError> {
        Ok(encrypted(bin))
    }
}

#[derive(Debug, Default)]
pub struct FakeGenericEncryptor;

impl GenericEncryptor for FakeGenericEncryptor {
    fn encrypt_field(
        &self,
        field_key: &str,
        value: &Secret<String>,
        _public_key: &Secret<String>,
    ) -> CustomResult<Secret<String>, EncryptionError> {
        Ok(Secret::new(format!("enc({field_key}:{})", value.peek())))
    }
}

pub struct Fakes {
    pub public_key_repository: Arc<FakePublicKeyRepository>,
    pub detect_card_type_repository: Arc<FakeDetectCardTypeRepository>,
    pub address_repository: Arc<FakeAddressRepository>,
    pub card_encryptor: Arc<FakeCardEncryptor>,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            public_key_repository: Arc::new(FakePublicKeyRepository::succeeding()),
            detect_card_type_repository: Arc::new(FakeDetectCardTypeRepository::default()),
            address_repository: Arc::new(FakeAddressRepository::default()),
            card_encryptor: Arc::new(FakeCardEncryptor::default()),
        }
    }
}

impl Fakes {
    pub fn services(&self) -> CardServices {
        CardServices {
            public_key_repository: self.public_key_repository.clone(),
            detect_card_type_repository: self.detect_card_type_repository.clone(),
            address_repository: self.address_repository.clone(),
            card_encryptor: self.card_encryptor.clone(),
            generic_encryptor: Arc::new(FakeGenericEncryptor),
        }
    }
}
