use std::fmt;

use masking::{PeekInterface, Secret, Strategy, WithType};
use router_env::logger;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts;

/// Card number as typed by the shopper, stripped of separators.
///
/// The value may be a partial number. It is only ever printed through [`CardNumberStrategy`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardNumber(Secret<String, CardNumberStrategy>);

impl CardNumber {
    /// Normalise the raw input, dropping whitespace and `-` separators.
    pub fn new(raw: &str) -> Self {
        Self(Secret::new(common_utils::validation::normalize(raw)))
    }

    pub fn len(&self) -> usize {
        self.0.peek().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.peek().is_empty()
    }

    /// Returns the first `length` characters of the number.
    pub fn prefix(&self, length: usize) -> String {
        self.0.peek().chars().take(length).collect()
    }

    /// Returns the 6 digit BIN.
    pub fn get_card_isin(&self) -> String {
        self.prefix(consts::BIN_VALUE_LENGTH)
    }

    /// Returns the first 8 digits.
    pub fn get_extended_card_bin(&self) -> String {
        self.prefix(consts::BIN_VALUE_EXTENDED_LENGTH)
    }

    pub fn get_last4(&self) -> String {
        let digits: Vec<char> = self.0.peek().chars().collect();
        let start = digits.len().saturating_sub(consts::LAST_FOUR_LENGTH);
        digits.get(start..).unwrap_or_default().iter().collect()
    }
}

impl PeekInterface<String> for CardNumber {
    fn peek(&self) -> &String {
        self.0.peek()
    }
}

impl From<&str> for CardNumber {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Serialize for CardNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Serialized form is masked, card numbers leave the process only encrypted.
        serializer.serialize_str(&format!("{:?}", self.0))
    }
}

impl<'de> Deserialize<'de> for CardNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::new(&s))
    }
}

pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val_str: &str = val.as_ref();

        if val_str.len() < consts::MINIMUM_CARD_NUMBER_LENGTH
            || val_str.len() > consts::MAXIMUM_CARD_NUMBER_LENGTH
        {
            return WithType::fmt(val, f);
        }

        if let Some(value) = val_str.get(..consts::BIN_VALUE_LENGTH) {
            write!(
                f,
                "{}{}",
                value,
                "*".repeat(val_str.len().saturating_sub(consts::BIN_VALUE_LENGTH))
            )
        } else {
            logger::error!("Card number is not valid UTF-8 at the BIN boundary");
            WithType::fmt(val, f)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn card_number_no_whitespace() {
        let card_number = CardNumber::new("3714 4963-5398 431");
        assert_eq!(card_number.peek(), "371449635398431");
        assert_eq!(card_number.len(), 15);
    }

    #[test]
    fn test_valid_card_number_masking() {
        let secret: Secret<String, CardNumberStrategy> =
            Secret::new("1234567890987654".to_string());
        assert_eq!("123456**********", format!("{secret:?}"));
    }

    #[test]
    fn test_short_card_number_masking() {
        let card_number = CardNumber::new("411111");
        assert_eq!(
            "CardNumber(*** alloc::string::String ***)",
            format!("{card_number:?}")
        );
    }

    #[test]
    fn test_bin_and_last_four() {
        let card_number = CardNumber::new("4111 1111 1111 1234");
        assert_eq!(card_number.get_card_isin(), "411111");
        assert_eq!(card_number.get_extended_card_bin(), "41111111");
        assert_eq!(card_number.get_last4(), "1234");
        assert_eq!(CardNumber::new("12").get_last4(), "12");
    }

    #[test]
    fn test_card_number_serializes_masked() {
        let card_number = CardNumber::new("4111111111111111");
        let json = serde_json::to_string(&card_number).unwrap();
        assert_eq!(json, r#""411111**********""#);
    }

    #[test]
    fn test_card_number_deserialization_normalizes() {
        let card_number = serde_json::from_str::<CardNumber>(r#""4111 1111 1111 1111""#).unwrap();
        assert_eq!(card_number.peek(), "4111111111111111");
    }
}
