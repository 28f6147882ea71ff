//! Card brands and the local brand table.
//!
//! The table matches a typed prefix against the IIN ranges of every known brand. A brand stays a
//! candidate while the prefix can still grow into a valid number of that brand.

#![deny(clippy::invalid_regex)]

use std::{fmt, sync::LazyLock};

use common_enums::{CardType, FieldPolicy};
use regex::Regex;
use router_env::logger;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{consts, CardNumber};

/// Brand of a card, identified by its transaction variant.
///
/// Server side detection may report brands missing from [`CardType`], such as private label
/// cards, so the variant is kept as a string.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardBrand {
    tx_variant: String,
}

impl CardBrand {
    pub fn new(tx_variant: impl Into<String>) -> Self {
        Self {
            tx_variant: tx_variant.into(),
        }
    }

    pub fn tx_variant(&self) -> &str {
        &self.tx_variant
    }

    pub fn card_type(&self) -> Option<CardType> {
        self.tx_variant.parse().ok()
    }

    /// Private label and co-branded private label cards.
    pub fn is_private_label(&self) -> bool {
        self.tx_variant.starts_with("plcc_") || self.tx_variant.starts_with("cbcc_")
    }

    pub fn is_local_scheme(&self) -> bool {
        self.card_type().is_some_and(CardType::is_local_scheme)
    }
}

impl From<CardType> for CardBrand {
    fn from(card_type: CardType) -> Self {
        Self::new(card_type.to_string())
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tx_variant)
    }
}

/// One candidate brand for the typed card number, with the field policies the brand applies.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DetectedCardType {
    pub card_brand: CardBrand,
    /// Confirmed by a BIN lookup, or the only locally possible brand.
    pub is_reliable: bool,
    pub enable_luhn_check: bool,
    pub cvc_policy: FieldPolicy,
    pub expiry_date_policy: FieldPolicy,
    /// Whether the merchant accepts the brand.
    pub is_supported: bool,
    pub pan_length: Option<usize>,
    pub payment_method_variant: Option<String>,
    pub localized_brand: Option<String>,
    pub is_selected: bool,
}

impl DetectedCardType {
    /// A local estimate for `card_type`.
    pub fn estimated(card_type: CardType, is_reliable: bool, is_supported: bool) -> Self {
        Self {
            card_brand: card_type.into(),
            is_reliable,
            enable_luhn_check: true,
            cvc_policy: match card_type {
                CardType::Bcmc => FieldPolicy::Hidden,
                _ => FieldPolicy::Required,
            },
            expiry_date_policy: FieldPolicy::Required,
            is_supported,
            pan_length: None,
            payment_method_variant: None,
            localized_brand: None,
            is_selected: false,
        }
    }

    pub fn card_type(&self) -> Option<CardType> {
        self.card_brand.card_type()
    }
}

/// Outcome of matching a prefix against the brand table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BrandMatch {
    /// Nothing typed yet.
    Empty,
    /// Digits typed but no brand has a range starting with them.
    NoMatch,
    /// More than one brand is still possible.
    Ambiguous(Vec<CardType>),
    Unique(CardType),
}

impl BrandMatch {
    pub fn candidates(&self) -> Vec<CardType> {
        match self {
            Self::Empty | Self::NoMatch => Vec::new(),
            Self::Ambiguous(card_types) => card_types.clone(),
            Self::Unique(card_type) => vec![*card_type],
        }
    }
}

fn brand_pattern(card_type: CardType) -> &'static str {
    match card_type {
        CardType::Amex => r"^3[47][0-9]{0,13}$",
        CardType::Argencard => r"^(50)(1)\d*$",
        CardType::Bcmc => r"^((6703)[0-9]{0,15}|(479658|606005)[0-9]{0,13})$",
        CardType::Bijcard => r"^(5100081)[0-9]{0,9}$",
        CardType::Cabal => r"^(58)(8|9)\d*$",
        CardType::CarteBancaire => r"^[4-6][0-9]{0,15}$",
        CardType::Codensa => r"^(590712)[0-9]{0,10}$",
        CardType::ChinaUnionPay => r"^(62|81)[0-9]{0,17}$",
        CardType::Dankort => r"^(5019)[0-9]{0,12}$",
        CardType::DinersClub => r"^(36)[0-9]{0,12}$",
        CardType::Discover => {
            r"^(6011[0-9]{0,12}|(644|645|646|647|648|649)[0-9]{0,13}|65[0-9]{0,14})$"
        }
        CardType::Elo => {
            r"^((((636368)|(438935)|(504175)|(451416)|(636297))[0-9]{0,10})|((5067)|(4576)|(4011))[0-9]{0,12})$"
        }
        CardType::Forbrugsforeningen => r"^(60)(0)\d*$",
        CardType::Hipercard => r"^(606282)[0-9]{0,10}$",
        CardType::Jcb => r"^(352[8-9]{1}[0-9]{0,15}|35[3-8]{1}[0-9]{0,15})$",
        CardType::KarenMillen => r"^(98261465)[0-9]{0,8}$",
        CardType::Laser => r"^(6304|6706|6709|6771)[0-9]{0,15}$",
        CardType::Maestro => r"^(5[0|6-8][0-9]{0,17}|6[0-9]{0,18})$",
        CardType::MaestroUk => r"^(6759)[0-9]{0,15}$",
        CardType::Mastercard => r"^(5[1-5][0-9]{0,14}|2[2-7][0-9]{0,14})$",
        CardType::Mir => r"^(220)[0-9]{0,16}$",
        CardType::Naranja => r"^(37|40|5[28])([279])\d*$",
        CardType::Oasis => r"^(982616)[0-9]{0,10}$",
        CardType::Shopping => r"^(27|58|60)\d*$",
        CardType::Solo => r"^(6767)[0-9]{0,15}$",
        CardType::Troy => r"^(9792)[0-9]{0,12}$",
        CardType::Uatp => r"^1[0-9]{0,14}$",
        CardType::Visa => r"^4[0-9]{0,18}$",
        CardType::VisaDankort => r"^(4571)[0-9]{0,12}$",
    }
}

static BRAND_TABLE: LazyLock<Vec<(CardType, Regex)>> = LazyLock::new(|| {
    CardType::iter()
        .filter_map(|card_type| {
            Regex::new(brand_pattern(card_type))
                .map_err(|_err| logger::error!(?_err, %card_type, "invalid brand pattern"))
                .ok()
                .map(|regex| (card_type, regex))
        })
        .collect()
});

/// Brands whose IIN range is consistent with the digits typed so far, in table order.
pub fn estimate(card_number: &CardNumber) -> Vec<CardType> {
    use masking::PeekInterface;

    let number = card_number.peek();
    if number.is_empty() {
        return Vec::new();
    }

    BRAND_TABLE
        .iter()
        .filter(|(_, regex)| regex.is_match(number))
        .map(|(card_type, _)| *card_type)
        .collect()
}

pub fn classify(card_number: &CardNumber) -> BrandMatch {
    if card_number.is_empty() {
        return BrandMatch::Empty;
    }

    let mut candidates = estimate(card_number);
    match candidates.len() {
        0 => BrandMatch::NoMatch,
        1 => candidates
            .pop()
            .map_or(BrandMatch::NoMatch, BrandMatch::Unique),
        _ => BrandMatch::Ambiguous(candidates),
    }
}

/// Local brand estimate for the typed number.
///
/// A candidate is reliable only when it is the single possible brand and the number already
/// covers the reliable prefix length. Unsupported brands are kept, flagged `is_supported: false`.
pub fn detect_locally(
    card_number: &CardNumber,
    supported_card_brands: &[CardBrand],
) -> Vec<DetectedCardType> {
    let brand_match = classify(card_number);
    let long_enough = card_number.len() >= consts::RELIABLE_PREFIX_LENGTH;
    let is_unique = matches!(brand_match, BrandMatch::Unique(_));

    brand_match
        .candidates()
        .into_iter()
        .map(|card_type| {
            let is_supported = supported_card_brands
                .iter()
                .any(|brand| brand.card_type() == Some(card_type));
            DetectedCardType::estimated(card_type, is_unique && long_enough, is_supported)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn all_patterns_compile() -> bool {
        BRAND_TABLE.len() == CardType::iter().count()
    }

    #[test]
    fn brand_table_is_complete() {
        assert!(all_patterns_compile());
    }

    #[test_case("4111111111111111", &[CardType::CarteBancaire, CardType::Visa])]
    #[test_case("371449635398431", &[CardType::Amex])]
    #[test_case("5555444433331111", &[CardType::CarteBancaire, CardType::Mastercard])]
    #[test_case("2221", &[CardType::Mastercard])]
    #[test_case("36", &[CardType::DinersClub])]
    #[test_case("9792", &[CardType::Troy])]
    #[test_case("7", &[])]
    fn estimate_candidates(number: &str, expected: &[CardType]) {
        assert_eq!(estimate(&CardNumber::new(number)), expected);
    }

    #[test]
    fn classify_distinguishes_no_match_from_ambiguous() {
        assert_eq!(classify(&CardNumber::new("")), BrandMatch::Empty);
        assert_eq!(classify(&CardNumber::new("7777")), BrandMatch::NoMatch);
        assert_eq!(
            classify(&CardNumber::new("3714")),
            BrandMatch::Unique(CardType::Amex)
        );
        assert!(matches!(
            classify(&CardNumber::new("4111")),
            BrandMatch::Ambiguous(_)
        ));
    }

    #[test]
    fn detect_locally_marks_unique_long_prefix_reliable() {
        let supported = [CardBrand::from(CardType::Amex)];

        let short = detect_locally(&CardNumber::new("3714"), &supported);
        assert_eq!(short.len(), 1);
        assert!(!short.iter().any(|detected| detected.is_reliable));

        let long = detect_locally(&CardNumber::new("37144963539"), &supported);
        assert!(long.iter().all(|detected| detected.is_reliable));
        assert!(long.iter().all(|detected| detected.is_supported));
    }

    #[test]
    fn detect_locally_keeps_unsupported_brands() {
        let supported = [CardBrand::from(CardType::Visa)];
        let detected = detect_locally(&CardNumber::new("4111111111111111"), &supported);

        let brands: Vec<_> = detected
            .iter()
            .map(|detected| (detected.card_brand.tx_variant(), detected.is_supported))
            .collect();
        assert_eq!(brands, vec![("cartebancaire", false), ("visa", true)]);
        assert!(detected.iter().all(|detected| !detected.is_reliable));
    }

    #[test]
    fn bcmc_estimate_hides_security_code() {
        let detected = DetectedCardType::estimated(CardType::Bcmc, false, true);
        assert_eq!(detected.cvc_policy, FieldPolicy::Hidden);
        assert_eq!(detected.expiry_date_policy, FieldPolicy::Required);
        assert!(detected.enable_luhn_check);
    }

    #[test]
    fn card_brand_helpers() {
        assert!(CardBrand::new("plcc_acme").is_private_label());
        assert!(CardBrand::from(CardType::CarteBancaire).is_local_scheme());
        assert_eq!(CardBrand::new("eft_pos").card_type(), None);
        assert_eq!(CardBrand::new("mc").card_type(), Some(CardType::Mastercard));
    }
}
