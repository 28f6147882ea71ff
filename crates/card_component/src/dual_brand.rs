//! Resolution of co-badged cards.

use cards::{CardBrand, DetectedCardType};
use serde::Serialize;

/// One brand option of a co-badged card.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct CardBrandItem {
    pub name: String,
    pub brand: CardBrand,
    pub is_selected: bool,
}

/// Brand selection state of a co-badged card.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct DualBrandData {
    /// `None` when the shopper cannot pick the brand.
    pub selected_brand: Option<CardBrand>,
    pub brand_options: Vec<CardBrandItem>,
    pub selectable: bool,
}

/// Orders co-badged brands for display: private label brands first, local schemes after the
/// international brand. The order is otherwise preserved.
pub fn sort_brands(detected_card_types: &[DetectedCardType]) -> Vec<DetectedCardType> {
    let rank = |detected: &DetectedCardType| {
        if detected.card_brand.is_private_label() {
            0
        } else if detected.card_brand.is_local_scheme() {
            2
        } else {
            1
        }
    };

    let mut sorted = detected_card_types.to_vec();
    sorted.sort_by_key(rank);
    sorted
}

/// Builds the dual brand data when at least two reliable brands are detected.
///
/// The selected brand is `selected_card_brand` when it is one of the reliable brands, else the
/// first one. Selection is only offered when every brand is one the shopper can be charged on.
pub fn process_detected_card_types(
    detected_card_types: &[DetectedCardType],
    selected_card_brand: Option<&CardBrand>,
) -> Option<DualBrandData> {
    let reliable = detected_card_types
        .iter()
        .filter(|detected| detected.is_reliable)
        .cloned()
        .collect::<Vec<_>>();
    if reliable.len() < 2 {
        return None;
    }

    let reliable = sort_brands(&reliable);
    let selectable = reliable.iter().all(|detected| {
        detected.card_type().is_some() || detected.card_brand.is_private_label()
    });

    let selected_index = if selectable {
        selected_card_brand
            .and_then(|brand| {
                reliable
                    .iter()
                    .position(|detected| &detected.card_brand == brand)
            })
            .or(Some(0))
    } else {
        None
    };
    let selected_brand = selected_index
        .and_then(|index| reliable.get(index))
        .map(|detected| detected.card_brand.clone());

    let brand_options = reliable
        .iter()
        .enumerate()
        .map(|(index, detected)| CardBrandItem {
            name: brand_name(detected),
            brand: detected.card_brand.clone(),
            is_selected: Some(index) == selected_index,
        })
        .collect();

    Some(DualBrandData {
        selected_brand,
        brand_options,
        selectable,
    })
}

fn brand_name(detected: &DetectedCardType) -> String {
    detected
        .localized_brand
        .clone()
        .or_else(|| detected.card_type().map(|card_type| card_type.display_name().to_string()))
        .unwrap_or_else(|| detected.card_brand.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_enums::CardType;
    use proptest::prelude::*;

    use super::*;

    fn reliable(tx_variant: &str) -> DetectedCardType {
        let mut detected = DetectedCardType::estimated(CardType::Visa, true, true);
        detected.card_brand = CardBrand::new(tx_variant);
        detected
    }

    #[test]
    fn single_reliable_brand_is_not_dual_branded() {
        let mut cartebancaire = reliable("cartebancaire");
        cartebancaire.is_reliable = false;
        assert_eq!(
            process_detected_card_types(&[reliable("visa"), cartebancaire], None),
            None
        );
        assert_eq!(process_detected_card_types(&[], None), None);
    }

    #[test]
    fn local_scheme_follows_the_international_brand() {
        let data =
            process_detected_card_types(&[reliable("cartebancaire"), reliable("visa")], None);
        assert_eq!(
            data,
            Some(DualBrandData {
                selected_brand: Some(CardType::Visa.into()),
                brand_options: vec![
                    CardBrandItem {
                        name: "Visa".to_string(),
                        brand: CardType::Visa.into(),
                        is_selected: true,
                    },
                    CardBrandItem {
                        name: "Cartes Bancaires".to_string(),
                        brand: CardType::CarteBancaire.into(),
                        is_selected: false,
                    },
                ],
                selectable: true,
            })
        );
    }

    #[test]
    fn explicit_selection_wins() {
        let dankort = CardBrand::from(CardType::Dankort);
        let data =
            process_detected_card_types(&[reliable("visa"), reliable("dankort")], Some(&dankort))
                .unwrap();
        assert_eq!(data.selected_brand, Some(dankort));
        assert_eq!(
            data.brand_options
                .iter()
                .map(|item| item.is_selected)
                .collect::<Vec<_>>(),
            vec![false, true]
        );
    }

    #[test]
    fn selection_outside_the_reliable_set_falls_back_to_first() {
        let amex = CardBrand::from(CardType::Amex);
        let data = process_detected_card_types(&[reliable("mc"), reliable("maestro")], Some(&amex));
        assert_eq!(
            data.and_then(|data| data.selected_brand),
            Some(CardType::Mastercard.into())
        );
    }

    #[test]
    fn unknown_network_is_not_selectable() {
        let data =
            process_detected_card_types(&[reliable("mc"), reliable("eftpos_australia")], None)
                .unwrap();
        assert!(!data.selectable);
        assert_eq!(data.selected_brand, None);
        assert!(data.brand_options.iter().all(|item| !item.is_selected));
        assert_eq!(data.brand_options.len(), 2);
    }

    #[test]
    fn private_label_goes_first() {
        let sorted = sort_brands(&[reliable("mc"), reliable("plcc_mc")]);
        assert_eq!(
            sorted
                .iter()
                .map(|detected| detected.card_brand.tx_variant())
                .collect::<Vec<_>>(),
            vec!["plcc_mc", "mc"]
        );
    }

    #[test]
    fn repeated_brand_is_selected_once() {
        let mut debit = reliable("mc");
        debit.payment_method_variant = Some("mcdebit".to_string());
        let mastercard = CardBrand::from(CardType::Mastercard);

        for selected in [None, Some(&mastercard)] {
            let data =
                process_detected_card_types(&[reliable("mc"), debit.clone()], selected).unwrap();
            assert_eq!(data.selected_brand, Some(mastercard.clone()));
            assert_eq!(
                data.brand_options
                    .iter()
                    .map(|item| item.is_selected)
                    .collect::<Vec<_>>(),
                vec![true, false]
            );
        }
    }

    fn tx_variant() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("visa".to_string()),
            Just("mc".to_string()),
            Just("cartebancaire".to_string()),
            Just("dankort".to_string()),
            Just("plcc_mc".to_string()),
            Just("eftpos_australia".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_brand_is_selected(
            brands in prop::collection::vec((tx_variant(), any::<bool>()), 0..6),
            selected in prop::option::of(tx_variant()),
        ) {
            let detected = brands
                .iter()
                .map(|(tx_variant, is_reliable)| {
                    let mut detected = reliable(tx_variant);
                    detected.is_reliable = *is_reliable;
                    detected
                })
                .collect::<Vec<_>>();
            let selected = selected.map(CardBrand::new);

            if let Some(data) = process_detected_card_types(&detected, selected.as_ref()) {
                let selected_count = data.brand_options.iter().filter(|item| item.is_selected).count();
                prop_assert!(selected_count <= 1);
                prop_assert!(data.brand_options.len() >= 2);
            }
        }
    }
}
