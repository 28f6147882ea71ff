//! Installment options offered for the resolved card brand.

use cards::CardBrand;
use common_enums::{FundingSource, InstallmentOption};
use error_stack::report;
use serde::Serialize;

use crate::{
    configuration::Amount,
    errors::{ConfigurationError, CustomResult},
};

/// Number of installments reported for a revolving plan.
const REVOLVING_INSTALLMENT_VALUE: u32 = 1;

/// One set of installment options. Every regular value must allow at least two installments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallmentOptions {
    values: Vec<u32>,
    include_revolving: bool,
}

impl InstallmentOptions {
    pub fn new(values: Vec<u32>, include_revolving: bool) -> CustomResult<Self, ConfigurationError> {
        if let Some(value) = values.iter().copied().find(|value| *value <= 1) {
            return Err(report!(ConfigurationError::InvalidInstallmentValue { value }));
        }

        Ok(Self {
            values,
            include_revolving,
        })
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn include_revolving(&self) -> bool {
        self.include_revolving
    }
}

/// Installment options that only apply to one card brand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CardBasedInstallmentOptions {
    pub card_brand: CardBrand,
    pub options: InstallmentOptions,
}

impl CardBasedInstallmentOptions {
    pub fn new(
        card_brand: CardBrand,
        values: Vec<u32>,
        include_revolving: bool,
    ) -> CustomResult<Self, ConfigurationError> {
        Ok(Self {
            card_brand,
            options: InstallmentOptions::new(values, include_revolving)?,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstallmentConfiguration {
    default_options: Option<InstallmentOptions>,
    card_based_options: Vec<CardBasedInstallmentOptions>,
    show_installment_amount: bool,
}

impl InstallmentConfiguration {
    /// Fails when more than one set of options is given for the same brand.
    pub fn new(
        default_options: Option<InstallmentOptions>,
        card_based_options: Vec<CardBasedInstallmentOptions>,
        show_installment_amount: bool,
    ) -> CustomResult<Self, ConfigurationError> {
        let duplicate = card_based_options.iter().enumerate().find_map(|(index, options)| {
            card_based_options
                .iter()
                .skip(index + 1)
                .any(|other| other.card_brand == options.card_brand)
                .then(|| options.card_brand.clone())
        });

        if let Some(card_brand) = duplicate {
            return Err(report!(ConfigurationError::DuplicateInstallmentCardBrand {
                card_brand: card_brand.to_string(),
            }));
        }

        Ok(Self {
            default_options,
            card_based_options,
            show_installment_amount,
        })
    }

    pub fn default_options(&self) -> Option<&InstallmentOptions> {
        self.default_options.as_ref()
    }

    pub fn card_based_options(&self) -> &[CardBasedInstallmentOptions] {
        &self.card_based_options
    }

    pub fn show_installment_amount(&self) -> bool {
        self.show_installment_amount
    }

    fn options_for(&self, card_brand: &CardBrand) -> Option<&InstallmentOptions> {
        self.card_based_options
            .iter()
            .find(|options| &options.card_brand == card_brand)
            .map(|options| &options.options)
    }
}

/// One entry of the installment selector.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct InstallmentModel {
    pub option: InstallmentOption,
    /// `None` for a one-time payment.
    pub number_of_installments: Option<u32>,
    /// Amount charged per installment, present when the amount is shown next to the option.
    pub amount_per_installment: Option<Amount>,
}

impl InstallmentModel {
    fn new(
        option: InstallmentOption,
        number_of_installments: Option<u32>,
        amount: Option<&Amount>,
        show_amount: bool,
    ) -> Self {
        let amount_per_installment = match (option, show_amount, amount) {
            (InstallmentOption::Regular, true, Some(amount)) => number_of_installments
                .filter(|installments| *installments > 0)
                .map(|installments| amount.divided_by(installments)),
            _ => None,
        };

        Self {
            option,
            number_of_installments,
            amount_per_installment,
        }
    }

    pub fn one_time() -> Self {
        Self::new(InstallmentOption::OneTime, None, None, false)
    }
}

/// Installment plan attached to the payment request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Installments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<InstallmentOption>,
    pub value: u32,
}

/// Options to offer for the resolved brand.
///
/// Brand specific options only apply once the brand is reliably detected, otherwise the default
/// options are used. Debit cards are never offered installments.
pub fn make_installment_options(
    configuration: Option<&InstallmentConfiguration>,
    funding_source: FundingSource,
    card_brand: Option<&CardBrand>,
    is_card_type_reliable: bool,
    amount: Option<&Amount>,
) -> Vec<InstallmentModel> {
    let Some(configuration) = configuration else {
        return Vec::new();
    };
    if funding_source == FundingSource::Debit {
        return Vec::new();
    }

    let card_based = card_brand
        .filter(|_| is_card_type_reliable)
        .and_then(|card_brand| configuration.options_for(card_brand));

    card_based
        .or(configuration.default_options())
        .map(|options| {
            make_installment_model_list(options, amount, configuration.show_installment_amount)
        })
        .unwrap_or_default()
}

fn make_installment_model_list(
    options: &InstallmentOptions,
    amount: Option<&Amount>,
    show_amount: bool,
) -> Vec<InstallmentModel> {
    let revolving = options.include_revolving().then(|| {
        InstallmentModel::new(
            InstallmentOption::Revolving,
            Some(REVOLVING_INSTALLMENT_VALUE),
            amount,
            show_amount,
        )
    });

    std::iter::once(InstallmentModel::one_time())
        .chain(revolving)
        .chain(options.values().iter().map(|value| {
            InstallmentModel::new(InstallmentOption::Regular, Some(*value), amount, show_amount)
        }))
        .collect()
}

/// Maps the selected option to the request object. A one-time payment carries none.
pub fn make_installment_model_object(model: Option<&InstallmentModel>) -> Option<Installments> {
    let model = model?;
    match model.option {
        InstallmentOption::Regular | InstallmentOption::Revolving => Some(Installments {
            plan: Some(model.option),
            value: model.number_of_installments?,
        }),
        InstallmentOption::OneTime => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_enums::CardType;
    use proptest::prelude::*;

    use super::*;

    fn configuration() -> InstallmentConfiguration {
        InstallmentConfiguration::new(
            Some(InstallmentOptions::new(vec![2, 3], false).unwrap()),
            vec![CardBasedInstallmentOptions::new(CardType::Visa.into(), vec![3, 6, 12], true).unwrap()],
            false,
        )
        .unwrap()
    }

    #[test]
    fn card_based_options_need_a_reliable_brand() {
        let configuration = configuration();
        let visa = CardBrand::from(CardType::Visa);

        let reliable = make_installment_options(
            Some(&configuration),
            FundingSource::Credit,
            Some(&visa),
            true,
            None,
        );
        let options = reliable
            .iter()
            .map(|model| (model.option, model.number_of_installments))
            .collect::<Vec<_>>();
        assert_eq!(
            options,
            vec![
                (InstallmentOption::OneTime, None),
                (InstallmentOption::Revolving, Some(1)),
                (InstallmentOption::Regular, Some(3)),
                (InstallmentOption::Regular, Some(6)),
                (InstallmentOption::Regular, Some(12)),
            ]
        );

        let unreliable = make_installment_options(
            Some(&configuration),
            FundingSource::Credit,
            Some(&visa),
            false,
            None,
        );
        assert_eq!(unreliable.len(), 3);
    }

    #[test]
    fn debit_cards_get_no_installments() {
        let configuration = configuration();
        assert!(make_installment_options(
            Some(&configuration),
            FundingSource::Debit,
            None,
            false,
            None
        )
        .is_empty());
    }

    #[test]
    fn no_configuration_offers_nothing() {
        assert!(make_installment_options(None, FundingSource::Credit, None, true, None).is_empty());
    }

    #[test]
    fn duplicate_card_brand_is_rejected() {
        let options = || {
            CardBasedInstallmentOptions::new(CardType::Mastercard.into(), vec![2], false).unwrap()
        };
        let error = InstallmentConfiguration::new(None, vec![options(), options()], false)
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConfigurationError::DuplicateInstallmentCardBrand {
                card_brand: "mc".to_string()
            }
        );
    }

    #[test]
    fn shown_amount_is_split_per_installment() {
        let configuration = InstallmentConfiguration::new(
            Some(InstallmentOptions::new(vec![4], false).unwrap()),
            Vec::new(),
            true,
        )
        .unwrap();
        let amount = Amount::new(1000, "EUR");

        let options = make_installment_options(
            Some(&configuration),
            FundingSource::Credit,
            None,
            false,
            Some(&amount),
        );
        let regular = options.last().unwrap();
        assert_eq!(regular.amount_per_installment, Some(Amount::new(250, "EUR")));
        assert_eq!(options.first().unwrap().amount_per_installment, None);
    }

    #[test]
    fn one_time_has_no_request_object() {
        assert_eq!(make_installment_model_object(Some(&InstallmentModel::one_time())), None);
        assert_eq!(make_installment_model_object(None), None);

        let regular = InstallmentModel::new(InstallmentOption::Regular, Some(6), None, false);
        assert_eq!(
            make_installment_model_object(Some(&regular)),
            Some(Installments {
                plan: Some(InstallmentOption::Regular),
                value: 6
            })
        );
    }

    proptest! {
        #[test]
        fn values_of_at_least_two_are_accepted(values in prop::collection::vec(2u32..100, 0..8), revolving: bool) {
            prop_assert!(InstallmentOptions::new(values, revolving).is_ok());
        }

        #[test]
        fn any_value_below_two_is_rejected(
            mut values in prop::collection::vec(2u32..100, 0..8),
            invalid in 0u32..2,
            position in any::<prop::sample::Index>(),
        ) {
            let index = position.index(values.len() + 1);
            values.insert(index, invalid);
            prop_assert!(InstallmentOptions::new(values, false).is_err());
        }
    }
}
