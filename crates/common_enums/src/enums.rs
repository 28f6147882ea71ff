mod ui;

pub use ui::*;

/// Card brands known to the local brand table, keyed by their transaction variant.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardType {
    Amex,
    Argencard,
    Bcmc,
    Bijcard,
    Cabal,
    #[serde(rename = "cartebancaire")]
    #[strum(serialize = "cartebancaire")]
    CarteBancaire,
    Codensa,
    #[serde(rename = "cup")]
    #[strum(serialize = "cup")]
    ChinaUnionPay,
    Dankort,
    #[serde(rename = "diners")]
    #[strum(serialize = "diners")]
    DinersClub,
    Discover,
    Elo,
    Forbrugsforeningen,
    Hipercard,
    Jcb,
    #[serde(rename = "karenmillen")]
    #[strum(serialize = "karenmillen")]
    KarenMillen,
    Laser,
    Maestro,
    #[serde(rename = "maestrouk")]
    #[strum(serialize = "maestrouk")]
    MaestroUk,
    #[serde(rename = "mc")]
    #[strum(serialize = "mc")]
    Mastercard,
    Mir,
    Naranja,
    Oasis,
    Shopping,
    Solo,
    Troy,
    Uatp,
    Visa,
    #[serde(rename = "visadankort")]
    #[strum(serialize = "visadankort")]
    VisaDankort,
}

impl CardType {
    /// Brand name shown to the shopper.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Amex => "American Express",
            Self::Argencard => "Argencard",
            Self::Bcmc => "Bancontact card",
            Self::Bijcard => "de Bijenkorf Card",
            Self::Cabal => "Cabal",
            Self::CarteBancaire => "Cartes Bancaires",
            Self::Codensa => "Codensa",
            Self::ChinaUnionPay => "China UnionPay",
            Self::Dankort => "Dankort",
            Self::DinersClub => "Diners Club",
            Self::Discover => "Discover",
            Self::Elo => "Elo",
            Self::Forbrugsforeningen => "Forbrugsforeningen",
            Self::Hipercard => "Hipercard",
            Self::Jcb => "JCB",
            Self::KarenMillen => "Karen Millen",
            Self::Laser => "Laser",
            Self::Maestro => "Maestro",
            Self::MaestroUk => "Maestro UK",
            Self::Mastercard => "Mastercard",
            Self::Mir => "MIR",
            Self::Naranja => "Naranja",
            Self::Oasis => "Oasis",
            Self::Shopping => "Tarjeta Shopping",
            Self::Solo => "Solo",
            Self::Troy => "Troy",
            Self::Uatp => "UATP",
            Self::Visa => "Visa",
            Self::VisaDankort => "Visa Dankort",
        }
    }

    /// Brands whose security code is four digits long.
    pub fn has_four_digit_security_code(self) -> bool {
        matches!(self, Self::Amex)
    }

    /// Domestic schemes usually co-badged with an international brand.
    pub fn is_local_scheme(self) -> bool {
        matches!(self, Self::CarteBancaire | Self::Bcmc | Self::Dankort)
    }
}

/// Policy the card brand applies to an input field.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FieldPolicy {
    #[default]
    Required,
    Optional,
    Hidden,
}

impl FieldPolicy {
    /// Whether the field must be filled in.
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Test,
    Europe,
    UnitedStates,
    Australia,
    India,
    Apse,
}

impl Environment {
    /// Base url of the checkout API for this environment.
    pub fn checkout_base_url(self) -> &'static str {
        match self {
            Self::Test => "https://checkoutshopper-test.adyen.com/checkoutshopper/",
            Self::Europe => "https://checkoutshopper-live.adyen.com/checkoutshopper/",
            Self::UnitedStates => "https://checkoutshopper-live-us.adyen.com/checkoutshopper/",
            Self::Australia => "https://checkoutshopper-live-au.adyen.com/checkoutshopper/",
            Self::India => "https://checkoutshopper-live-in.adyen.com/checkoutshopper/",
            Self::Apse => "https://checkoutshopper-live-apse.adyen.com/checkoutshopper/",
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FundingSource {
    #[default]
    Credit,
    Debit,
}

/// Kind of installment plan offered to the shopper.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InstallmentOption {
    OneTime,
    Revolving,
    Regular,
}
