/// Whether a form field is displayed, and whether it must be filled in.
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
pub enum InputFieldUiState {
    #[default]
    Required,
    Optional,
    Hidden,
}

impl InputFieldUiState {
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// When the security code field is shown for a new card.
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
pub enum CvcVisibility {
    /// Shown for every brand, optional where the brand allows it.
    #[default]
    AlwaysShow,
    /// Hidden until a reliable brand with a security code is detected.
    HideFirst,
    AlwaysHide,
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
pub enum KcpAuthVisibility {
    Show,
    #[default]
    Hide,
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
pub enum SocialSecurityNumberVisibility {
    Show,
    #[default]
    Hide,
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
pub enum AddressFormUiState {
    #[default]
    None,
    PostalCode,
    FullAddress,
}

/// What the KCP birth date or tax number field currently expects.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KcpBirthDateOrTaxNumberHint {
    #[default]
    BirthDate,
    TaxNumber,
}
