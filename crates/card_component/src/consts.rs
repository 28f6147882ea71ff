/// Payment method type of a new card.
pub const PAYMENT_METHOD_TYPE_SCHEME: &str = "scheme";

/// Field key under which the KCP password is encrypted.
pub const ENCRYPTION_KEY_FOR_KCP_PASSWORD: &str = "password";

/// Placeholder for address fields the shopper did not fill in.
pub const ADDRESS_NULL_PLACEHOLDER: &str = "null";

/// Placeholder country when only the postal code is collected.
pub const ADDRESS_COUNTRY_NULL_PLACEHOLDER: &str = "ZZ";

pub const DEFAULT_SHOPPER_LOCALE: &str = "en-US";
