//! Card validation constants.

/// Shortest card number that can be validated.
pub const MINIMUM_CARD_NUMBER_LENGTH: usize = 8;

/// Longest card number of any brand.
pub const MAXIMUM_CARD_NUMBER_LENGTH: usize = 19;

pub const GENERAL_CARD_SECURITY_CODE_SIZE: usize = 3;

pub const AMEX_SECURITY_CODE_SIZE: usize = 4;

pub const MAXIMUM_YEARS_IN_FUTURE: i32 = 30;

pub const MAXIMUM_EXPIRED_MONTHS: i32 = 3;

/// Number of digits from which a brand can be resolved reliably, also the BIN lookup size.
pub const RELIABLE_PREFIX_LENGTH: usize = 11;

pub const BIN_VALUE_LENGTH: usize = 6;

pub const BIN_VALUE_EXTENDED_LENGTH: usize = 8;

/// Card numbers longer than this report the extended BIN.
pub const EXTENDED_BIN_CARD_NUMBER_LENGTH: usize = 16;

pub const LAST_FOUR_LENGTH: usize = 4;

pub const KCP_BIRTH_DATE_LENGTH: usize = 6;

pub const KCP_TAX_NUMBER_LENGTH: usize = 10;

pub const KCP_PASSWORD_LENGTH: usize = 2;
