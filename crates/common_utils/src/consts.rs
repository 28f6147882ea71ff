//! Commonly used constants

/// Characters a shopper may type between groups of digits.
pub const DIGIT_SEPARATORS: [char; 2] = [' ', '-'];

/// Length of a hex encoded SHA-256 digest.
pub const SHA256_HEX_LENGTH: usize = 64;
