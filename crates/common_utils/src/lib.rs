#![warn(missing_docs, missing_debug_implementations)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

pub mod consts;
pub mod crypto;
pub mod errors;
pub mod fp_utils;
pub mod validation;

/// Date utilities.
pub mod date_time {
    use time::{Date, OffsetDateTime};

    /// The current calendar date in UTC.
    pub fn today() -> Date {
        OffsetDateTime::now_utc().date()
    }
}
