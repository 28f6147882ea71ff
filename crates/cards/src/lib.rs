#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

pub mod card_type;
pub mod consts;
pub mod kcp;
pub mod social_security_number;
mod validate;
pub mod validation;
pub mod validators;

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

pub use self::{
    card_type::{BrandMatch, CardBrand, DetectedCardType},
    validate::{CardNumber, CardNumberStrategy},
    validation::{FieldState, InvalidReason, Validation},
};

/// Card expiry month and year as entered by the shopper.
///
/// `EMPTY_DATE` stands for an untouched field, `INVALID_DATE` for input that could not be parsed.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ExpiryDate {
    pub month: i32,
    pub year: i32,
}

impl ExpiryDate {
    pub const EMPTY_DATE: Self = Self { month: 0, year: 0 };
    pub const INVALID_DATE: Self = Self {
        month: -1,
        year: -1,
    };

    pub fn new(month: i32, year: i32) -> Self {
        Self { month, year }
    }

    /// Parses `MM/YY` or `MM/YYYY` input. Two digit years are in the 2000s.
    pub fn from_input(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::EMPTY_DATE;
        }

        let Some((month, year)) = input.split_once('/') else {
            return Self::INVALID_DATE;
        };
        let (Ok(month), Ok(year)) = (month.trim().parse::<i32>(), year.trim().parse::<i32>())
        else {
            return Self::INVALID_DATE;
        };

        match year.to_string().len() {
            1 | 2 => Self::new(month, 2000 + year),
            4 => Self::new(month, year),
            _ => Self::INVALID_DATE,
        }
    }

    /// Whether the value is a calendar month, as opposed to a sentinel or garbage.
    pub fn exists(&self) -> bool {
        *self != Self::EMPTY_DATE && (1..=12).contains(&self.month) && self.year > 0
    }

    /// Last calendar day of the expiry month, the day the card stops working.
    pub fn last_day(&self) -> Option<Date> {
        let month = Month::try_from(u8::try_from(self.month).ok()?).ok()?;
        let day = month.length(self.year);
        Date::from_calendar_date(self.year, month, day).ok()
    }

    pub fn two_digit_month(&self) -> String {
        format!("{:02}", self.month)
    }

    pub fn four_digit_year(&self) -> String {
        format!("{:04}", self.year)
    }
}

impl fmt::Debug for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EMPTY_DATE => f.write_str("ExpiryDate(EMPTY)"),
            Self::INVALID_DATE => f.write_str("ExpiryDate(INVALID)"),
            _ => f.write_str("ExpiryDate(**/****)"),
        }
    }
}
