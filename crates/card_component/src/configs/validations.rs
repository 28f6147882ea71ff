use common_utils::fp_utils::when;
use error_stack::report;
use masking::PeekInterface;

use crate::errors::{ConfigurationError, CustomResult};

impl super::settings::CardSettings {
    pub fn validate(&self) -> CustomResult<(), ConfigurationError> {
        when(self.client_key.peek().trim().is_empty(), || {
            Err(report!(ConfigurationError::MissingClientKey))
        })?;

        when(
            self.shopper_locale
                .as_ref()
                .is_some_and(|locale| locale.trim().is_empty()),
            || {
                Err(report!(ConfigurationError::SettingsLoadFailed)
                    .attach_printable("shopper locale must not be empty when set"))
            },
        )?;

        self.address.validate()
    }
}

impl super::settings::AddressSettings {
    pub fn validate(&self) -> CustomResult<(), ConfigurationError> {
        let is_country_code = |code: &String| {
            code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase())
        };

        when(
            self.default_country_code
                .as_ref()
                .is_some_and(|code| !is_country_code(code)),
            || {
                Err(report!(ConfigurationError::SettingsLoadFailed)
                    .attach_printable("default country code must be an ISO 3166-1 alpha-2 code"))
            },
        )?;

        when(
            !self.supported_country_codes.iter().all(is_country_code),
            || {
                Err(report!(ConfigurationError::SettingsLoadFailed)
                    .attach_printable("supported country codes must be ISO 3166-1 alpha-2 codes"))
            },
        )
    }
}
