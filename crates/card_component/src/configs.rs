mod settings;
mod validations;

pub use self::settings::{AddressPolicySettings, AddressSettings, CardSettings, Settings};
