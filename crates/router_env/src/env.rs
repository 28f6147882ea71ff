//!
//! Run environment of the card component.
//!

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Set by cargo to the directory of the crate being built or tested.
pub const CARGO_MANIFEST_DIR: &str = "CARGO_MANIFEST_DIR";
/// Selects the settings file, `config/<RUN_ENV>.toml`.
pub const RUN_ENV: &str = "RUN_ENV";

/// Deployment the settings are loaded for. Unrelated to the checkout API environment a card
/// form talks to.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

/// The environment named by `RUN_ENV`. Debug builds fall back to development, release builds to
/// production, also when the variable holds an unknown name.
pub fn which() -> Env {
    let fallback = if cfg!(debug_assertions) {
        Env::Development
    } else {
        Env::Production
    };

    std::env::var(RUN_ENV)
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(fallback)
}

/// Root of the workspace, where `config/` and `logs/` live.
///
/// Crates sit two levels below the root, so the path is derived from the manifest directory
/// when cargo provides one, else the working directory is used.
pub fn workspace_path() -> PathBuf {
    std::env::var(CARGO_MANIFEST_DIR).map_or_else(
        |_| PathBuf::from("."),
        |manifest_dir| {
            let mut path = PathBuf::from(manifest_dir);
            path.pop();
            path.pop();
            path
        },
    )
}

/// Name of the calling crate, used as the service name of the logger.
#[macro_export]
macro_rules! service_name {
    () => {
        env!("CARGO_CRATE_NAME")
    };
}
