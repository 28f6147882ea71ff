//!
//! Logger of the system.
//!

pub use tracing::{debug, error, event as log, info, instrument, trace, warn};

#[doc(inline)]
pub use self::{config::Config, setup::setup, types::*};

pub mod config;
mod setup;
pub use setup::TelemetryGuard;
pub mod types;
