#![warn(missing_debug_implementations)]

//!
//! Logging and settings environment shared by the card component crates.
//!

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

pub mod env;
pub mod logger;

#[doc(inline)]
pub use logger::*;
pub use tracing;

#[doc(inline)]
pub use self::env::*;
