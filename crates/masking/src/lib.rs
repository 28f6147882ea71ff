#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(doc)))]
#![warn(missing_docs)]

//!
//! Masking of card data.
//! Card numbers, security codes, KCP passwords and tax numbers are wrapped in [`Secret`] so
//! that formatting a form snapshot or logging it never prints them.
//!

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

mod abs;
mod secret;
mod strategy;

pub use abs::{ExposeInterface, PeekInterface};
pub use secret::Secret;
pub use strategy::{Strategy, WithType, WithoutType};

#[cfg(feature = "serde")]
mod serde;
#[cfg(feature = "serde")]
pub use crate::serde::SerializableSecret;
