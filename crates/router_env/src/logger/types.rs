//! Types.

use strum::{Display, EnumString};

/// Category and tag of log event.
///
/// Don't hesitate to add your variant if it is missing here.
#[derive(Debug, Default, Clone, Copy, Display, EnumString, PartialEq, Eq)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// Public key request to the checkout API.
    PublicKeyRequest,
    /// Card brand detection, local estimate or BIN lookup.
    CardTypeDetection,
    /// Country or state list request.
    AddressListRequest,
    /// Card field encryption.
    Encryption,
    /// Reduction of the input into a new output snapshot.
    OutputDataUpdate,
    /// Component lifecycle: initialize, clear.
    Lifecycle,
}
