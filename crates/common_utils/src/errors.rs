//! Errors shared by the card component crates.

/// `Result` whose error is an [`error_stack::Report`] of `E`, so context can be attached while
/// the error travels up.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Digest failures.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The digest could not be computed.
    #[error("Failed to encode given message")]
    EncodingFailed,
}
