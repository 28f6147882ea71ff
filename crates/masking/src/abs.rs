//!
//! Access to masked values.
//!

use crate::{Secret, Strategy};

/// Borrow the value behind a mask.
pub trait PeekInterface<S> {
    /// The only borrowing access to the masked value.
    fn peek(&self) -> &S;
}

/// Unwrap a masked value, giving up the mask.
pub trait ExposeInterface<S> {
    /// Consume the mask and return the value.
    fn expose(self) -> S;
}

impl<S, I> ExposeInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn expose(self) -> S {
        self.inner_secret
    }
}
