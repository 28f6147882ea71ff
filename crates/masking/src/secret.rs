//!
//! The masking wrapper.
//!

use std::{fmt, marker::PhantomData};

use crate::{strategy::Strategy, PeekInterface};

/// A value that is masked whenever it is formatted.
///
/// The second parameter picks the [`Strategy`] used by `Debug`. Equality and cloning stay
/// available so form snapshots can be compared, only the rendering is masked.
///
/// ```
/// use masking::{PeekInterface, Secret, Strategy};
/// use std::fmt;
///
/// /// Shows how many digits were typed, never the digits.
/// enum DigitCount {}
///
/// impl Strategy<String> for DigitCount {
///     fn fmt(value: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "<{} digits>", value.chars().filter(char::is_ascii_digit).count())
///     }
/// }
///
/// let security_code: Secret<String, DigitCount> = Secret::new("737".to_string());
///
/// assert_eq!(format!("{security_code:?}"), "<3 digits>");
/// assert_eq!(security_code.peek(), "737");
/// ```
pub struct Secret<S, I = crate::WithType>
where
    I: Strategy<S>,
{
    pub(crate) inner_secret: S,
    marker: PhantomData<I>,
}

impl<S, I> Secret<S, I>
where
    I: Strategy<S>,
{
    /// Wrap `secret`.
    pub fn new(secret: S) -> Self {
        Self {
            inner_secret: secret,
            marker: PhantomData,
        }
    }

    /// Transform the masked value without unmasking it.
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Secret<T, I>
    where
        I: Strategy<T>,
    {
        Secret::new(f(self.inner_secret))
    }
}

impl<S, I> PeekInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn peek(&self) -> &S {
        &self.inner_secret
    }
}

impl<S, I> From<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S: Clone, I: Strategy<S>> Clone for Secret<S, I> {
    fn clone(&self) -> Self {
        Self::new(self.inner_secret.clone())
    }
}

impl<S: PartialEq, I: Strategy<S>> PartialEq for Secret<S, I> {
    fn eq(&self, other: &Self) -> bool {
        self.inner_secret == other.inner_secret
    }
}

impl<S: Eq, I: Strategy<S>> Eq for Secret<S, I> {}

impl<S, I: Strategy<S>> fmt::Debug for Secret<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S: Default, I: Strategy<S>> Default for Secret<S, I> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
