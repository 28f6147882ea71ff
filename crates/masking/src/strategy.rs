use core::fmt;

/// How a masked value is rendered by `Debug`.
pub trait Strategy<T> {
    /// Write the masked rendering of `value`.
    fn fmt(value: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Renders the type name only, e.g. `*** alloc::string::String ***`.
#[derive(Debug)]
pub enum WithType {}

impl<T> Strategy<T> for WithType {
    fn fmt(_: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "*** {} ***", std::any::type_name::<T>())
    }
}

/// Renders nothing of the value, not even its type.
#[derive(Debug)]
pub enum WithoutType {}

impl<T> Strategy<T> for WithoutType {
    fn fmt(_: &T, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("*** ***")
    }
}
