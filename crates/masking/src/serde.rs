//!
//! Serde support.
//!

pub use serde::{de, Deserialize, Serialize, Serializer};

use crate::{PeekInterface, Secret, Strategy};

/// Marks value types a [`Secret`] may be serialized with.
///
/// Payload fields are encrypted before they are serialized, so only plain strings and small
/// integers opt in. A card number type does not.
pub trait SerializableSecret: Serialize {}

impl SerializableSecret for String {}
impl SerializableSecret for u8 {}
impl SerializableSecret for u16 {}

impl<'de, T, I> Deserialize<'de> for Secret<T, I>
where
    T: de::DeserializeOwned + Sized,
    I: Strategy<T>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::new)
    }
}

impl<T, I> Serialize for Secret<T, I>
where
    T: SerializableSecret + Sized,
    I: Strategy<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.peek().serialize(serializer)
    }
}
