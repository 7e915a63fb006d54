//! Null-tolerant field decoding
//!
//! The remote store serialises empty aggregates as `null` rather than
//! omitting them. `#[serde(default)]` alone only covers missing keys, so
//! fields that must fall back to their default on `null` as well use
//! `#[serde(default, deserialize_with = "null_as_default")]`.

use serde::{Deserialize, Deserializer};

/// Decode `T`, mapping an explicit `null` to `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
