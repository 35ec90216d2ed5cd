//! Serde helpers for model types

use serde::{Deserialize, Deserializer};

/// Deserialize a field where "absent", "null" and "value" are three distinct
/// states. With `#[serde(default)]` an absent field stays `None`; a present
/// field (including an explicit `null`) becomes `Some(inner)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
