//! Deserializers for fields the backend sends either as strings or as numbers

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accepts `"3"` as well as `3`, always yielding a string.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

/// Accepts `"42"` as well as `42` for non-negative integers.
pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StringOrNumber::Unsigned(n) => Ok(n),
        StringOrNumber::Signed(n) => {
            u64::try_from(n).map_err(|_| serde::de::Error::custom("negative value"))
        }
        StringOrNumber::Float(_) => Err(serde::de::Error::custom("expected an integer")),
    }
}

/// Treats `null` like a missing string.
pub fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
