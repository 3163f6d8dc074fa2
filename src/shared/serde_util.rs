//! Custom serde helpers for the crypto API wire format.

/// Deserializes a decimal encoded as a JSON string (`"1234.50"`) into `f64`.
///
/// The order endpoints send `price`, `average_price` and `stop_price` as
/// strings. Bare numbers are accepted as well; `null` and `""` decode to
/// `0.0`, matching how absent fields decode.
pub mod string_f64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(0.0),
            Some(Raw::Num(n)) => Ok(n),
            Some(Raw::Str(s)) if s.trim().is_empty() => Ok(0.0),
            Some(Raw::Str(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("Invalid decimal string: {}", s))),
        }
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }
}

/// Deserializes `null` as the type's default value.
///
/// Response fields such as `reject_reason` or `last_transaction_at` are sent
/// as `null` when unset; the order types expose them as empty values instead.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `skip_serializing_if` predicate for zero numbers.
pub(crate) fn is_zero(value: &f64) -> bool {
    *value == 0.0
}
