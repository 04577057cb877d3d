use std::error::Error;
use std::fmt;

use serde::{
    de::{self, Visitor},
    Deserializer,
};

/// JSON-RPC encodes block numbers as `QUANTITY` (a `0x` prefixed hex string), but some nodes
/// answer with plain JSON numbers. Both are accepted.
struct QuantityVisitor;

impl QuantityVisitor {
    fn format_error<E, E2: Error>(e: E2) -> E
    where
        E: de::Error,
    {
        de::Error::custom(format!("Invalid quantity: {e:#}"))
    }
}

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a hex encoded quantity or an unsigned 64 bit number")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match s.strip_prefix("0x") {
            Some("") => Err(de::Error::custom("Invalid quantity: empty hex string")),
            Some(digits) => u64::from_str_radix(digits, 16).map_err(QuantityVisitor::format_error),
            None => s.parse::<u64>().map_err(QuantityVisitor::format_error),
        }
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(v).map_err(QuantityVisitor::format_error)
    }
}

pub fn quantity_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(QuantityVisitor)
}
