use std::fmt;

use serde::{
    de::{self, SeqAccess, Visitor},
    Deserialize, Deserializer,
};

/// Reads a list of reward percentiles either from a comma separated string (the shape env vars
/// have, e.g. `SLOW_PERCENTILES=10,20,30`) or from a sequence of numbers.
///
/// Range and ordering checks are left to the consumer, this only parses.
struct PercentilesVisitor;

impl<'de> Visitor<'de> for PercentilesVisitor {
    type Value = Vec<f64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a comma separated list of percentiles or a sequence of numbers")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if s.trim().is_empty() {
            return Ok(vec![]);
        }

        s.split(',')
            .map(|item| {
                let item = item.trim();
                item.parse::<f64>().map_err(|e| {
                    de::Error::custom(format!("Invalid percentile \"{item}\": {e:#}"))
                })
            })
            .collect()
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut percentiles = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(percentile) = seq.next_element::<f64>()? {
            percentiles.push(percentile);
        }
        Ok(percentiles)
    }
}

pub fn percentiles<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PercentilesVisitor)
}

#[derive(Deserialize)]
struct OptionalPercentiles(#[serde(deserialize_with = "percentiles")] Vec<f64>);

pub fn percentiles_option<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OptionalPercentiles>::deserialize(deserializer)
        .map(|wrapped| wrapped.map(|percentiles| percentiles.0))
}
