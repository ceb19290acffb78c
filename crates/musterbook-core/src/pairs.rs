//! Serde adapter storing string-keyed maps as ordered `[key, value]` pair lists.
//!
//! Stored rosters encode weapon choices and enhancements this way so that
//! readers without ordered-map literals round-trip them losslessly. Use with
//! `#[serde(with = "crate::pairs")]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S, V>(map: &BTreeMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.iter())
}

pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let pairs: Vec<(String, V)> = Vec::deserialize(deserializer)?;
    Ok(pairs.into_iter().collect())
}
