//! Normalized lookup result
//!
//! The subset of the upstream `/pokemon/{name}` document the gateway serves.

use serde::{Deserialize, Deserializer, Serialize};

/// A Pokemon as returned to gateway clients and stored in the cache.
///
/// Unknown upstream fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    pub height: u32,
    pub weight: u32,
    /// Upstream reports `null` for some forms; those decode as 0.
    #[serde(deserialize_with = "null_as_zero")]
    pub base_experience: u32,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
