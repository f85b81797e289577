//! Match configuration.

use crate::card::FACTION_DECK_SIZE;
use serde::{Deserialize, Serialize};

/// Character cards dealt to each player at match start
pub const STARTING_HAND: usize = 5;

/// Settings used when creating a new match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Characters dealt into each opening hand
    pub starting_hand: usize,
    /// Cards in each faction deck
    pub deck_size: usize,
    /// Seed for deck generation and reshuffles; random when unset
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_hand: STARTING_HAND,
            deck_size: FACTION_DECK_SIZE,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{"seed": 42}"#).unwrap();
        assert_eq!(config, MatchConfig::with_seed(42));
        assert_eq!(config.starting_hand, STARTING_HAND);
    }
}
