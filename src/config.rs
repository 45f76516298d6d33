use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    counter::{CardCounter, CountingSystem},
    error::{EngineError, Result},
    strategy::StrategyInput,
};

pub(crate) fn default_num_decks() -> u8 {
    6
}

fn default_bankroll() -> f64 {
    1000.0
}

fn default_precision() -> f64 {
    0.5
}

/// Table rules the round controller checks legality against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRules {
    pub num_decks: u8,
    pub dealer_hits_soft_17: bool,
    pub double_after_split: bool,
    pub surrender_allowed: bool,
    pub dealer_peeks: bool,
    /// Most hands a player may hold after splitting.
    pub max_split_hands: u8,
    pub resplit_aces: bool,
    pub split_aces_one_card: bool,
    /// Natural payout as a multiple of the wager (1.5 for 3:2).
    pub blackjack_payout: f64,
    /// Percentage of the shoe dealt before a reshuffle is due.
    pub penetration_threshold: u8,
}

impl Default for TableRules {
    fn default() -> Self {
        TableRules {
            num_decks: default_num_decks(),
            dealer_hits_soft_17: false,
            double_after_split: true,
            surrender_allowed: false,
            dealer_peeks: true,
            max_split_hands: 4,
            resplit_aces: false,
            split_aces_one_card: true,
            blackjack_payout: 1.5,
            penetration_threshold: 75,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesInput {
    #[serde(default)]
    pub dealer_hits_soft_17: bool,
    #[serde(default)]
    pub double_after_split: Option<bool>,
    #[serde(default)]
    pub surrender_allowed: Option<bool>,
    #[serde(default)]
    pub dealer_peeks: Option<bool>,
    #[serde(default)]
    pub max_split_hands: Option<u8>,
    #[serde(default)]
    pub resplit_aces: Option<bool>,
    #[serde(default)]
    pub split_aces_one_card: Option<bool>,
    #[serde(default)]
    pub blackjack_pays: Option<String>,
    #[serde(default)]
    pub penetration_threshold: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountingInput {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub system: Option<CountingSystem>,
    #[serde(default)]
    pub custom_values: Option<HashMap<String, i32>>,
    #[serde(default = "default_precision")]
    pub precision: f64,
}

impl Default for CountingInput {
    fn default() -> Self {
        CountingInput {
            enabled: false,
            system: None,
            custom_values: None,
            precision: default_precision(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_bankroll")]
    pub bankroll: f64,
    #[serde(default)]
    pub rules: RulesInput,
    #[serde(default)]
    pub counting: Option<CountingInput>,
    #[serde(default)]
    pub strategy: Option<StrategyInput>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            num_decks: default_num_decks(),
            seed: None,
            bankroll: default_bankroll(),
            rules: RulesInput::default(),
            counting: None,
            strategy: None,
        }
    }
}

pub fn to_table_rules(num_decks: u8, rules: &RulesInput) -> Result<TableRules> {
    if num_decks == 0 || num_decks > 8 {
        return Err(EngineError::InvalidConfig(format!(
            "deck count must be between 1 and 8, got {num_decks}"
        )));
    }
    let penetration_threshold = rules.penetration_threshold.unwrap_or(75);
    if !(1..=100).contains(&penetration_threshold) {
        return Err(EngineError::InvalidConfig(format!(
            "penetration must be between 1 and 100, got {penetration_threshold}"
        )));
    }
    let max_split_hands = rules.max_split_hands.unwrap_or(4);
    if max_split_hands == 0 {
        return Err(EngineError::InvalidConfig("max_split_hands must be at least 1".into()));
    }
    let blackjack_payout = match rules.blackjack_pays.as_deref() {
        Some(ratio) => parse_payout(ratio)?,
        None => 1.5,
    };
    Ok(TableRules {
        num_decks,
        dealer_hits_soft_17: rules.dealer_hits_soft_17,
        double_after_split: rules.double_after_split.unwrap_or(true),
        surrender_allowed: rules.surrender_allowed.unwrap_or(false),
        dealer_peeks: rules.dealer_peeks.unwrap_or(true),
        max_split_hands,
        resplit_aces: rules.resplit_aces.unwrap_or(false),
        split_aces_one_card: rules.split_aces_one_card.unwrap_or(true),
        blackjack_payout,
        penetration_threshold,
    })
}

/// `None` when counting is off.
pub fn build_counter(config: Option<&CountingInput>) -> Result<Option<CardCounter>> {
    let Some(cfg) = config else {
        return Ok(None);
    };
    if !cfg.enabled {
        return Ok(None);
    }
    let system = cfg.system.unwrap_or_default();
    let counter = match (system, &cfg.custom_values) {
        (CountingSystem::Custom, Some(values)) => CardCounter::custom(values, cfg.precision)?,
        (CountingSystem::Custom, None) => {
            return Err(EngineError::InvalidConfig(
                "custom counting system needs custom_values".into(),
            ))
        }
        (system, _) => CardCounter::new(system, cfg.precision),
    };
    Ok(Some(counter))
}

fn parse_payout(ratio: &str) -> Result<f64> {
    let invalid = || EngineError::InvalidConfig(format!("bad blackjack payout {ratio:?}"));
    let (num, den) = ratio.split_once(':').ok_or_else(invalid)?;
    let num: f64 = num.trim().parse().map_err(|_| invalid())?;
    let den: f64 = den.trim().parse().map_err(|_| invalid())?;
    if den <= 0.0 || num <= 0.0 {
        return Err(invalid());
    }
    Ok(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_common_shoe_game() {
        let rules = to_table_rules(6, &RulesInput::default()).unwrap();
        assert_eq!(rules, TableRules::default());
    }

    #[test]
    fn payout_strings() {
        assert_eq!(parse_payout("3:2").unwrap(), 1.5);
        assert_eq!(parse_payout("6:5").unwrap(), 1.2);
        assert_eq!(parse_payout("1:1").unwrap(), 1.0);
        assert!(parse_payout("3-2").is_err());
        assert!(parse_payout("3:0").is_err());
    }

    #[test]
    fn rejects_bad_deck_count_and_penetration() {
        assert!(to_table_rules(0, &RulesInput::default()).is_err());
        let rules = RulesInput {
            penetration_threshold: Some(0),
            ..RulesInput::default()
        };
        assert!(matches!(to_table_rules(6, &rules), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn session_config_from_json_uses_defaults() {
        let config: SessionConfig = serde_json::from_value(serde_json::json!({
            "seed": 9,
            "rules": { "dealer_hits_soft_17": true, "blackjack_pays": "6:5" },
            "counting": { "enabled": true, "system": "Hi-Opt II" }
        }))
        .unwrap();
        assert_eq!(config.num_decks, 6);
        assert_eq!(config.bankroll, 1000.0);
        let rules = to_table_rules(config.num_decks, &config.rules).unwrap();
        assert!(rules.dealer_hits_soft_17);
        assert_eq!(rules.blackjack_payout, 1.2);
        let counter = build_counter(config.counting.as_ref()).unwrap().unwrap();
        assert_eq!(counter.system(), CountingSystem::HiOptTwo);
    }

    #[test]
    fn disabled_counting_builds_nothing() {
        let input = CountingInput::default();
        assert!(build_counter(Some(&input)).unwrap().is_none());
        assert!(build_counter(None).unwrap().is_none());
        let custom = CountingInput {
            enabled: true,
            system: Some(CountingSystem::Custom),
            ..CountingInput::default()
        };
        assert!(build_counter(Some(&custom)).is_err());
    }
}
