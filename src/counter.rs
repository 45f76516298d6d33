use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, Rank},
    error::{EngineError, Result},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountingSystem {
    #[default]
    #[serde(rename = "Hi-Lo")]
    HiLo,
    #[serde(rename = "Hi-Opt I")]
    HiOptOne,
    #[serde(rename = "Hi-Opt II")]
    HiOptTwo,
    #[serde(rename = "Omega II")]
    OmegaTwo,
    #[serde(rename = "KO (Knockout)")]
    Knockout,
    #[serde(rename = "Ace-Five")]
    AceFive,
    Custom,
}

/// Aggregated count at a point in time.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountState {
    pub running_count: i32,
    pub decks_remaining: f64,
    pub true_count: f64,
}

pub struct CardCounter {
    system: CountingSystem,
    running_count: i32,
    values: [i32; 13],
    precision: f64,
}

impl CardCounter {
    pub fn new(system: CountingSystem, precision: f64) -> Self {
        CardCounter {
            system,
            running_count: 0,
            values: system_values(system),
            precision,
        }
    }

    pub fn hi_lo() -> Self {
        CardCounter::new(CountingSystem::HiLo, 0.5)
    }

    /// Custom per-rank point values keyed by rank label (`"A"`, `"10"`, `"K"` ...).
    /// Ranks left out count as zero.
    pub fn custom(custom_values: &HashMap<String, i32>, precision: f64) -> Result<Self> {
        let mut values = [0; 13];
        for (label, &value) in custom_values {
            let rank = Rank::from_label(label).map_err(|_| {
                EngineError::InvalidConfig(format!("unknown rank {label:?} in custom count"))
            })?;
            values[rank.index()] = value;
        }
        Ok(CardCounter {
            system: CountingSystem::Custom,
            running_count: 0,
            values,
            precision,
        })
    }

    pub fn system(&self) -> CountingSystem {
        self.system
    }

    pub fn point_value(&self, rank: Rank) -> i32 {
        self.values[rank.index()]
    }

    pub fn observe(&mut self, card: &Card) {
        self.running_count += self.point_value(card.rank);
    }

    pub fn reset(&mut self) {
        self.running_count = 0;
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    pub fn true_count(&self, decks_remaining: f64) -> f64 {
        let raw = self.running_count as f64 / decks_remaining.max(1.0);
        if self.precision > 0.0 {
            (raw / self.precision).round() * self.precision
        } else {
            raw
        }
    }

    pub fn state(&self, decks_remaining: f64) -> CountState {
        CountState {
            running_count: self.running_count,
            decks_remaining,
            true_count: self.true_count(decks_remaining),
        }
    }
}

fn system_values(system: CountingSystem) -> [i32; 13] {
    // Order follows Rank::ALL: A 2 3 4 5 6 7 8 9 10 J Q K
    match system {
        CountingSystem::HiLo => [-1, 1, 1, 1, 1, 1, 0, 0, 0, -1, -1, -1, -1],
        CountingSystem::HiOptOne => [0, 0, 1, 1, 1, 1, 0, 0, 0, -1, -1, -1, -1],
        CountingSystem::HiOptTwo => [0, 1, 1, 2, 2, 1, 1, 0, 0, -2, -2, -2, -2],
        CountingSystem::OmegaTwo => [0, 1, 1, 2, 2, 2, 1, 0, -1, -2, -2, -2, -2],
        CountingSystem::Knockout => [-1, 1, 1, 1, 1, 1, 1, 0, 0, -1, -1, -1, -1],
        CountingSystem::AceFive => [-1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        CountingSystem::Custom => [0; 13],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shoe::Shoe;

    #[test]
    fn hi_lo_point_values() {
        let counter = CardCounter::hi_lo();
        for rank in Rank::ALL {
            let expect = match rank.hard_value() {
                2..=6 => 1,
                7..=9 => 0,
                _ => -1,
            };
            assert_eq!(counter.point_value(rank), expect, "{rank}");
        }
    }

    #[test]
    fn full_single_deck_nets_to_zero() {
        let mut shoe = Shoe::new(1, 100, Some(3));
        let mut counter = CardCounter::hi_lo();
        while let Ok(card) = shoe.draw() {
            counter.observe(&card);
        }
        assert_eq!(counter.running_count(), 0);
    }

    #[test]
    fn balanced_systems_net_to_zero_over_a_deck() {
        for system in [
            CountingSystem::HiLo,
            CountingSystem::HiOptOne,
            CountingSystem::HiOptTwo,
            CountingSystem::OmegaTwo,
        ] {
            let total: i32 = system_values(system).iter().sum();
            assert_eq!(total, 0, "{system:?}");
        }
        let ko: i32 = system_values(CountingSystem::Knockout).iter().sum();
        assert_eq!(ko, 1);
    }

    #[test]
    fn true_count_divides_by_decks_and_rounds() {
        let mut counter = CardCounter::hi_lo();
        for _ in 0..9 {
            counter.observe(&Card::parse("5").unwrap());
        }
        assert_eq!(counter.true_count(2.0), 4.5);
        // 9 / 4 = 2.25 rounds to the nearest half
        assert_eq!(counter.true_count(4.0), 2.5);
        // never divides by less than one deck
        assert_eq!(counter.true_count(0.25), 9.0);
    }

    #[test]
    fn zero_precision_keeps_raw_value() {
        let mut counter = CardCounter::new(CountingSystem::HiLo, 0.0);
        counter.observe(&Card::parse("2").unwrap());
        assert!((counter.true_count(3.0) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn reset_zeroes_running_count() {
        let mut counter = CardCounter::hi_lo();
        counter.observe(&Card::parse("K").unwrap());
        assert_eq!(counter.running_count(), -1);
        counter.reset();
        assert_eq!(counter.running_count(), 0);
    }

    #[test]
    fn custom_values_by_label() {
        let values = HashMap::from([("A".to_string(), -2), ("5".to_string(), 2)]);
        let mut counter = CardCounter::custom(&values, 0.5).unwrap();
        counter.observe(&Card::parse("A").unwrap());
        counter.observe(&Card::parse("5").unwrap());
        counter.observe(&Card::parse("5").unwrap());
        assert_eq!(counter.running_count(), 2);
        assert_eq!(counter.system(), CountingSystem::Custom);

        let bad = HashMap::from([("X".to_string(), 1)]);
        assert!(CardCounter::custom(&bad, 0.5).is_err());
    }
}
