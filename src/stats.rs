use std::collections::HashMap;

use serde::Serialize;

use crate::round::{HandOutcome, RoundSummary};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountBucket {
    pub rounds: u32,
    pub net_winnings: f64,
}

/// Decision accuracy for one chart cell, e.g. "hard 16 vs 10".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStats {
    pub decisions: u32,
    pub mistakes: u32,
}

/// Running totals behind the Stats page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub rounds: u32,
    pub hands: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub blackjacks: u32,
    pub surrenders: u32,
    pub decisions: u32,
    pub optimal_decisions: u32,
    pub total_winnings: f64,
    pub total_bet: f64,
    /// Keyed by the opening true count rounded to the nearest integer.
    pub count_buckets: HashMap<String, CountBucket>,
    pub cell_stats: HashMap<String, CellStats>,
}

impl SessionStats {
    pub fn record(&mut self, summary: &RoundSummary) {
        self.rounds += 1;
        self.total_bet += summary.total_wagered;
        self.total_winnings += summary.wager_delta;

        for hand in &summary.hands {
            self.hands += 1;
            match hand.outcome {
                HandOutcome::Win => self.wins += 1,
                HandOutcome::Blackjack => {
                    self.wins += 1;
                    self.blackjacks += 1;
                }
                HandOutcome::Loss => self.losses += 1,
                HandOutcome::Surrender => {
                    self.losses += 1;
                    self.surrenders += 1;
                }
                HandOutcome::Push => self.pushes += 1,
            }
        }

        for decision in &summary.decisions {
            self.decisions += 1;
            let cell = self.cell_stats.entry(decision.cell.to_string()).or_default();
            cell.decisions += 1;
            if decision.is_optimal {
                self.optimal_decisions += 1;
            } else {
                cell.mistakes += 1;
            }
        }

        if let Some(true_count) = summary.opening_true_count {
            let key = (true_count.round() as i32).to_string();
            let bucket = self.count_buckets.entry(key).or_default();
            bucket.rounds += 1;
            bucket.net_winnings += summary.wager_delta;
        }
    }

    /// Share of decisions that matched the recommendation, as a percentage.
    pub fn accuracy(&self) -> f64 {
        if self.decisions == 0 {
            return 0.0;
        }
        (self.optimal_decisions as f64 / self.decisions as f64) * 100.0
    }

    pub fn win_rate(&self) -> f64 {
        if self.hands == 0 {
            return 0.0;
        }
        (self.wins as f64 / self.hands as f64) * 100.0
    }

    pub fn expected_value(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.total_winnings / self.rounds as f64
    }

    pub fn return_rate(&self) -> f64 {
        if self.total_bet.abs() > f64::EPSILON {
            (self.total_winnings / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Cells with the most mistakes first.
    pub fn weakest_cells(&self, limit: usize) -> Vec<(String, CellStats)> {
        let mut cells: Vec<_> = self
            .cell_stats
            .iter()
            .filter(|(_, stats)| stats.mistakes > 0)
            .map(|(key, stats)| (key.clone(), stats.clone()))
            .collect();
        cells.sort_by(|a, b| b.1.mistakes.cmp(&a.1.mistakes).then_with(|| a.0.cmp(&b.0)));
        cells.truncate(limit);
        cells
    }
}

/// Flattened view for the front end, with the derived rates filled in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    #[serde(flatten)]
    pub totals: SessionStats,
    pub accuracy: f64,
    pub win_rate: f64,
    pub expected_value: f64,
    pub return_rate: f64,
}

impl From<&SessionStats> for StatsReport {
    fn from(stats: &SessionStats) -> Self {
        StatsReport {
            totals: stats.clone(),
            accuracy: stats.accuracy(),
            win_rate: stats.win_rate(),
            expected_value: stats.expected_value(),
            return_rate: stats.return_rate(),
        }
    }
}
