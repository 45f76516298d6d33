use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, Rank},
    config::{default_num_decks, to_table_rules, RulesInput, TableRules},
    error::{EngineError, Result},
    feedback::{synthesize, StrategyFeedback},
    hand::Hand,
    shoe::Shoe,
    spot::parse_action,
    strategy::{Action, StrategyChart, StrategyInput},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillCategory {
    Hard,
    Soft,
    Pair,
}

impl DrillCategory {
    pub const ALL: [DrillCategory; 3] = [
        DrillCategory::Hard,
        DrillCategory::Soft,
        DrillCategory::Pair,
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrillConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    #[serde(default)]
    pub rules: RulesInput,
    /// Empty means every category.
    #[serde(default)]
    pub categories: Vec<DrillCategory>,
    /// Attach a random true count so index plays come up.
    #[serde(default)]
    pub with_count: bool,
    #[serde(default)]
    pub strategy: Option<StrategyInput>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        DrillConfig {
            seed: None,
            num_decks: default_num_decks(),
            rules: RulesInput::default(),
            categories: Vec::new(),
            with_count: false,
            strategy: None,
        }
    }
}

/// One spot: the opening two cards against a dealer up card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillQuestion {
    pub player_cards: Vec<Card>,
    pub dealer_up: Card,
    pub legal_actions: Vec<Action>,
    pub category: DrillCategory,
    #[serde(default)]
    pub true_count: Option<f64>,
}

fn default_question_count() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrillRequest {
    #[serde(default)]
    pub config: DrillConfig,
    #[serde(default = "default_question_count")]
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrillAnswer {
    #[serde(default)]
    pub config: DrillConfig,
    pub question: DrillQuestion,
    pub action: String,
}

pub struct Drill {
    rules: TableRules,
    chart: StrategyChart,
    categories: Vec<DrillCategory>,
    with_count: bool,
    shoe: Shoe,
    rng: SmallRng,
}

impl Drill {
    pub fn new(config: DrillConfig) -> Result<Self> {
        let rules = to_table_rules(config.num_decks, &config.rules)?;
        let chart = match config.strategy {
            Some(input) => StrategyChart::from_input(input, &rules)?,
            None => StrategyChart::basic(&rules),
        };
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let categories = if config.categories.is_empty() {
            DrillCategory::ALL.to_vec()
        } else {
            config.categories
        };
        Ok(Drill {
            shoe: Shoe::new(rules.num_decks, rules.penetration_threshold, config.seed),
            rules,
            chart,
            categories,
            with_count: config.with_count,
            rng,
        })
    }

    pub fn next_question(&mut self) -> Result<DrillQuestion> {
        let category = *self
            .categories
            .choose(&mut self.rng)
            .ok_or_else(|| EngineError::InvalidConfig("no drill categories".into()))?;
        let (first, second) = match category {
            DrillCategory::Hard => self.hard_ranks(),
            DrillCategory::Soft => {
                let kicker = self.rng.gen_range(2..=9);
                (Rank::Ace, self.rank_of_value(kicker))
            }
            DrillCategory::Pair => {
                let value = self.rng.gen_range(1..=10);
                let rank = self.rank_of_value(value);
                (rank, self.same_value(rank))
            }
        };
        let up_value = self.rng.gen_range(1..=10);
        let up = self.rank_of_value(up_value);

        let player_cards = vec![self.take(first), self.take(second)];
        let dealer_up = self.take(up);
        let true_count = (self.with_count && self.chart.count_based())
            .then(|| self.rng.gen_range(-8..=12) as f64 * 0.5);

        let mut legal_actions = vec![Action::Hit, Action::Stand, Action::Double];
        if category == DrillCategory::Pair {
            legal_actions.push(Action::Split);
        }
        if self.rules.surrender_allowed {
            legal_actions.push(Action::Surrender);
        }
        Ok(DrillQuestion {
            player_cards,
            dealer_up,
            legal_actions,
            category,
            true_count,
        })
    }

    pub fn grade(&self, question: &DrillQuestion, action: Action) -> Result<StrategyFeedback> {
        if !question.legal_actions.contains(&action) {
            return Err(EngineError::InvalidAction { action });
        }
        let hand = Hand::new(question.player_cards.clone());
        let recommendation = self.chart.recommend(
            &hand,
            &question.dealer_up,
            &question.legal_actions,
            question.true_count,
        )?;
        Ok(synthesize(action, &recommendation))
    }

    /// Two cards of different value summing to a hard total from 5 to 19.
    fn hard_ranks(&mut self) -> (Rank, Rank) {
        let total: u8 = self.rng.gen_range(5..=19);
        let pairs: Vec<(u8, u8)> = (2..=10u8)
            .filter_map(|a| {
                let b = total.checked_sub(a)?;
                (a < b && b <= 10).then_some((a, b))
            })
            .collect();
        let (a, b) = pairs.choose(&mut self.rng).copied().unwrap_or((2, 3));
        (self.rank_of_value(a), self.rank_of_value(b))
    }

    fn rank_of_value(&mut self, value: u8) -> Rank {
        match value {
            1 => Rank::Ace,
            10 => *[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King]
                .choose(&mut self.rng)
                .unwrap_or(&Rank::Ten),
            v => Rank::ALL[(v - 1) as usize],
        }
    }

    fn same_value(&mut self, rank: Rank) -> Rank {
        if rank.is_ten_value() {
            self.rank_of_value(10)
        } else {
            rank
        }
    }

    /// Pulls a real card of `rank` from the drill shoe, reshuffling when the
    /// shoe is spent or has no such card left.
    fn take(&mut self, rank: Rank) -> Card {
        if self.shoe.should_reshuffle() {
            self.shoe.shuffle();
        }
        if let Some(card) = self.shoe.take_rank(rank) {
            return card;
        }
        self.shoe.shuffle();
        self.shoe
            .take_rank(rank)
            .unwrap_or_else(|| Card::new(rank, crate::card::Suit::Spades))
    }
}

pub fn generate(request: DrillRequest) -> Result<Vec<DrillQuestion>> {
    let mut drill = Drill::new(request.config)?;
    (0..request.count.max(1)).map(|_| drill.next_question()).collect()
}

pub fn grade_answer(answer: DrillAnswer) -> Result<StrategyFeedback> {
    let action = parse_action(&answer.action)?;
    Drill::new(answer.config)?.grade(&answer.question, action)
}
