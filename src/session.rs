use crate::{
    card::Card,
    config::{build_counter, to_table_rules, SessionConfig, TableRules},
    counter::{CardCounter, CountState},
    error::{EngineError, Result},
    hand::Hand,
    shoe::Shoe,
    stats::SessionStats,
    strategy::{Action, ActionRecommendation, StrategyChart},
};

/// Everything one player's training session owns: the shoe, the count, the
/// rules, the strategy chart and the bankroll. Nothing here is shared, so
/// each open tab builds its own.
pub struct Session {
    rules: TableRules,
    shoe: Shoe,
    counter: CardCounter,
    counting_enabled: bool,
    chart: StrategyChart,
    bankroll: f64,
    stats: SessionStats,
    forced_reshuffle: bool,
    /// Cards dealt since the current round began.
    in_play: Vec<Card>,
    /// Bumped on every shuffle, so a round can tell which cards predate one.
    shuffles: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let rules = to_table_rules(config.num_decks, &config.rules)?;
        let shoe = Shoe::new(rules.num_decks, rules.penetration_threshold, config.seed);
        Self::build(config, rules, shoe)
    }

    /// Uses `shoe` in place of a freshly shuffled one.
    pub fn with_shoe(config: SessionConfig, shoe: Shoe) -> Result<Self> {
        let rules = to_table_rules(config.num_decks, &config.rules)?;
        Self::build(config, rules, shoe)
    }

    fn build(config: SessionConfig, rules: TableRules, shoe: Shoe) -> Result<Self> {
        if !(config.bankroll.is_finite() && config.bankroll > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "bankroll must be positive, got {}",
                config.bankroll
            )));
        }
        let chart = match config.strategy {
            Some(input) => StrategyChart::from_input(input, &rules)?,
            None => StrategyChart::basic(&rules),
        };
        let (counter, counting_enabled) = match build_counter(config.counting.as_ref())? {
            Some(counter) => (counter, true),
            None => (CardCounter::hi_lo(), false),
        };
        Ok(Session {
            rules,
            shoe,
            counter,
            counting_enabled,
            chart,
            bankroll: config.bankroll,
            stats: SessionStats::default(),
            forced_reshuffle: false,
            in_play: Vec::new(),
            shuffles: 0,
        })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn chart(&self) -> &StrategyChart {
        &self.chart
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn counting_enabled(&self) -> bool {
        self.counting_enabled
    }

    pub fn count_state(&self) -> CountState {
        self.counter.state(self.shoe.decks_remaining())
    }

    /// True count the strategy engine should see; `None` with counting off.
    pub fn strategy_true_count(&self) -> Option<f64> {
        self.counting_enabled
            .then(|| self.counter.true_count(self.shoe.decks_remaining()))
    }

    pub fn recommend(
        &self,
        hand: &Hand,
        dealer_up: &Card,
        legal: &[Action],
    ) -> Result<ActionRecommendation> {
        self.chart
            .recommend(hand, dealer_up, legal, self.strategy_true_count())
    }

    /// Clears the cards held on the table by the previous round.
    pub(crate) fn begin_round(&mut self) {
        self.in_play.clear();
    }

    pub(crate) fn reshuffle_if_due(&mut self) {
        if self.shoe.should_reshuffle() {
            self.reshuffle();
        }
    }

    /// Shuffles everything not currently on the table and starts a new count.
    pub(crate) fn reshuffle(&mut self) {
        self.shoe.shuffle_without(&self.in_play);
        self.counter.reset();
        self.shuffles += 1;
    }

    pub(crate) fn shuffle_generation(&self) -> u32 {
        self.shuffles
    }

    /// Deals one card, observing it when it lands face up. An empty shoe is
    /// reshuffled on the spot.
    pub(crate) fn deal(&mut self, face_up: bool) -> Result<Card> {
        let card = match self.shoe.draw() {
            Err(EngineError::ShoeExhausted) => {
                tracing::warn!(
                    running_count = self.counter.running_count(),
                    "shoe exhausted mid-round, forcing a reshuffle"
                );
                self.reshuffle();
                self.forced_reshuffle = true;
                self.shoe.draw()?
            }
            other => other?,
        };
        self.in_play.push(card);
        if face_up {
            self.observe(&card);
        }
        Ok(card)
    }

    pub(crate) fn observe(&mut self, card: &Card) {
        self.counter.observe(card);
    }

    pub(crate) fn take_forced_reshuffle(&mut self) -> bool {
        std::mem::take(&mut self.forced_reshuffle)
    }

    pub(crate) fn settle(&mut self, net: f64) {
        self.bankroll += net;
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountingInput;

    #[test]
    fn counting_disabled_hides_true_count() {
        let session = Session::new(SessionConfig {
            seed: Some(1),
            ..SessionConfig::default()
        })
        .unwrap();
        assert!(!session.counting_enabled());
        assert_eq!(session.strategy_true_count(), None);
    }

    #[test]
    fn face_down_cards_are_not_counted() {
        let cards = vec![Card::parse("5").unwrap(), Card::parse("6").unwrap()];
        let mut session = Session::with_shoe(
            SessionConfig {
                counting: Some(CountingInput {
                    enabled: true,
                    ..CountingInput::default()
                }),
                ..SessionConfig::default()
            },
            Shoe::stacked(cards, 6, 75),
        )
        .unwrap();
        session.deal(true).unwrap();
        session.deal(false).unwrap();
        assert_eq!(session.count_state().running_count, 1);
    }

    #[test]
    fn exhausted_shoe_reshuffles_and_resets_count() {
        let mut session = Session::with_shoe(
            SessionConfig::default(),
            Shoe::stacked(vec![Card::parse("2").unwrap()], 1, 75),
        )
        .unwrap();
        session.deal(true).unwrap();
        assert_eq!(session.count_state().running_count, 1);
        session.deal(false).unwrap();
        assert!(session.take_forced_reshuffle());
        assert!(!session.take_forced_reshuffle());
        assert_eq!(session.count_state().running_count, 0);
        // the 2 on the table stays out of the new shoe
        assert_eq!(session.count_state().decks_remaining, 50.0 / 52.0);
        assert_eq!(session.shuffle_generation(), 1);
    }

    #[test]
    fn rejects_non_positive_bankroll() {
        let result = Session::new(SessionConfig {
            bankroll: 0.0,
            ..SessionConfig::default()
        });
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
