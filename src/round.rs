use serde::Serialize;

use crate::{
    card::{Card, Rank},
    counter::CountState,
    error::{EngineError, Result},
    feedback::{synthesize, StrategyFeedback},
    hand::Hand,
    session::Session,
    strategy::{Action, ActionRecommendation, ChartKey},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum RoundPhase {
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Settlement,
    Complete,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum HandStatus {
    Active,
    Stood,
    Busted,
    Doubled,
    Surrendered,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
    Blackjack,
    Surrender,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum RoundOutcome {
    Win,
    Loss,
    Push,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHand {
    pub hand: Hand,
    pub wager: f64,
    pub status: HandStatus,
    pub from_split: bool,
    pub doubled: bool,
    #[serde(skip)]
    decisions: u32,
}

impl PlayerHand {
    fn new(hand: Hand, wager: f64, from_split: bool) -> Self {
        PlayerHand {
            hand,
            wager,
            status: HandStatus::Active,
            from_split,
            doubled: false,
            decisions: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != HandStatus::Active
    }

    /// Natural blackjack; two-card 21s made after a split do not count.
    pub fn is_natural(&self) -> bool {
        !self.from_split && self.hand.value().is_blackjack
    }

    /// Still in play against the dealer.
    fn is_live(&self) -> bool {
        matches!(self.status, HandStatus::Stood | HandStatus::Doubled)
    }

    /// Marks the hand finished when its cards leave nothing to decide.
    fn settle_status_after_card(&mut self) {
        let value = self.hand.value();
        if value.is_bust {
            self.status = HandStatus::Busted;
        } else if value.best_total() == 21 {
            self.status = HandStatus::Stood;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandResult {
    pub cards: Vec<Card>,
    pub wager: f64,
    pub outcome: HandOutcome,
    pub net: f64,
    pub doubled: bool,
    pub from_split: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub hand_index: usize,
    /// Chart cell the decision was graded against.
    pub cell: ChartKey,
    pub action: Action,
    pub optimal_action: Action,
    pub is_optimal: bool,
}

/// Plain-data result of a finished round, handed to persistence and stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub outcome: RoundOutcome,
    pub wager_delta: f64,
    pub total_wagered: f64,
    pub hands: Vec<HandResult>,
    pub dealer_cards: Vec<Card>,
    pub dealer_total: u8,
    pub decisions: Vec<DecisionRecord>,
    pub correct_decisions: usize,
    /// True count when the cards came out, if counting is on.
    pub opening_true_count: Option<f64>,
    pub final_count: CountState,
    pub reshuffled_mid_round: bool,
}

/// What the table shows right now. The hole card stays hidden until revealed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub phase: RoundPhase,
    pub hands: Vec<PlayerHand>,
    pub active_hand: Option<usize>,
    pub dealer_cards: Vec<Card>,
    pub legal_actions: Vec<Action>,
    pub bankroll: f64,
    pub count: Option<CountState>,
}

/// Drives one round at a time over an owned [`Session`].
pub struct RoundController {
    session: Session,
    phase: RoundPhase,
    hands: Vec<PlayerHand>,
    active: usize,
    dealer: Hand,
    hole_revealed: bool,
    /// Shuffle generation the hole card was dealt in.
    hole_generation: u32,
    decisions: Vec<DecisionRecord>,
    opening_true_count: Option<f64>,
    reshuffled_mid_round: bool,
    summary: Option<RoundSummary>,
}

impl RoundController {
    pub fn new(session: Session) -> Self {
        RoundController {
            session,
            phase: RoundPhase::Betting,
            hands: Vec::new(),
            active: 0,
            dealer: Hand::default(),
            hole_revealed: false,
            hole_generation: 0,
            decisions: Vec::new(),
            opening_true_count: None,
            reshuffled_mid_round: false,
            summary: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn hands(&self) -> &[PlayerHand] {
        &self.hands
    }

    pub fn active_hand_index(&self) -> Option<usize> {
        (self.phase == RoundPhase::PlayerTurn).then_some(self.active)
    }

    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer.cards.first().copied()
    }

    /// Dealer cards the player can see: the up card until the hole card is turned.
    pub fn dealer_visible_cards(&self) -> &[Card] {
        if self.hole_revealed {
            &self.dealer.cards
        } else {
            &self.dealer.cards[..self.dealer.cards.len().min(1)]
        }
    }

    pub fn view(&self) -> TableView {
        TableView {
            phase: self.phase,
            hands: self.hands.clone(),
            active_hand: self.active_hand_index(),
            dealer_cards: self.dealer_visible_cards().to_vec(),
            legal_actions: self.legal_actions(),
            bankroll: self.session.bankroll(),
            count: self
                .session
                .counting_enabled()
                .then(|| self.session.count_state()),
        }
    }

    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    pub fn start(&mut self, wager: f64) -> Result<()> {
        if self.phase != RoundPhase::Betting {
            return Err(EngineError::InvalidPhase(self.phase));
        }
        let bankroll = self.session.bankroll();
        if !(wager.is_finite() && wager > 0.0 && wager <= bankroll) {
            return Err(EngineError::InvalidWager { wager, bankroll });
        }

        self.session.begin_round();
        self.session.reshuffle_if_due();
        self.phase = RoundPhase::Dealing;

        let first = self.session.deal(true)?;
        let up = self.session.deal(true)?;
        let second = self.session.deal(true)?;
        let hole = self.session.deal(false)?;
        self.hole_generation = self.session.shuffle_generation();
        self.hands = vec![PlayerHand::new(Hand::new(vec![first, second]), wager, false)];
        self.dealer = Hand::new(vec![up, hole]);
        self.opening_true_count = self.session.strategy_true_count();
        self.reshuffled_mid_round |= self.session.take_forced_reshuffle();

        let player_natural = self.hands[0].is_natural();
        let dealer_natural = self.dealer.value().is_blackjack;
        tracing::debug!(%up, player_natural, dealer_natural, "round dealt");

        if player_natural || (dealer_natural && self.session.rules().dealer_peeks) {
            self.hands[0].status = HandStatus::Stood;
            return self.finish_player_turn();
        }
        self.phase = RoundPhase::PlayerTurn;
        Ok(())
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        let Some(player) = self.current_hand() else {
            return Vec::new();
        };
        let rules = self.session.rules();
        let available = self.session.bankroll() - self.committed();
        let two_cards = player.hand.len() == 2;

        let mut legal = vec![Action::Hit, Action::Stand];
        if two_cards
            && (!player.from_split || rules.double_after_split)
            && available >= player.wager
        {
            legal.push(Action::Double);
        }
        let splitting_aces = player.hand.cards[0].rank == Rank::Ace;
        if player.hand.is_pair()
            && self.hands.len() < rules.max_split_hands as usize
            && (!splitting_aces || !player.from_split || rules.resplit_aces)
            && available >= player.wager
        {
            legal.push(Action::Split);
        }
        if rules.surrender_allowed
            && two_cards
            && self.hands.len() == 1
            && !player.from_split
            && player.decisions == 0
        {
            legal.push(Action::Surrender);
        }
        legal
    }

    /// What the engine would play for the current hand.
    pub fn recommend(&self) -> Result<ActionRecommendation> {
        let player = self
            .current_hand()
            .ok_or(EngineError::InvalidPhase(self.phase))?;
        let up = self
            .dealer_up_card()
            .ok_or(EngineError::InvalidPhase(self.phase))?;
        self.session.recommend(&player.hand, &up, &self.legal_actions())
    }

    /// Grades `action` against the recommendation, then applies it.
    pub fn act(&mut self, action: Action) -> Result<StrategyFeedback> {
        if self.phase != RoundPhase::PlayerTurn {
            return Err(EngineError::InvalidPhase(self.phase));
        }
        if !self.legal_actions().contains(&action) {
            return Err(EngineError::InvalidAction { action });
        }
        let recommendation = self.recommend()?;
        let feedback = synthesize(action, &recommendation);
        self.decisions.push(DecisionRecord {
            hand_index: self.active,
            cell: recommendation.source.key(),
            action,
            optimal_action: feedback.optimal_action,
            is_optimal: feedback.is_optimal,
        });
        self.hands[self.active].decisions += 1;

        match action {
            Action::Hit => {
                let card = self.session.deal(true)?;
                let player = &mut self.hands[self.active];
                player.hand.push(card);
                player.settle_status_after_card();
            }
            Action::Stand => self.hands[self.active].status = HandStatus::Stood,
            Action::Double => {
                let card = self.session.deal(true)?;
                let player = &mut self.hands[self.active];
                player.wager *= 2.0;
                player.doubled = true;
                player.hand.push(card);
                player.status = if player.hand.value().is_bust {
                    HandStatus::Busted
                } else {
                    HandStatus::Doubled
                };
            }
            Action::Split => self.split_active()?,
            Action::Surrender => self.hands[self.active].status = HandStatus::Surrendered,
        }
        self.reshuffled_mid_round |= self.session.take_forced_reshuffle();

        self.advance()?;
        Ok(feedback)
    }

    /// Returns a completed controller to betting, keeping the shoe and count.
    pub fn next_round(&mut self) -> Result<()> {
        if self.phase != RoundPhase::Complete {
            return Err(EngineError::InvalidPhase(self.phase));
        }
        self.phase = RoundPhase::Betting;
        self.hands.clear();
        self.active = 0;
        self.dealer = Hand::default();
        self.hole_revealed = false;
        self.decisions.clear();
        self.opening_true_count = None;
        self.reshuffled_mid_round = false;
        self.summary = None;
        Ok(())
    }

    fn current_hand(&self) -> Option<&PlayerHand> {
        if self.phase != RoundPhase::PlayerTurn {
            return None;
        }
        self.hands.get(self.active)
    }

    fn committed(&self) -> f64 {
        self.hands.iter().map(|h| h.wager).sum()
    }

    fn split_active(&mut self) -> Result<()> {
        let player = self.hands.remove(self.active);
        let wager = player.wager;
        let Some((left, right)) = player.hand.split() else {
            return Err(EngineError::InvalidAction { action: Action::Split });
        };
        let aces = left.cards[0].rank == Rank::Ace;
        let mut pair = [
            PlayerHand::new(left, wager, true),
            PlayerHand::new(right, wager, true),
        ];
        for split_hand in pair.iter_mut() {
            let card = self.session.deal(true)?;
            split_hand.hand.push(card);
            if aces && self.session.rules().split_aces_one_card {
                split_hand.status = HandStatus::Stood;
            } else {
                split_hand.settle_status_after_card();
            }
        }
        let [left, right] = pair;
        self.hands.insert(self.active, right);
        self.hands.insert(self.active, left);
        Ok(())
    }

    fn advance(&mut self) -> Result<()> {
        while self.active < self.hands.len() && self.hands[self.active].is_terminal() {
            self.active += 1;
        }
        if self.active == self.hands.len() {
            self.finish_player_turn()
        } else {
            Ok(())
        }
    }

    fn finish_player_turn(&mut self) -> Result<()> {
        debug_assert!(self.hands.iter().all(PlayerHand::is_terminal));
        let dealer_must_play = self.hands.iter().any(|h| h.is_live() && !h.is_natural())
            && !self.dealer.value().is_blackjack;
        if dealer_must_play {
            self.phase = RoundPhase::DealerTurn;
            self.reveal_hole();
            self.play_dealer()?;
        } else {
            self.reveal_hole();
        }
        self.reshuffled_mid_round |= self.session.take_forced_reshuffle();
        self.settle();
        Ok(())
    }

    fn reveal_hole(&mut self) {
        if self.hole_revealed {
            return;
        }
        self.hole_revealed = true;
        let Some(hole) = self.dealer.cards.get(1).copied() else {
            return;
        };
        if self.hole_generation == self.session.shuffle_generation() {
            self.session.observe(&hole);
        } else {
            tracing::debug!(%hole, "hole card was dealt before the reshuffle, not counted");
        }
    }

    fn play_dealer(&mut self) -> Result<()> {
        let hits_soft_17 = self.session.rules().dealer_hits_soft_17;
        loop {
            let value = self.dealer.value();
            if value.is_bust {
                break;
            }
            let total = value.best_total();
            let stands = total > 17 || (total == 17 && !(hits_soft_17 && value.is_soft));
            if stands {
                break;
            }
            let card = self.session.deal(true)?;
            self.dealer.push(card);
        }
        Ok(())
    }

    fn settle(&mut self) {
        self.phase = RoundPhase::Settlement;
        let dealer_value = self.dealer.value();
        let payout = self.session.rules().blackjack_payout;

        let hands: Vec<HandResult> = self
            .hands
            .iter()
            .map(|player| {
                let (outcome, net) = hand_outcome(player, &self.dealer, payout);
                HandResult {
                    cards: player.hand.cards.clone(),
                    wager: player.wager,
                    outcome,
                    net,
                    doubled: player.doubled,
                    from_split: player.from_split,
                }
            })
            .collect();

        let wager_delta: f64 = hands.iter().map(|h| h.net).sum();
        let outcome = if wager_delta > 0.0 {
            RoundOutcome::Win
        } else if wager_delta < 0.0 {
            RoundOutcome::Loss
        } else {
            RoundOutcome::Push
        };
        let summary = RoundSummary {
            outcome,
            wager_delta,
            total_wagered: self.committed(),
            hands,
            dealer_cards: self.dealer.cards.clone(),
            dealer_total: dealer_value.best_total(),
            correct_decisions: self.decisions.iter().filter(|d| d.is_optimal).count(),
            decisions: self.decisions.clone(),
            opening_true_count: self.opening_true_count,
            final_count: self.session.count_state(),
            reshuffled_mid_round: self.reshuffled_mid_round,
        };

        self.session.settle(wager_delta);
        self.session.stats_mut().record(&summary);
        tracing::debug!(?outcome, wager_delta, "round settled");
        self.summary = Some(summary);
        self.phase = RoundPhase::Complete;
    }
}

fn hand_outcome(player: &PlayerHand, dealer: &Hand, payout: f64) -> (HandOutcome, f64) {
    let wager = player.wager;
    let dealer_value = dealer.value();
    let dealer_natural = dealer_value.is_blackjack;
    let player_total = player.hand.value().best_total();

    match player.status {
        HandStatus::Surrendered => return (HandOutcome::Surrender, -wager / 2.0),
        HandStatus::Busted => return (HandOutcome::Loss, -wager),
        _ => {}
    }
    if player.is_natural() {
        return if dealer_natural {
            (HandOutcome::Push, 0.0)
        } else {
            (HandOutcome::Blackjack, wager * payout)
        };
    }
    if dealer_natural {
        return (HandOutcome::Loss, -wager);
    }
    if dealer_value.is_bust || player_total > dealer_value.best_total() {
        (HandOutcome::Win, wager)
    } else if player_total < dealer_value.best_total() {
        (HandOutcome::Loss, -wager)
    } else {
        (HandOutcome::Push, 0.0)
    }
}
