use blackjack_trainer_core::{
    card::Card,
    config::{CountingInput, SessionConfig},
    counter::CardCounter,
    round::{HandOutcome, RoundController, RoundOutcome, RoundPhase},
    session::Session,
    shoe::Shoe,
    strategy::{Action, RuleSource},
    EngineError,
};

fn cards(labels: &[&str]) -> Vec<Card> {
    labels.iter().map(|l| Card::parse(l).unwrap()).collect()
}

fn counting() -> SessionConfig {
    SessionConfig {
        counting: Some(CountingInput {
            enabled: true,
            ..CountingInput::default()
        }),
        ..SessionConfig::default()
    }
}

/// Deal order: player, dealer up, player, dealer hole, then draws in order.
fn stacked(labels: &[&str], config: SessionConfig) -> RoundController {
    let shoe = Shoe::stacked(cards(labels), 1, 100);
    RoundController::new(Session::with_shoe(config, shoe).unwrap())
}

fn hi_lo_sum(cards: &[Card]) -> i32 {
    let counter = CardCounter::hi_lo();
    cards.iter().map(|c| counter.point_value(c.rank)).sum()
}

#[test]
fn sixteen_against_ten_hits_then_busts() {
    let mut round = stacked(&["10", "10", "6", "7", "K"], SessionConfig::default());
    round.start(10.0).unwrap();
    assert_eq!(round.phase(), RoundPhase::PlayerTurn);

    let rec = round.recommend().unwrap();
    assert_eq!(rec.action, Action::Hit);
    assert!(rec.rationale.contains("strong"), "{}", rec.rationale);

    let feedback = round.act(Action::Hit).unwrap();
    assert!(feedback.is_optimal);
    assert_eq!(round.phase(), RoundPhase::Complete);

    let summary = round.summary().unwrap();
    assert_eq!(summary.outcome, RoundOutcome::Loss);
    assert_eq!(summary.hands[0].outcome, HandOutcome::Loss);
    assert_eq!(summary.wager_delta, -10.0);
    assert_eq!(summary.dealer_cards.len(), 2);
    assert_eq!(summary.correct_decisions, 1);
    assert_eq!(round.session().bankroll(), 990.0);
}

#[test]
fn split_plays_both_hands_before_the_dealer() {
    let mut round = stacked(
        &["8", "6", "8", "10", "3", "10", "10", "10"],
        SessionConfig::default(),
    );
    round.start(10.0).unwrap();
    assert_eq!(round.recommend().unwrap().action, Action::Split);
    round.act(Action::Split).unwrap();

    assert_eq!(round.phase(), RoundPhase::PlayerTurn);
    let hands = round.hands();
    assert_eq!(hands.len(), 2);
    assert_eq!(hands.iter().map(|h| h.wager).sum::<f64>(), 20.0);
    assert_eq!(hands[0].hand.cards, cards(&["8", "3"]));
    assert_eq!(hands[1].hand.cards, cards(&["8", "10"]));

    // 11 against a 6 doubles after the split
    assert!(round.legal_actions().contains(&Action::Double));
    round.act(Action::Double).unwrap();
    assert_eq!(round.phase(), RoundPhase::PlayerTurn);
    assert_eq!(round.active_hand_index(), Some(1));

    round.act(Action::Stand).unwrap();
    assert_eq!(round.phase(), RoundPhase::Complete);

    let summary = round.summary().unwrap();
    assert_eq!(summary.dealer_cards, cards(&["6", "10", "10"]));
    assert_eq!(summary.hands[0].wager, 20.0);
    assert_eq!(summary.hands[0].net, 20.0);
    assert_eq!(summary.hands[1].net, 10.0);
    assert_eq!(summary.total_wagered, 30.0);
    assert_eq!(summary.wager_delta, 30.0);
    assert_eq!(summary.decisions.len(), 3);
    assert_eq!(round.session().bankroll(), 1030.0);
}

#[test]
fn rejected_action_changes_nothing() {
    let mut round = stacked(&["10", "9", "7", "8", "2"], counting());
    round.start(10.0).unwrap();
    let before = round.view();
    assert_eq!(
        round.act(Action::Surrender),
        Err(EngineError::InvalidAction {
            action: Action::Surrender
        })
    );
    assert_eq!(round.view(), before);
    assert!(round.summary().is_none());
}

#[test]
fn forced_reshuffle_resets_count_and_is_reported() {
    let mut round = stacked(&["10", "6", "9", "10"], counting());
    round.start(10.0).unwrap();
    round.act(Action::Stand).unwrap();

    let summary = round.summary().unwrap();
    assert!(summary.reshuffled_mid_round);
    assert!(summary.dealer_cards.len() >= 3);
    // only the cards drawn after the reshuffle are in the new count
    assert_eq!(
        summary.final_count.running_count,
        hi_lo_sum(&summary.dealer_cards[2..])
    );

    round.next_round().unwrap();
    round.start(10.0).unwrap();
    assert!(round.summary().map_or(true, |s| !s.reshuffled_mid_round));
}

#[test]
fn every_revealed_card_is_counted_once() {
    let mut round = RoundController::new(
        Session::new(SessionConfig {
            seed: Some(2024),
            ..counting()
        })
        .unwrap(),
    );
    let mut seen = Vec::new();
    for _ in 0..12 {
        round.start(10.0).unwrap();
        while round.phase() == RoundPhase::PlayerTurn {
            let action = round.recommend().unwrap().action;
            round.act(action).unwrap();
        }
        let summary = round.summary().unwrap().clone();
        for hand in &summary.hands {
            seen.extend_from_slice(&hand.cards);
        }
        seen.extend_from_slice(&summary.dealer_cards);
        assert_eq!(summary.final_count.running_count, hi_lo_sum(&seen));
        assert!(!summary.reshuffled_mid_round);
        round.next_round().unwrap();
    }
    let stats = round.session().stats();
    assert_eq!(stats.rounds, 12);
    assert_eq!(stats.decisions, stats.optimal_decisions);
}

#[test]
fn high_count_flips_sixteen_against_ten_to_stand() {
    let mut round = stacked(
        &["2", "3", "4", "5", "6", "2", "3", "10", "K", "6", "9"],
        counting(),
    );
    round.start(10.0).unwrap();
    round.act(Action::Stand).unwrap();
    let first = round.summary().unwrap();
    assert_eq!(first.dealer_cards, cards(&["3", "5", "6", "2", "3"]));
    assert_eq!(first.final_count.running_count, 7);

    round.next_round().unwrap();
    round.start(10.0).unwrap();
    assert_eq!(round.session().count_state().running_count, 6);

    let rec = round.recommend().unwrap();
    assert_eq!(rec.action, Action::Stand);
    assert!(matches!(rec.source, RuleSource::Deviation { .. }));
    assert!(rec.rationale.starts_with("True count is positive"));
    assert_eq!(rec, round.recommend().unwrap());
}

#[test]
fn wager_rules_and_phases() {
    let mut round = stacked(&["10", "9", "7", "8"], SessionConfig::default());
    assert!(matches!(
        round.start(-5.0),
        Err(EngineError::InvalidWager { .. })
    ));
    round.start(10.0).unwrap();
    assert_eq!(
        round.start(10.0),
        Err(EngineError::InvalidPhase(RoundPhase::PlayerTurn))
    );
    assert_eq!(
        round.next_round(),
        Err(EngineError::InvalidPhase(RoundPhase::PlayerTurn))
    );
}

#[test]
fn hole_card_from_before_a_forced_reshuffle_stays_out_of_the_new_count() {
    let mut round = stacked(&["5", "6", "4", "2"], counting());
    round.start(10.0).unwrap();
    let opening = cards(&["5", "6", "4", "2"]);

    // the hit empties the shoe
    round.act(Action::Hit).unwrap();
    if round.phase() == RoundPhase::PlayerTurn {
        round.act(Action::Stand).unwrap();
    }

    let summary = round.summary().unwrap();
    assert!(summary.reshuffled_mid_round);
    assert_eq!(summary.dealer_cards[1], opening[3]);

    let drawn_after: Vec<Card> = summary.hands[0].cards[2..]
        .iter()
        .chain(&summary.dealer_cards[2..])
        .copied()
        .collect();
    assert!(!drawn_after.is_empty());
    assert!(drawn_after.iter().all(|card| !opening.contains(card)));
    assert_eq!(summary.final_count.running_count, hi_lo_sum(&drawn_after));
}

#[test]
fn penetration_reached_between_rounds_reshuffles_before_the_deal() {
    let shoe = Shoe::stacked(cards(&["10", "9", "7", "8", "5", "5", "5", "5"]), 1, 50);
    let mut round = RoundController::new(Session::with_shoe(counting(), shoe).unwrap());
    round.start(10.0).unwrap();
    round.act(Action::Stand).unwrap();
    assert_eq!(round.summary().unwrap().dealer_cards, cards(&["9", "8"]));
    assert_eq!(round.session().count_state().running_count, -1);

    round.next_round().unwrap();
    round.start(10.0).unwrap();

    // fresh 52-card shoe, four cards dealt from it
    let state = round.session().count_state();
    assert_eq!(state.decks_remaining, 48.0 / 52.0);
    let view = round.view();
    let visible: Vec<Card> = view
        .hands
        .iter()
        .flat_map(|h| h.hand.cards.iter().copied())
        .chain(view.dealer_cards.iter().copied())
        .collect();
    assert_eq!(state.running_count, hi_lo_sum(&visible));
}
