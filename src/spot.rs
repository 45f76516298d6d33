use serde::Deserialize;

use crate::{
    card::{parse_cards, Card},
    config::{default_num_decks, to_table_rules, RulesInput, TableRules},
    error::{EngineError, Result},
    feedback::{synthesize, StrategyFeedback},
    hand::Hand,
    strategy::{Action, ActionRecommendation, StrategyChart, StrategyInput},
};

/// A single decision point sent from the front end, outside any round.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotInput {
    pub player_cards: Vec<String>,
    pub dealer_card: String,
    /// Codes such as `"H"` or `"split"`. Defaults to everything the opening
    /// hand could do under `rules`.
    #[serde(default)]
    pub legal_actions: Option<Vec<String>>,
    #[serde(default)]
    pub true_count: Option<f64>,
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    #[serde(default)]
    pub rules: RulesInput,
    #[serde(default)]
    pub strategy: Option<StrategyInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotAnswer {
    pub spot: SpotInput,
    pub action: String,
}

struct Spot {
    hand: Hand,
    dealer_up: Card,
    legal: Vec<Action>,
    chart: StrategyChart,
    true_count: Option<f64>,
}

fn prepare(input: SpotInput) -> Result<Spot> {
    let rules = to_table_rules(input.num_decks, &input.rules)?;
    let hand = Hand::new(parse_cards(&input.player_cards)?);
    let dealer_up = Card::parse(&input.dealer_card)?;
    let legal = match &input.legal_actions {
        Some(codes) => codes.iter().map(|code| parse_action(code)).collect::<Result<_>>()?,
        None => opening_actions(&hand, &rules),
    };
    let chart = match input.strategy {
        Some(strategy) => StrategyChart::from_input(strategy, &rules)?,
        None => StrategyChart::basic(&rules),
    };
    Ok(Spot {
        hand,
        dealer_up,
        legal,
        chart,
        true_count: input.true_count,
    })
}

pub fn recommend_spot(input: SpotInput) -> Result<ActionRecommendation> {
    let spot = prepare(input)?;
    spot.chart
        .recommend(&spot.hand, &spot.dealer_up, &spot.legal, spot.true_count)
}

pub fn grade_spot(answer: SpotAnswer) -> Result<StrategyFeedback> {
    let action = parse_action(&answer.action)?;
    let spot = prepare(answer.spot)?;
    if !spot.legal.contains(&action) {
        return Err(EngineError::InvalidAction { action });
    }
    let recommendation =
        spot.chart
            .recommend(&spot.hand, &spot.dealer_up, &spot.legal, spot.true_count)?;
    Ok(synthesize(action, &recommendation))
}

pub fn parse_action(code: &str) -> Result<Action> {
    Action::from_code(code)
        .ok_or_else(|| EngineError::InvalidConfig(format!("unknown action {code:?}")))
}

fn opening_actions(hand: &Hand, rules: &TableRules) -> Vec<Action> {
    let mut legal = vec![Action::Hit, Action::Stand];
    if hand.len() == 2 {
        legal.push(Action::Double);
        if hand.is_pair() {
            legal.push(Action::Split);
        }
        if rules.surrender_allowed {
            legal.push(Action::Surrender);
        }
    }
    legal
}
