use serde::Serialize;

use crate::strategy::{Action, ActionRecommendation};

pub const OPTIMAL_MESSAGE: &str = "Nice! That's the optimal play.";

/// Verdict shown on the feedback card after each decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyFeedback {
    pub player_action: Action,
    pub optimal_action: Action,
    pub is_optimal: bool,
    pub message: String,
    pub recommendation_reason: String,
}

pub fn synthesize(
    player_action: Action,
    recommendation: &ActionRecommendation,
) -> StrategyFeedback {
    let optimal_action = recommendation.action;
    let is_optimal = player_action == optimal_action;
    let message = if is_optimal {
        OPTIMAL_MESSAGE.to_string()
    } else {
        format!("Not quite. You chose {player_action}, but {optimal_action} was the better play.")
    };
    StrategyFeedback {
        player_action,
        optimal_action,
        is_optimal,
        message,
        recommendation_reason: recommendation.rationale.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        card::Card,
        config::TableRules,
        hand::Hand,
        strategy::StrategyChart,
    };

    fn recommendation() -> ActionRecommendation {
        let hand = Hand::new(vec![Card::parse("10").unwrap(), Card::parse("6").unwrap()]);
        StrategyChart::basic(&TableRules::default())
            .recommend(&hand, &Card::parse("10").unwrap(), &[Action::Hit, Action::Stand], None)
            .unwrap()
    }

    #[test]
    fn matching_action_is_optimal() {
        let rec = recommendation();
        let feedback = synthesize(Action::Hit, &rec);
        assert!(feedback.is_optimal);
        assert_eq!(feedback.message, OPTIMAL_MESSAGE);
        assert_eq!(feedback.optimal_action, Action::Hit);
        assert_eq!(feedback.recommendation_reason, rec.rationale);
    }

    #[test]
    fn optimal_iff_actions_match() {
        let rec = recommendation();
        for action in Action::ALL {
            let feedback = synthesize(action, &rec);
            assert_eq!(feedback.is_optimal, action == rec.action);
            assert_eq!(feedback.player_action, action);
        }
    }

    #[test]
    fn suboptimal_message_names_both_actions() {
        let feedback = synthesize(Action::Stand, &recommendation());
        assert!(!feedback.is_optimal);
        assert_eq!(feedback.message, "Not quite. You chose Stand, but Hit was the better play.");
    }

    #[test]
    fn serializes_with_front_end_field_names() {
        let value = serde_json::to_value(synthesize(Action::Hit, &recommendation())).unwrap();
        assert_eq!(value["playerAction"], "Hit");
        assert_eq!(value["optimalAction"], "Hit");
        assert_eq!(value["isOptimal"], true);
        assert!(value["recommendationReason"].is_string());
    }
}
