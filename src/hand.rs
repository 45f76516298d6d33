use serde::Serialize;

use crate::card::Card;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandValue {
    pub hard_total: u8,
    pub soft_total: u8,
    pub is_soft: bool,
    pub is_bust: bool,
    pub is_blackjack: bool,
}

impl HandValue {
    /// The total the hand plays as.
    pub fn best_total(&self) -> u8 {
        self.soft_total
    }
}

/// Totals saturate at `u8::MAX`, so any oversized list still reads as bust.
pub fn evaluate(cards: &[Card]) -> HandValue {
    let hard_total = cards
        .iter()
        .fold(0u8, |total, card| total.saturating_add(card.hard_value()));
    let has_ace = cards.iter().any(Card::is_ace);
    let soft_total = if has_ace && hard_total <= 11 {
        hard_total + 10
    } else {
        hard_total
    };
    let is_blackjack = cards.len() == 2
        && cards.iter().any(Card::is_ace)
        && cards.iter().any(|c| c.rank.is_ten_value());

    HandValue {
        hard_total,
        soft_total,
        is_soft: soft_total != hard_total,
        is_bust: hard_total > 21,
        is_blackjack,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Hand { cards }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn value(&self) -> HandValue {
        evaluate(&self.cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Two cards of equal blackjack value (any two ten-value cards pair up).
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].hard_value() == self.cards[1].hard_value()
    }

    /// Splits a pair into two one-card hands. Returns `None` for anything
    /// that is not a pair.
    pub fn split(self) -> Option<(Hand, Hand)> {
        if !self.is_pair() {
            return None;
        }
        let [first, second]: [Card; 2] = self.cards.try_into().ok()?;
        Some((Hand::new(vec![first]), Hand::new(vec![second])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|&r| Card::new(r, Suit::Hearts)).collect()
    }

    #[test]
    fn simple_hard_total() {
        let value = evaluate(&cards(&[Rank::Two, Rank::Three]));
        assert_eq!(value.hard_total, 5);
        assert_eq!(value.soft_total, 5);
        assert!(!value.is_soft);
    }

    #[test]
    fn huge_hand_saturates_and_busts() {
        let value = evaluate(&cards(&[Rank::King; 26]));
        assert_eq!(value.hard_total, u8::MAX);
        assert!(value.is_bust);
        assert!(!value.is_soft);

        let mut aces = vec![Rank::Ace; 30];
        aces.extend([Rank::King; 25]);
        assert!(evaluate(&cards(&aces)).is_bust);
    }

    #[test]
    fn ace_six_is_soft_seventeen() {
        let value = evaluate(&cards(&[Rank::Ace, Rank::Six]));
        assert_eq!(value.hard_total, 7);
        assert_eq!(value.soft_total, 17);
        assert!(value.is_soft);
        assert_eq!(value.best_total(), 17);
    }

    #[test]
    fn ace_forced_hard_when_eleven_would_bust() {
        let value = evaluate(&cards(&[Rank::Ace, Rank::Six, Rank::Nine]));
        assert_eq!(value.hard_total, 16);
        assert_eq!(value.soft_total, 16);
        assert!(!value.is_soft);
    }

    #[test]
    fn two_aces_and_nine_make_twenty_one() {
        let value = evaluate(&cards(&[Rank::Ace, Rank::Ace, Rank::Nine]));
        assert_eq!(value.best_total(), 21);
        assert!(!value.is_blackjack);
    }

    #[test]
    fn ace_king_is_blackjack() {
        let value = evaluate(&cards(&[Rank::Ace, Rank::King]));
        assert!(value.is_blackjack);
        assert_eq!(value.best_total(), 21);
        assert!(!evaluate(&cards(&[Rank::King, Rank::Queen])).is_blackjack);
        assert!(!evaluate(&cards(&[Rank::Seven, Rank::Seven, Rank::Seven])).is_blackjack);
    }

    #[test]
    fn bust_uses_hard_total() {
        let value = evaluate(&cards(&[Rank::King, Rank::Queen, Rank::Five]));
        assert!(value.is_bust);
        assert_eq!(value.hard_total, 25);
    }

    #[test]
    fn totals_invariants_hold_for_every_three_card_hand() {
        for a in Rank::ALL {
            for b in Rank::ALL {
                for c in Rank::ALL {
                    let value = evaluate(&cards(&[a, b, c]));
                    assert!(value.hard_total <= value.soft_total);
                    assert!(value.soft_total <= 21 || value.soft_total == value.hard_total);
                    if value.is_bust {
                        assert_eq!(value.soft_total, value.hard_total);
                    }
                    assert!(!value.is_blackjack);
                }
            }
        }
    }

    #[test]
    fn evaluation_ignores_card_order() {
        for a in Rank::ALL {
            for b in Rank::ALL {
                assert_eq!(evaluate(&cards(&[a, b])), evaluate(&cards(&[b, a])));
            }
        }
    }

    #[test]
    fn split_pair_into_two_hands() {
        let hand = Hand::new(cards(&[Rank::Eight, Rank::Eight]));
        let (left, right) = hand.split().unwrap();
        assert_eq!(left.cards, cards(&[Rank::Eight]));
        assert_eq!(right.cards, cards(&[Rank::Eight]));
    }

    #[test]
    fn ten_value_cards_pair_up() {
        assert!(Hand::new(cards(&[Rank::King, Rank::Ten])).is_pair());
        assert!(!Hand::new(cards(&[Rank::Eight, Rank::Nine])).is_pair());
        assert!(Hand::new(cards(&[Rank::Eight, Rank::Nine])).split().is_none());
        assert!(!Hand::new(cards(&[Rank::Eight, Rank::Eight, Rank::Two])).is_pair());
    }
}
