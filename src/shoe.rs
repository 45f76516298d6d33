use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::{
    card::{Card, Rank, Suit},
    error::{EngineError, Result},
};

pub const CARDS_PER_DECK: usize = 52;

pub struct Shoe {
    pub num_decks: u8,
    cards: Vec<Card>,
    cursor: usize,
    penetration_threshold: u8,
    rng: SmallRng,
}

impl Shoe {
    pub fn new(num_decks: u8, penetration_threshold: u8, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut shoe = Shoe {
            num_decks,
            cards: Vec::new(),
            cursor: 0,
            penetration_threshold,
            rng,
        };
        shoe.shuffle();
        shoe
    }

    /// A shoe that deals `cards` in the given order. Once reshuffled it
    /// behaves like an ordinary `num_decks` shoe.
    pub fn stacked(cards: Vec<Card>, num_decks: u8, penetration_threshold: u8) -> Self {
        Shoe {
            num_decks,
            cards,
            cursor: 0,
            penetration_threshold,
            rng: SmallRng::seed_from_u64(0),
        }
    }

    pub fn shuffle(&mut self) {
        self.shuffle_without(&[]);
    }

    /// Rebuilds and shuffles the shoe, leaving out one copy of each card in
    /// `in_play` so cards still on the table cannot be dealt again.
    pub fn shuffle_without(&mut self, in_play: &[Card]) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    self.cards.push(Card::new(rank, suit));
                }
            }
        }
        for card in in_play {
            if let Some(pos) = self.cards.iter().position(|c| c == card) {
                self.cards.swap_remove(pos);
            }
        }
        self.cards.shuffle(&mut self.rng);
        self.cursor = 0;
        tracing::debug!(
            num_decks = self.num_decks,
            held_back = in_play.len(),
            "shoe shuffled"
        );
    }

    pub fn draw(&mut self) -> Result<Card> {
        let card = *self.cards.get(self.cursor).ok_or(EngineError::ShoeExhausted)?;
        self.cursor += 1;
        Ok(card)
    }

    pub fn remaining_cards(&self) -> usize {
        self.cards.len() - self.cursor
    }

    pub fn dealt_cards(&self) -> usize {
        self.cursor
    }

    pub fn decks_remaining(&self) -> f64 {
        self.remaining_cards() as f64 / CARDS_PER_DECK as f64
    }

    /// Percentage of the shoe already dealt.
    pub fn penetration(&self) -> f64 {
        if self.cards.is_empty() {
            return 100.0;
        }
        (self.cursor as f64 / self.cards.len() as f64) * 100.0
    }

    pub fn should_reshuffle(&self) -> bool {
        self.penetration() >= self.penetration_threshold as f64
    }

    /// Pulls the first undealt card of `rank` out of the shoe, used to build
    /// fixed spots.
    pub fn take_rank(&mut self, rank: Rank) -> Option<Card> {
        let pos = self.cards[self.cursor..].iter().position(|c| c.rank == rank)?;
        Some(self.cards.remove(self.cursor + pos))
    }
}
