use std::fmt;

use itertools::Itertools;
use more_asserts::debug_assert_lt;
use rand::{
    seq::SliceRandom,
    Rng,
};

use super::Card;
use crate::error::{
    LeducError,
    LeducResult,
};

pub const DECK_SIZE: usize = 6;

// Positions of the dealt cards.
const COMMUNITY_CARD_POS: usize = 2;

/// The six-card deck, two cards of each rank.
///
/// Positions 0 and 1 are the hole cards of player 0 and player 1, position 2 is the
/// community card revealed after the first betting round.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
}

impl Default for Deck {
    fn default() -> Deck {
        Deck {
            cards: [Card::King, Card::King, Card::Queen, Card::Queen, Card::Jack, Card::Jack],
        }
    }
}

impl Deck {
    /// Builds a deck with a fixed ordering.
    pub fn from_cards(cards: [Card; DECK_SIZE]) -> LeducResult<Deck> {
        for rank in Card::VALUES {
            let count = cards.iter().filter(|c| **c == rank).count();
            if count != 2 {
                return Err(LeducError::InvalidDeck(format!(
                    "expected two {} but got {}: {}",
                    rank,
                    count,
                    cards.iter().join("")
                )));
            }
        }
        Ok(Deck {
            cards,
        })
    }

    /// Builds a deck whose first three positions are the given hole and community cards.
    pub fn cheat(hole_cards: [Card; 2], community_card: Card) -> LeducResult<Deck> {
        let top = [hole_cards[0], hole_cards[1], community_card];
        let mut rest = Deck::default().cards.to_vec();
        for card in top {
            match rest.iter().position(|c| *c == card) {
                Some(i) => {
                    rest.remove(i);
                }
                None => {
                    return Err(LeducError::InvalidDeck(format!(
                        "more than two {} requested: {}",
                        card,
                        top.iter().join("")
                    )))
                }
            }
        }
        Deck::from_cards([top[0], top[1], top[2], rest[0], rest[1], rest[2]])
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    #[inline]
    pub fn hole_card(&self, player: usize) -> Card {
        debug_assert_lt!(player, 2);
        self.cards[player]
    }

    #[inline]
    pub fn community_card(&self) -> Card {
        self.cards[COMMUNITY_CARD_POS]
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({})", self.cards.iter().join(""))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use wyhash::WyRng;

    use super::*;

    fn count(deck: &Deck, card: Card) -> usize {
        deck.cards().iter().filter(|c| **c == card).count()
    }

    #[test]
    fn test_shuffle_keeps_multiset() {
        let mut rng = WyRng::seed_from_u64(7);
        let mut deck = Deck::default();
        for _ in 0..100 {
            deck.shuffle(&mut rng);
            for card in Card::VALUES {
                assert_eq!(2, count(&deck, card));
            }
        }
    }

    #[test]
    fn test_cheat() {
        let deck = Deck::cheat([Card::King, Card::King], Card::Jack).unwrap();
        assert_eq!(Card::King, deck.hole_card(0));
        assert_eq!(Card::King, deck.hole_card(1));
        assert_eq!(Card::Jack, deck.community_card());
        for card in Card::VALUES {
            assert_eq!(2, count(&deck, card));
        }

        assert!(matches!(
            Deck::cheat([Card::Queen, Card::Queen], Card::Queen),
            Err(LeducError::InvalidDeck(_))
        ));
    }

    #[test]
    fn test_from_cards_rejects_wrong_multiset() {
        let cards = [Card::King, Card::King, Card::King, Card::Queen, Card::Jack, Card::Jack];
        assert!(matches!(Deck::from_cards(cards), Err(LeducError::InvalidDeck(_))));
    }
}
