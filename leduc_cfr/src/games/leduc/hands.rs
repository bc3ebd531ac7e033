use std::cmp::Ordering;

use super::Card;

/// Showdown rank of a hole card combined with the community card. Lower is stronger.
pub type HandRank = u8;

pub fn hand_rank(hole_card: Card, community_card: Card) -> HandRank {
    use Card::*;

    match (hole_card, community_card) {
        (King, King) => 1,
        (Queen, Queen) => 2,
        (Jack, Jack) => 3,
        (King, Queen) | (Queen, King) => 4,
        (King, Jack) | (Jack, King) => 5,
        (Queen, Jack) | (Jack, Queen) => 6,
    }
}

#[inline]
pub fn is_pair(rank: HandRank) -> bool {
    rank <= 3
}

/// Compares two hole cards on the same board. `Greater` means `a` wins.
pub fn compare_hands(a: Card, b: Card, community_card: Card) -> Ordering {
    hand_rank(b, community_card).cmp(&hand_rank(a, community_card))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_beat_high_cards() {
        assert_eq!(Ordering::Greater, compare_hands(Card::Jack, Card::King, Card::Jack));
        assert_eq!(Ordering::Greater, compare_hands(Card::Queen, Card::King, Card::Queen));
        assert_eq!(Ordering::Less, compare_hands(Card::Queen, Card::Jack, Card::Jack));
    }

    #[test]
    fn test_high_card() {
        // K-Q beats J-Q
        assert_eq!(Ordering::Greater, compare_hands(Card::King, Card::Jack, Card::Queen));
        // K-J beats Q-J
        assert_eq!(Ordering::Greater, compare_hands(Card::King, Card::Queen, Card::Jack));
        // Q-K beats J-K
        assert_eq!(Ordering::Greater, compare_hands(Card::Queen, Card::Jack, Card::King));
    }

    #[test]
    fn test_tie() {
        for board in Card::VALUES {
            for card in Card::VALUES {
                assert_eq!(Ordering::Equal, compare_hands(card, card, board));
            }
        }
    }

    #[test]
    fn test_rank_table_is_symmetric() {
        for a in Card::VALUES {
            for b in Card::VALUES {
                assert_eq!(hand_rank(a, b), hand_rank(b, a));
                assert_eq!(a == b, is_pair(hand_rank(a, b)));
            }
        }
    }
}
