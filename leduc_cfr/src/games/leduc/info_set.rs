use std::{
    fmt::Display,
    str::FromStr,
};

use super::{
    get_active_player,
    Card,
    Deck,
    History,
};
use crate::error::LeducError;

/// What the player to act can observe: their hole card, the community card once it is
/// revealed and the public history.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LeducInfoSet {
    pub hole_card: Card,
    pub community_card: Option<Card>,
    pub history: History,
}

impl LeducInfoSet {
    pub fn new(hole_card: Card, community_card: Option<Card>, history: History) -> Self {
        debug_assert_eq!(history.is_dealt(), community_card.is_some());
        Self {
            hole_card,
            community_card,
            history,
        }
    }

    /// The info set of the player to act at `history` for the given deal.
    pub fn from_deal(deck: &Deck, history: &History) -> Self {
        let player = get_active_player(history);
        let community_card = if history.is_dealt() { Some(deck.community_card()) } else { None };
        Self::new(deck.hole_card(player), community_card, history.clone())
    }

    #[inline]
    pub fn player(&self) -> usize {
        get_active_player(&self.history)
    }
}

impl Display for LeducInfoSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hole_card)?;
        if let Some(card) = self.community_card {
            write!(f, "{}", card)?;
        }
        write!(f, " {}", self.history)
    }
}

impl FromStr for LeducInfoSet {
    type Err = LeducError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LeducError::InvalidInfoSet(s.to_string());

        let (cards, history) = s.split_once(' ').ok_or_else(invalid)?;
        let history: History = history.parse()?;
        let cards = cards.chars().map(Card::from_char).collect::<Result<Vec<_>, _>>()?;
        let (hole_card, community_card) = match cards[..] {
            [hole] => (hole, None),
            [hole, community] => (hole, Some(community)),
            _ => return Err(invalid()),
        };
        if history.is_dealt() != community_card.is_some() {
            return Err(invalid());
        }
        Ok(Self {
            hole_card,
            community_card,
            history,
        })
    }
}
