use std::fmt::Display;

use crate::error::{
    LeducError,
    LeducResult,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Card {
    Jack,
    Queen,
    King,
}

impl Card {
    pub const COUNT: usize = 3;
    pub const VALUES: [Card; Self::COUNT] = [Card::King, Card::Queen, Card::Jack];

    pub fn to_char(self) -> char {
        match self {
            Card::Jack => 'J',
            Card::Queen => 'Q',
            Card::King => 'K',
        }
    }

    pub fn from_char(ch: char) -> LeducResult<Card> {
        match ch {
            'J' => Ok(Card::Jack),
            'Q' => Ok(Card::Queen),
            'K' => Ok(Card::King),
            x => Err(LeducError::InvalidCard(x)),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
