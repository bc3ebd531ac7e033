pub mod action;
pub mod card;
pub mod deck;
pub mod hands;
pub mod info_set;
pub mod rule;

pub use self::{
    action::*,
    card::*,
    deck::*,
    hands::*,
    info_set::*,
    rule::*,
};
