use std::{
    fmt::Display,
    str::FromStr,
};

use more_asserts::debug_assert_lt;

use super::rule::{
    is_chance_node,
    is_terminal,
    valid_actions,
};
use crate::error::{
    LeducError,
    LeducResult,
};

/// The longest legal history is `xbrcdxbrc`.
pub const MAX_HISTORY_LEN: usize = 9;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    Check,
    Bet,
    Call,
    Raise,
    Fold,

    // Marks the end of the first betting round and the reveal of the community card.
    Deal,
}

impl Action {
    pub fn to_char(self) -> char {
        match self {
            Action::Check => 'x',
            Action::Bet => 'b',
            Action::Call => 'c',
            Action::Raise => 'r',
            Action::Fold => 'f',
            Action::Deal => 'd',
        }
    }

    pub fn from_char(ch: char) -> LeducResult<Action> {
        match ch {
            'x' => Ok(Action::Check),
            'b' => Ok(Action::Bet),
            'c' => Ok(Action::Call),
            'r' => Ok(Action::Raise),
            'f' => Ok(Action::Fold),
            'd' => Ok(Action::Deal),
            x => Err(LeducError::InvalidAction(x)),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Public sequence of actions of one hand, both betting rounds included.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct History {
    actions: Vec<Action>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(&self, action: Action) -> Self {
        debug_assert_lt!(self.actions.len(), MAX_HISTORY_LEN);
        let mut actions = Vec::with_capacity(self.actions.len() + 1);
        actions.extend_from_slice(&self.actions);
        actions.push(action);
        Self {
            actions,
        }
    }

    #[inline]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[inline]
    pub fn last(&self) -> Option<Action> {
        self.actions.last().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn deal_position(&self) -> Option<usize> {
        self.actions.iter().position(|a| *a == Action::Deal)
    }

    /// Whether the community card has been revealed.
    pub fn is_dealt(&self) -> bool {
        self.deal_position().is_some()
    }

    pub fn preflop(&self) -> &[Action] {
        match self.deal_position() {
            Some(pos) => &self.actions[..pos],
            None => &self.actions,
        }
    }

    pub fn postflop(&self) -> Option<&[Action]> {
        self.deal_position().map(|pos| &self.actions[pos + 1..])
    }

    /// Actions of the betting round in progress.
    pub fn current_round(&self) -> &[Action] {
        self.postflop().unwrap_or(&self.actions)
    }
}

impl Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for act in self.actions.iter() {
            write!(f, "{}", act)?;
        }
        Ok(())
    }
}

impl FromStr for History {
    type Err = LeducError;

    /// Parses a token string, replaying every token through the rules so that only
    /// reachable histories are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut history = History::new();
        for ch in s.chars() {
            let action = Action::from_char(ch)?;
            let legal = if is_terminal(&history) {
                false
            } else if is_chance_node(&history) {
                action == Action::Deal
            } else {
                valid_actions(&history)?.contains(&action)
            };
            if !legal {
                return Err(LeducError::InvalidHistory(format!(
                    "{:?} can not follow {:?}",
                    action, history
                )));
            }
            history = history.with_action(action);
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for s in ["", "x", "brc", "xbrcd", "bcdxbrc", "xbrcdxbrc", "xxdbf"] {
            let history: History = s.parse().unwrap();
            assert_eq!(s, history.to_string());
        }
        let history: History = "xbrcdxbrc".parse().unwrap();
        assert_eq!(MAX_HISTORY_LEN, history.len());
    }

    #[test]
    fn test_parse_rejects_illegal_sequences() {
        for s in ["bb", "xxx", "d", "bf x", "bfd", "brr", "bcdbcd", "xxdxxx", "bcx"] {
            assert!(s.parse::<History>().is_err(), "{} should be rejected", s);
        }
        assert!(matches!("xq".parse::<History>(), Err(LeducError::InvalidAction('q'))));
    }

    #[test]
    fn test_rounds() {
        let history: History = "xbcdb".parse().unwrap();
        assert!(history.is_dealt());
        assert_eq!(&[Action::Check, Action::Bet, Action::Call], history.preflop());
        assert_eq!(Some(&[Action::Bet][..]), history.postflop());
        assert_eq!(&[Action::Bet], history.current_round());

        let history: History = "br".parse().unwrap();
        assert!(!history.is_dealt());
        assert_eq!(None, history.postflop());
        assert_eq!(&[Action::Bet, Action::Raise], history.current_round());
        assert_eq!(Some(Action::Raise), history.last());
    }
}
