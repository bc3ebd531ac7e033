use std::cmp::Ordering;

use super::{
    compare_hands,
    Action,
    Card,
    History,
};
use crate::error::{
    LeducError,
    LeducResult,
};

pub const ANTE: i32 = 1;

// Legal actions by the last action of the history.
const OPENING_ACTIONS: [Action; 2] = [Action::Check, Action::Bet];
const FACING_BET_ACTIONS: [Action; 3] = [Action::Fold, Action::Call, Action::Raise];
const FACING_RAISE_ACTIONS: [Action; 2] = [Action::Fold, Action::Call];

/// Whether `round` is a betting round which ended without a fold.
fn is_round_complete(round: &[Action]) -> bool {
    use Action::*;

    matches!(
        round,
        [Check, Check] | [Bet, Call] | [Check, Bet, Call] | [Bet, Raise, Call] | [Check, Bet, Raise, Call]
    )
}

/// Chips a finished betting round adds to the pot won by the winner.
fn round_payoff(history: &History, round: &[Action]) -> LeducResult<i32> {
    use Action::*;

    match round {
        [Check, Check] | [Bet, Fold] | [Check, Bet, Fold] => Ok(0),
        [Bet, Raise, Fold] | [Check, Bet, Raise, Fold] | [Bet, Call] | [Check, Bet, Call] => Ok(2),
        [Bet, Raise, Call] | [Check, Bet, Raise, Call] => Ok(4),
        _ => Err(LeducError::InvalidHistory(format!(
            "{:?} has an unfinished betting round",
            history.to_string()
        ))),
    }
}

/// Legal actions for the player to act, in the order used by strategy vectors.
pub fn valid_actions(history: &History) -> LeducResult<&'static [Action]> {
    match history.last() {
        None | Some(Action::Deal) | Some(Action::Check) => Ok(&OPENING_ACTIONS),
        Some(Action::Bet) => Ok(&FACING_BET_ACTIONS),
        Some(Action::Raise) => Ok(&FACING_RAISE_ACTIONS),
        Some(act @ Action::Call) | Some(act @ Action::Fold) => Err(LeducError::InvalidHistory(
            format!("no player acts after {:?} in {:?}", act, history.to_string()),
        )),
    }
}

pub fn is_terminal(history: &History) -> bool {
    if history.last() == Some(Action::Fold) {
        return true;
    }
    match history.postflop() {
        Some(round) => is_round_complete(round),
        None => false,
    }
}

pub fn is_chance_node(history: &History) -> bool {
    !history.is_dealt() && is_round_complete(history.actions())
}

/// Index of the player to act: the first player opens each betting round.
pub fn get_active_player(history: &History) -> usize {
    history.current_round().len() % 2
}

/// Utility of the player holding `player_card` at the terminal `history`.
///
/// That player is `get_active_player(history)`: after a fold it is the player who did
/// not fold, who wins the pot regardless of the cards.
pub fn terminal_util(
    history: &History,
    player_card: Card,
    opponent_card: Card,
    community_card: Card,
) -> LeducResult<i32> {
    if !is_terminal(history) {
        return Err(LeducError::InvalidHistory(format!(
            "{:?} is not terminal",
            history.to_string()
        )));
    }

    let postflop = match history.postflop() {
        // folded before the flop
        None => return Ok(ANTE + round_payoff(history, history.actions())?),
        Some(round) => round,
    };

    let pot = ANTE + round_payoff(history, history.preflop())? + round_payoff(history, postflop)?;
    if history.last() == Some(Action::Fold) {
        return Ok(pot);
    }

    match compare_hands(player_card, opponent_card, community_card) {
        Ordering::Greater => Ok(pot),
        Ordering::Less => Ok(-pot),
        Ordering::Equal => Ok(0),
    }
}

/// Sign applied to the utility returned by the first post-flop node when it is read
/// back at the chance node which dealt the community card.
///
/// Utilities are relative to the player `get_active_player` attributes to a history.
/// The player 0 opens the flop round, so the sign flips when the pre-flop round has an
/// odd length (`xbc` and `brc`) and is kept for `xx`, `bc` and `xbrc`.
pub fn chance_transition_sign(history: &History) -> f64 {
    use Action::*;

    debug_assert!(is_chance_node(history));
    match history.actions() {
        [Check, Bet, Call] | [Bet, Raise, Call] => -1.0,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn h(s: &str) -> History {
        s.parse().unwrap()
    }

    /// Every reachable history, in depth-first order.
    fn all_histories() -> Vec<History> {
        fn visit(history: History, out: &mut Vec<History>) {
            out.push(history.clone());
            if is_terminal(&history) {
                return;
            }
            if is_chance_node(&history) {
                visit(history.with_action(Action::Deal), out);
                return;
            }
            for act in valid_actions(&history).unwrap() {
                visit(history.with_action(*act), out);
            }
        }
        let mut out = vec![];
        visit(History::new(), &mut out);
        out
    }

    fn is_decision(history: &History) -> bool {
        !is_terminal(history) && !is_chance_node(history)
    }

    #[test]
    fn test_root() {
        let root = History::new();
        assert_eq!(&[Action::Check, Action::Bet], valid_actions(&root).unwrap());
        assert_eq!(0, get_active_player(&root));
        assert!(!is_terminal(&root));
        assert!(!is_chance_node(&root));
    }

    #[test]
    fn test_valid_actions_depend_on_last_action() {
        let mut by_last: HashMap<Option<Action>, &'static [Action]> = HashMap::new();
        for history in all_histories().iter().filter(|h| is_decision(h)) {
            let actions = valid_actions(history).unwrap();
            let expected = by_last.entry(history.last()).or_insert(actions);
            assert_eq!(*expected, actions, "history: {}", history);
        }
        assert_eq!(&FACING_BET_ACTIONS, by_last[&Some(Action::Bet)]);
        assert_eq!(&FACING_RAISE_ACTIONS, by_last[&Some(Action::Raise)]);
        assert_eq!(&OPENING_ACTIONS, by_last[&Some(Action::Deal)]);
        assert_eq!(&OPENING_ACTIONS, by_last[&Some(Action::Check)]);
    }

    #[test]
    fn test_tree_shape() {
        let histories = all_histories();
        let decisions = histories.iter().filter(|h| is_decision(h)).count();
        let chances = histories.iter().filter(|h| is_chance_node(h)).count();
        let terminals = histories.iter().filter(|h| is_terminal(h)).count();
        // 6 pre-flop decisions, then 6 post-flop decisions after each of the 5 chance nodes
        assert_eq!(6 + 5 * 6, decisions);
        assert_eq!(5, chances);
        // 4 pre-flop folds, then 4 folds and 5 showdowns after each chance node
        assert_eq!(4 + 5 * 9, terminals);
        assert!(histories.iter().all(|h| h.len() <= crate::games::leduc::MAX_HISTORY_LEN));
    }

    #[test]
    fn test_valid_actions_after_closed_round() {
        assert!(matches!(valid_actions(&h("bc")), Err(LeducError::InvalidHistory(_))));
        assert!(matches!(valid_actions(&h("xbf")), Err(LeducError::InvalidHistory(_))));
    }

    #[test]
    fn test_chance_node() {
        let history = h("bc");
        assert!(is_chance_node(&history));
        assert!(!is_terminal(&history));

        let dealt = history.with_action(Action::Deal);
        assert!(!is_chance_node(&dealt));
        assert!(!is_terminal(&dealt));
        assert_eq!(0, get_active_player(&dealt));
        assert_eq!(&OPENING_ACTIONS, valid_actions(&dealt).unwrap());

        for s in ["xx", "xbc", "brc", "xbrc"] {
            assert!(is_chance_node(&h(s)), "{}", s);
        }
        for s in ["", "x", "xb", "bf", "xbcdxx"] {
            assert!(!is_chance_node(&h(s)), "{}", s);
        }
    }

    #[test]
    fn test_preflop_fold() {
        let history = h("xbf");
        assert!(is_terminal(&history));
        assert!(!history.is_dealt());
        assert_eq!(1, terminal_util(&history, Card::Jack, Card::King, Card::King).unwrap());

        // raiser wins after the bettor folds
        let history = h("brf");
        assert_eq!(1, get_active_player(&history));
        assert_eq!(3, terminal_util(&history, Card::Jack, Card::King, Card::Queen).unwrap());
    }

    #[test]
    fn test_postflop_fold() {
        // 1 + 4 (brc) + 2 (xbrf)
        let history = h("brcdxbrf");
        assert!(is_terminal(&history));
        assert_eq!(7, terminal_util(&history, Card::Jack, Card::King, Card::King).unwrap());
    }

    #[test]
    fn test_showdown() {
        let history = h("bcdxx");
        assert!(is_terminal(&history));
        // 1 + 2 + 0
        assert_eq!(3, terminal_util(&history, Card::King, Card::Queen, Card::Jack).unwrap());
        assert_eq!(-3, terminal_util(&history, Card::Queen, Card::King, Card::Jack).unwrap());
        assert_eq!(3, terminal_util(&history, Card::Jack, Card::King, Card::Jack).unwrap());
        assert_eq!(0, terminal_util(&history, Card::Queen, Card::Queen, Card::Jack).unwrap());

        // 1 + 4 + 4
        let history = h("xbrcdxbrc");
        assert_eq!(9, terminal_util(&history, Card::Queen, Card::Jack, Card::King).unwrap());
    }

    #[test]
    fn test_showdown_is_zero_sum() {
        let showdowns: Vec<History> = all_histories()
            .into_iter()
            .filter(|h| is_terminal(h) && h.last() != Some(Action::Fold))
            .collect();
        assert_eq!(25, showdowns.len());
        for history in showdowns.iter() {
            for a in Card::VALUES {
                for b in Card::VALUES {
                    for board in Card::VALUES {
                        let u = terminal_util(history, a, b, board).unwrap();
                        let v = terminal_util(history, b, a, board).unwrap();
                        assert_eq!(u, -v, "{} {} {} {}", history, a, b, board);
                        assert_eq!(a == b, u == 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_terminal_util_rejects_unfinished_hands() {
        for s in ["", "b", "bc", "bcd", "xbcdxb"] {
            assert!(
                matches!(
                    terminal_util(&h(s), Card::King, Card::Queen, Card::Jack),
                    Err(LeducError::InvalidHistory(_))
                ),
                "{}",
                s
            );
        }
    }

    #[test]
    fn test_active_player() {
        assert_eq!(1, get_active_player(&h("x")));
        assert_eq!(0, get_active_player(&h("xb")));
        assert_eq!(1, get_active_player(&h("xbr")));
        assert_eq!(0, get_active_player(&h("xbcd")));
        assert_eq!(1, get_active_player(&h("xbcdb")));
    }

    #[test]
    fn test_chance_transition_sign_follows_parity() {
        for history in all_histories().iter().filter(|h| is_chance_node(h)) {
            let dealt = history.with_action(Action::Deal);
            let expected =
                if get_active_player(history) == get_active_player(&dealt) { 1.0 } else { -1.0 };
            assert_eq!(expected, chance_transition_sign(history), "{}", history);
        }
        assert_eq!(-1.0, chance_transition_sign(&h("xbc")));
        assert_eq!(-1.0, chance_transition_sign(&h("brc")));
        assert_eq!(1.0, chance_transition_sign(&h("xx")));
        assert_eq!(1.0, chance_transition_sign(&h("bc")));
        assert_eq!(1.0, chance_transition_sign(&h("xbrc")));
    }
}
