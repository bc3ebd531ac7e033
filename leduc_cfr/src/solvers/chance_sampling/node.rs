use std::fmt::Display;

use more_asserts::debug_assert_ge;

use crate::{
    error::{
        LeducError,
        LeducResult,
    },
    games::leduc::{
        valid_actions,
        Action,
        LeducInfoSet,
    },
};

const MIN_ACTIONS: usize = 2;
const MAX_ACTIONS: usize = 3;

pub fn uniform_strategy(actions_len: usize) -> Vec<f64> {
    vec![1.0 / actions_len as f64; actions_len]
}

/// Normalizes `weights` into a probability vector, or uniform if they sum to zero.
fn normalize_or_uniform(weights: &[f64]) -> Vec<f64> {
    let normalizing_sum: f64 = weights.iter().sum();
    if normalizing_sum > 0.0 {
        weights.iter().map(|w| w / normalizing_sum).collect()
    } else {
        uniform_strategy(weights.len())
    }
}

/// Strategy proportional to the positive part of the accumulated regrets.
pub fn regret_matching(regret_sum: &[f64]) -> Vec<f64> {
    let positive: Vec<f64> = regret_sum.iter().map(|r| r.max(0.0)).collect();
    normalize_or_uniform(&positive)
}

/// Accumulated statistics of one decision point.
#[derive(Clone)]
pub struct Node {
    regret_sum: Vec<f64>,
    strategy: Vec<f64>,
    strategy_sum: Vec<f64>,

    // Reach probability of the acting player, summed over the current iteration.
    reach_pr: f64,
    reach_pr_sum: f64,

    actions: &'static [Action],
    info_set: LeducInfoSet,
}

impl Node {
    pub fn new(info_set: LeducInfoSet) -> LeducResult<Self> {
        let actions = valid_actions(&info_set.history)?;
        Self::with_actions(info_set, actions)
    }

    fn with_actions(info_set: LeducInfoSet, actions: &'static [Action]) -> LeducResult<Self> {
        let actions_len = actions.len();
        if !(MIN_ACTIONS..=MAX_ACTIONS).contains(&actions_len) {
            return Err(LeducError::InvalidActionCount(actions_len));
        }
        Ok(Self {
            regret_sum: vec![0.0; actions_len],
            strategy: uniform_strategy(actions_len),
            strategy_sum: vec![0.0; actions_len],
            reach_pr: 0.0,
            reach_pr_sum: 0.0,

            actions,
            info_set,
        })
    }

    #[inline]
    pub fn actions(&self) -> &'static [Action] {
        self.actions
    }

    #[inline]
    pub fn info_set(&self) -> &LeducInfoSet {
        &self.info_set
    }

    /// Strategy of the current iteration.
    #[inline]
    pub fn strategy(&self) -> &[f64] {
        &self.strategy
    }

    pub fn regret_sum(&self) -> &[f64] {
        &self.regret_sum
    }

    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    pub fn reach_pr_sum(&self) -> f64 {
        self.reach_pr_sum
    }

    /// Adds counterfactual regrets, weighted by the opponent's reach probability.
    pub fn accumulate_regret(&mut self, regrets: &[f64], opponent_prob: f64) {
        debug_assert_eq!(regrets.len(), self.regret_sum.len());
        for (sum, regret) in self.regret_sum.iter_mut().zip(regrets) {
            *sum += opponent_prob * regret;
        }
    }

    pub fn accumulate_reach(&mut self, reach_pr: f64) {
        debug_assert_ge!(reach_pr, 0.0);
        self.reach_pr += reach_pr;
    }

    /// Folds this iteration's strategy into the average and moves on to the next one.
    pub fn refresh_strategy(&mut self) {
        for (sum, prob) in self.strategy_sum.iter_mut().zip(&self.strategy) {
            *sum += self.reach_pr * prob;
        }
        self.reach_pr_sum += self.reach_pr;
        self.strategy = regret_matching(&self.regret_sum);
        self.reach_pr = 0.0;
    }

    pub fn average_strategy(&self) -> Vec<f64> {
        normalize_or_uniform(&self.strategy_sum)
    }
}

impl std::cmp::Eq for Node {}

impl std::cmp::PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.info_set.eq(&other.info_set)
    }
}

impl std::cmp::PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Node {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.info_set.cmp(&other.info_set)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:10}", self.info_set.to_string())?;

        let avg_strategy = self.average_strategy();
        write!(f, " Avg Strategy[")?;
        for (i, act) in self.actions.iter().enumerate() {
            write!(f, "{}: {:.03}, ", act, avg_strategy[i])?;
        }
        write!(f, "]")?;

        Ok(())
    }
}
