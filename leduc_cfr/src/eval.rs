use std::{
    fs::{
        self,
        File,
    },
    io::{
        BufWriter,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
};

use clap::{
    Args,
    ValueHint,
};
use log::{
    debug,
    info,
};
use more_asserts::assert_le;
use rand::{
    seq::SliceRandom,
    Rng,
    SeedableRng,
};
use rand_distr::{
    Distribution,
    WeightedIndex,
};
use wyhash::WyRng;

use crate::{
    error::{
        LeducError,
        LeducResult,
    },
    games::leduc::{
        get_active_player,
        hand_rank,
        is_chance_node,
        is_terminal,
        terminal_util,
        valid_actions,
        Action,
        Card,
        Deck,
        History,
        LeducInfoSet,
        MAX_HISTORY_LEN,
    },
    strategy::{
        Strategy,
        StrategyProfile,
    },
};

/// Decides the action of one player given what that player can observe.
pub trait Policy {
    fn choose_action<R: Rng>(
        &self,
        rng: &mut R,
        history: &History,
        hole_card: Card,
        community_card: Option<Card>,
    ) -> LeducResult<Action>;
}

/// Samples actions from trained average strategies, uniformly for unknown info sets.
pub struct TrainedPolicy<'a, St: Strategy> {
    strategy: &'a St,
}

impl<'a, St: Strategy> TrainedPolicy<'a, St> {
    pub fn new(strategy: &'a St) -> Self {
        Self {
            strategy,
        }
    }
}

impl<St: Strategy> Policy for TrainedPolicy<'_, St> {
    fn choose_action<R: Rng>(
        &self,
        rng: &mut R,
        history: &History,
        hole_card: Card,
        community_card: Option<Card>,
    ) -> LeducResult<Action> {
        let actions = valid_actions(history)?;
        let info_set = LeducInfoSet::new(hole_card, community_card, history.clone());
        let probs = self.strategy.safe_get_strategy(actions.len(), &info_set);
        if probs.len() != actions.len() {
            return Err(LeducError::StrategyLength {
                info_set: info_set.to_string(),
                expected: actions.len(),
                got: probs.len(),
            });
        }
        let dist = WeightedIndex::new(&probs).map_err(|e| LeducError::InvalidWeights {
            info_set: info_set.to_string(),
            reason: e.to_string(),
        })?;
        Ok(actions[dist.sample(rng)])
    }
}

/// Picks any legal action with equal probability.
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose_action<R: Rng>(
        &self,
        rng: &mut R,
        history: &History,
        _hole_card: Card,
        _community_card: Option<Card>,
    ) -> LeducResult<Action> {
        valid_actions(history)?
            .choose(rng)
            .copied()
            .ok_or_else(|| LeducError::InvalidHistory(history.to_string()))
    }
}

/// Bets strong hands, plays medium hands passively and gives up weak hands.
///
/// After the flop the weakest hand (Queen-Jack) is played aggressively as a bluff.
pub struct HonestPolicy;

impl HonestPolicy {
    fn passive_action(history: &History) -> Action {
        match history.last() {
            Some(Action::Bet) => Action::Call,
            Some(Action::Raise) => Action::Fold,
            _ => Action::Check,
        }
    }
}

impl Policy for HonestPolicy {
    fn choose_action<R: Rng>(
        &self,
        _rng: &mut R,
        history: &History,
        hole_card: Card,
        community_card: Option<Card>,
    ) -> LeducResult<Action> {
        let actions = valid_actions(history)?;
        let cautious = actions[0];
        let aggressive = actions[actions.len() - 1];

        let action = match community_card {
            None => match hole_card {
                Card::King => aggressive,
                Card::Queen => Self::passive_action(history),
                Card::Jack => cautious,
            },
            Some(community_card) => match hand_rank(hole_card, community_card) {
                4 | 5 => Self::passive_action(history),
                _ => aggressive,
            },
        };
        Ok(action)
    }
}

/// Plays one hand on `deck` and returns the utility of `hero`, seated at `hero_seat`.
pub fn play_hand<R: Rng, H: Policy, V: Policy>(
    rng: &mut R,
    deck: &Deck,
    hero_seat: usize,
    hero: &H,
    villain: &V,
) -> LeducResult<f64> {
    let villain_seat = hero_seat ^ 1;
    let mut history = History::new();
    while !is_terminal(&history) {
        if is_chance_node(&history) {
            history = history.with_action(Action::Deal);
            continue;
        }

        let player = get_active_player(&history);
        let hole_card = deck.hole_card(player);
        let community_card = if history.is_dealt() { Some(deck.community_card()) } else { None };
        let action = if player == hero_seat {
            hero.choose_action(rng, &history, hole_card, community_card)?
        } else {
            villain.choose_action(rng, &history, hole_card, community_card)?
        };
        if !valid_actions(&history)?.contains(&action) {
            return Err(LeducError::InvalidHistory(format!(
                "{:?} is not legal after {:?}",
                action,
                history.to_string()
            )));
        }
        history = history.with_action(action);
        assert_le!(history.len(), MAX_HISTORY_LEN);
    }

    // terminal_util is relative to the player attributed to the final position
    let util = if get_active_player(&history) == hero_seat {
        terminal_util(
            &history,
            deck.hole_card(hero_seat),
            deck.hole_card(villain_seat),
            deck.community_card(),
        )?
    } else {
        -terminal_util(
            &history,
            deck.hole_card(villain_seat),
            deck.hole_card(hero_seat),
            deck.community_card(),
        )?
    };
    debug!("{:?} {:10} hero(seat {}): {}", deck, history.to_string(), hero_seat, util);
    Ok(util as f64)
}

/// Plays `rounds` hands, alternating seats, and returns the hero's accumulated utility
/// after each hand.
pub fn simulate<R: Rng, H: Policy, V: Policy>(
    rng: &mut R,
    hero: &H,
    villain: &V,
    rounds: usize,
) -> LeducResult<Vec<f64>> {
    let mut deck = Deck::default();
    let mut accumulated = 0.0;
    let mut series = Vec::with_capacity(rounds);
    for round in 0..rounds {
        deck.shuffle(rng);
        accumulated += play_hand(rng, &deck, round % 2, hero, villain)?;
        series.push(accumulated);
    }
    Ok(series)
}

#[derive(Args, Debug, Clone)]
pub struct SimulationArgs {
    /// JSON strategy profile written by `train --output`.
    #[clap(long, short = 'p', value_parser, value_hint(ValueHint::FilePath))]
    pub strategy: PathBuf,

    #[clap(long, short, value_parser, default_value_t = 10_000)]
    pub rounds: usize,

    #[clap(long, short, value_parser, default_value_t = 42)]
    pub seed: u64,

    /// Directory receiving one CSV file per opponent.
    #[clap(long, short, value_parser, value_hint(ValueHint::DirPath), default_value = "logs/simulation")]
    pub output_dir: PathBuf,
}

fn write_series(path: &Path, series: &[f64]) -> LeducResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "round,accumulated_utility")?;
    for (round, util) in series.iter().enumerate() {
        writeln!(w, "{},{}", round, util)?;
    }
    w.flush()?;
    Ok(())
}

fn report(opponent: &str, series: &[f64]) {
    if let Some(total) = series.last() {
        info!(
            "CFR vs {}: {:+.1} after {} hands ({:+.4} per hand)",
            opponent,
            total,
            series.len(),
            total / series.len() as f64
        );
    }
}

/// Plays the trained profile against the honest and the random policies.
pub fn run_simulation(args: &SimulationArgs) -> LeducResult<()> {
    let profile = StrategyProfile::load(&args.strategy)?;
    info!(
        "Loaded {} info sets trained for {} iterations (game value {:.4})",
        profile.len(),
        profile.iterations,
        profile.game_value
    );

    let cfr = TrainedPolicy::new(&profile);
    let mut rng = WyRng::seed_from_u64(args.seed);
    fs::create_dir_all(&args.output_dir)?;

    let vs_honest = simulate(&mut rng, &cfr, &HonestPolicy, args.rounds)?;
    report("honest", &vs_honest);
    write_series(&args.output_dir.join("cfr_vs_honest.csv"), &vs_honest)?;

    let vs_random = simulate(&mut rng, &cfr, &RandomPolicy, args.rounds)?;
    report("random", &vs_random);
    write_series(&args.output_dir.join("cfr_vs_random.csv"), &vs_random)?;

    info!("Series written to {}", args.output_dir.display());
    Ok(())
}
