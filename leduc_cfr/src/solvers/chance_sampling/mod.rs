pub mod node;
pub mod store;

use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::PathBuf,
    time::{
        Duration,
        Instant,
    },
};

use clap::{
    Args,
    ValueHint,
};
use log::info;
use more_asserts::assert_le;
use rand::SeedableRng;
use wyhash::WyRng;

use crate::{
    error::{
        LeducError,
        LeducResult,
    },
    games::leduc::{
        chance_transition_sign,
        get_active_player,
        is_chance_node,
        is_terminal,
        terminal_util,
        Action,
        Deck,
        History,
        LeducInfoSet,
        MAX_HISTORY_LEN,
    },
    strategy::StrategyProfile,
};
use store::InfoSetStore;

const LOG_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Args, Debug, Clone)]
pub struct TrainingArgs {
    #[clap(long, short, value_parser = clap::value_parser!(u64).range(1..), default_value_t = 100_000)]
    pub iterations: u64,

    #[clap(long, short, value_parser, default_value_t = 42)]
    pub seed: u64,

    /// CSV file receiving the average game value while training.
    #[clap(long, short, value_parser, value_hint(ValueHint::FilePath))]
    pub log_path: Option<PathBuf>,

    /// JSON file receiving the trained average strategies.
    #[clap(long, short, value_parser, value_hint(ValueHint::FilePath))]
    pub output: Option<PathBuf>,
}

impl TrainingArgs {
    pub fn new(iterations: u64, seed: u64) -> Self {
        TrainingArgs {
            iterations,
            seed,
            log_path: None,
            output: None,
        }
    }
}

/// Chance-sampling CFR: the cards are dealt once per iteration and only the players'
/// actions are traversed exhaustively.
pub struct Trainer {
    store: InfoSetStore,
    rng: WyRng,
}

impl Trainer {
    pub fn new(seed: u64) -> Self {
        Trainer {
            store: InfoSetStore::new(),
            rng: WyRng::seed_from_u64(seed),
        }
    }

    pub fn store(&self) -> &InfoSetStore {
        &self.store
    }

    pub fn into_store(self) -> InfoSetStore {
        self.store
    }

    /// Returns the expected utility of the player to act at `history` under the current
    /// strategies, accumulating regrets and reach probabilities on the way back up.
    pub fn cfr(&mut self, deck: &Deck, history: &History, actions_prob: [f64; 2]) -> LeducResult<f64> {
        assert_le!(history.len(), MAX_HISTORY_LEN);

        let player = get_active_player(history);
        let opponent = player ^ 1;

        if is_terminal(history) {
            let util = terminal_util(
                history,
                deck.hole_card(player),
                deck.hole_card(opponent),
                deck.community_card(),
            )?;
            return Ok(util as f64);
        }

        if is_chance_node(history) {
            let next_history = history.with_action(Action::Deal);
            let util = self.cfr(deck, &next_history, actions_prob)?;
            return Ok(chance_transition_sign(history) * util);
        }

        let info_set = LeducInfoSet::from_deal(deck, history);
        let (actions, strategy) = {
            let node = self.store.get_or_create(info_set.clone())?;
            (node.actions(), node.strategy().to_vec())
        };

        let mut action_utils = vec![0.0; actions.len()];
        let mut node_util = 0.0;
        for (i, act) in actions.iter().enumerate() {
            let next_history = history.with_action(*act);
            let mut next_actions_prob = actions_prob;
            next_actions_prob[player] *= strategy[i];

            // zero-sum: the child's utility belongs to the other player
            action_utils[i] = -self.cfr(deck, &next_history, next_actions_prob)?;
            node_util += strategy[i] * action_utils[i];
        }

        let regrets: Vec<f64> = action_utils.iter().map(|u| u - node_util).collect();
        let node = self.store.get_or_create(info_set)?;
        node.accumulate_regret(&regrets, actions_prob[opponent]);
        node.accumulate_reach(actions_prob[player]);

        Ok(node_util)
    }

    /// One pass over the given deal followed by regret matching on every node.
    pub fn run_iteration(&mut self, deck: &Deck) -> LeducResult<f64> {
        let util = self.cfr(deck, &History::new(), [1.0, 1.0])?;
        self.store.refresh_strategies();
        Ok(util)
    }

    /// Returns the average game value for the first player.
    pub fn train(&mut self, args: &TrainingArgs) -> LeducResult<f64> {
        if args.iterations == 0 {
            return Err(LeducError::InvalidIterations);
        }

        let mut log_writer = match &args.log_path {
            Some(path) => {
                let mut w = BufWriter::new(File::create(path)?);
                writeln!(w, "epoch,elapsed_seconds,game_value")?;
                Some(w)
            }
            None => None,
        };

        let mut deck = Deck::default();
        let mut util = 0.0;
        let start_t = Instant::now();
        let mut timer = Instant::now();
        for i in 0..args.iterations {
            deck.shuffle(&mut self.rng);
            util += self.run_iteration(&deck)?;

            if timer.elapsed() > LOG_INTERVAL {
                let game_value = util / (i + 1) as f64;
                info!(
                    "epoch {:10} ({}): average game value: {}",
                    i,
                    humantime::format_duration(Duration::from_secs(start_t.elapsed().as_secs())),
                    game_value
                );
                if let Some(w) = &mut log_writer {
                    writeln!(w, "{},{},{:.12}", i, start_t.elapsed().as_secs(), game_value)?;
                    w.flush()?;
                }
                timer = Instant::now();
            }
        }
        let game_value = util / args.iterations as f64;
        info!(
            "Training has finished in {}",
            humantime::format_duration(Duration::from_millis(start_t.elapsed().as_millis() as u64))
        );
        self.log_strategies(game_value);

        if let Some(path) = &args.output {
            StrategyProfile::from_store(&self.store, args.iterations, game_value).save(path)?;
            info!("Strategy profile saved to {}", path.display());
        }
        Ok(game_value)
    }

    fn log_strategies(&self, game_value: f64) {
        info!("player 1 expected value: {}", game_value);
        info!("player 2 expected value: {}", -game_value);

        let nodes = self.store.sorted_nodes();
        for player in 0..2 {
            info!("player {} strategies [", player + 1);
            for node in nodes.iter().filter(|n| n.info_set().player() == player) {
                info!("    {}", node);
            }
            info!("]");
        }
        info!("# of infoset: {}", self.store.len());
    }
}

/// Trains for `iterations` sampled deals and returns the average game value of the first
/// player together with the decision points.
pub fn train(iterations: u64, seed: u64) -> LeducResult<(f64, InfoSetStore)> {
    let mut trainer = Trainer::new(seed);
    let game_value = trainer.train(&TrainingArgs::new(iterations, seed))?;
    Ok((game_value, trainer.into_store()))
}
