use clap::{
    Parser,
    Subcommand,
};

use leduc_cfr::{
    eval::{
        self,
        SimulationArgs,
    },
    solvers::chance_sampling::{
        Trainer,
        TrainingArgs,
    },
};

#[derive(Parser)]
struct AppArgs {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Trains the strategies with chance-sampling CFR.
    Train(TrainingArgs),
    /// Plays a trained strategy profile against reference policies.
    Simulate(SimulationArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize env_logger with a default log level of INFO.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = AppArgs::parse();
    match args.command {
        Command::Train(training_args) => {
            let mut trainer = Trainer::new(training_args.seed);
            trainer.train(&training_args)?;
        }
        Command::Simulate(simulation_args) => {
            eval::run_simulation(&simulation_args)?;
        }
    }
    Ok(())
}
