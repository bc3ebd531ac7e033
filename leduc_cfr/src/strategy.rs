use std::{
    collections::BTreeMap,
    fs::File,
    io::{
        BufReader,
        BufWriter,
        Read,
        Write,
    },
    path::Path,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::{
        LeducError,
        LeducResult,
    },
    games::leduc::{
        valid_actions,
        LeducInfoSet,
    },
    solvers::chance_sampling::{
        node::uniform_strategy,
        store::InfoSetStore,
    },
};

pub trait Strategy {
    /// Action probabilities aligned with `valid_actions(&info_set.history)`.
    fn get_strategy(&self, info_set: &LeducInfoSet) -> Option<Vec<f64>>;

    fn safe_get_strategy(&self, actions_len: usize, info_set: &LeducInfoSet) -> Vec<f64> {
        match self.get_strategy(info_set) {
            Some(s) => s,
            None => uniform_strategy(actions_len),
        }
    }
}

/// Average strategies of a finished training run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyProfile {
    pub iterations: u64,
    pub game_value: f64,
    strategies: BTreeMap<LeducInfoSet, Vec<f64>>,
}

#[derive(Serialize, Deserialize)]
struct ProfileFile {
    iterations: u64,
    game_value: f64,
    strategies: BTreeMap<String, Vec<f64>>,
}

impl StrategyProfile {
    pub fn from_store(store: &InfoSetStore, iterations: u64, game_value: f64) -> Self {
        let strategies = store
            .nodes()
            .map(|node| (node.info_set().clone(), node.average_strategy()))
            .collect();
        Self {
            iterations,
            game_value,
            strategies,
        }
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LeducInfoSet, &Vec<f64>)> {
        self.strategies.iter()
    }

    pub fn write_json<W: Write>(&self, writer: W) -> LeducResult<()> {
        let file = ProfileFile {
            iterations: self.iterations,
            game_value: self.game_value,
            strategies: self.strategies.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        };
        serde_json::to_writer_pretty(writer, &file)?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> LeducResult<Self> {
        let file: ProfileFile = serde_json::from_reader(reader)?;
        let mut strategies = BTreeMap::new();
        for (key, probs) in file.strategies {
            let info_set: LeducInfoSet = key.parse()?;
            let expected = valid_actions(&info_set.history)?.len();
            if probs.len() != expected {
                return Err(LeducError::StrategyLength {
                    info_set: key,
                    expected,
                    got: probs.len(),
                });
            }
            strategies.insert(info_set, probs);
        }
        Ok(Self {
            iterations: file.iterations,
            game_value: file.game_value,
            strategies,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> LeducResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> LeducResult<Self> {
        Self::read_json(BufReader::new(File::open(path)?))
    }
}

impl Strategy for StrategyProfile {
    fn get_strategy(&self, info_set: &LeducInfoSet) -> Option<Vec<f64>> {
        self.strategies.get(info_set).cloned()
    }
}
