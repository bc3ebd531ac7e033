use std::collections::{
    hash_map::Entry,
    HashMap,
};

use itertools::Itertools;
use log::debug;

use super::node::Node;
use crate::{
    error::LeducResult,
    games::leduc::LeducInfoSet,
    strategy::Strategy,
};

/// Decision points visited so far, created on first visit.
#[derive(Clone, Default)]
pub struct InfoSetStore {
    nodes: HashMap<LeducInfoSet, Node>,
}

impl InfoSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, info_set: LeducInfoSet) -> LeducResult<&mut Node> {
        match self.nodes.entry(info_set) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let node = Node::new(e.key().clone())?;
                debug!("new info set: {}", node.info_set());
                Ok(e.insert(node))
            }
        }
    }

    pub fn get(&self, info_set: &LeducInfoSet) -> Option<&Node> {
        self.nodes.get(info_set)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn sorted_nodes(&self) -> Vec<&Node> {
        self.nodes.values().sorted().collect()
    }

    /// Runs regret matching on every node. Called once at the end of each iteration.
    pub fn refresh_strategies(&mut self) {
        for node in self.nodes.values_mut() {
            node.refresh_strategy();
        }
    }
}

impl Strategy for InfoSetStore {
    fn get_strategy(&self, info_set: &LeducInfoSet) -> Option<Vec<f64>> {
        self.nodes.get(info_set).map(|node| node.average_strategy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create() {
        let mut store = InfoSetStore::new();
        assert!(store.is_empty());

        let info_set: LeducInfoSet = "K b".parse().unwrap();
        store.get_or_create(info_set.clone()).unwrap().accumulate_regret(&[1.0, 2.0, 3.0], 1.0);
        assert_eq!(1, store.len());

        // the same node is returned on the next visit
        let node = store.get_or_create(info_set.clone()).unwrap();
        assert_eq!(&[1.0, 2.0, 3.0], node.regret_sum());
        assert_eq!(1, store.len());

        store.get_or_create("J b".parse().unwrap()).unwrap();
        store.get_or_create("KJ bcdb".parse().unwrap()).unwrap();
        assert_eq!(3, store.len());
        assert!(store.get(&"Q b".parse().unwrap()).is_none());
    }

    #[test]
    fn test_refresh_strategies() {
        let mut store = InfoSetStore::new();
        let info_set: LeducInfoSet = "Q ".parse().unwrap();
        store.get_or_create(info_set.clone()).unwrap().accumulate_regret(&[-1.0, 1.0], 1.0);
        store.refresh_strategies();
        assert_eq!(&[0.0, 1.0], store.get(&info_set).unwrap().strategy());
    }

    #[test]
    fn test_sorted_nodes() {
        let mut store = InfoSetStore::new();
        for s in ["K x", "J ", "Q b", "J b"] {
            store.get_or_create(s.parse().unwrap()).unwrap();
        }
        let keys: Vec<String> =
            store.sorted_nodes().iter().map(|n| n.info_set().to_string()).collect();
        assert_eq!(vec!["J ", "J b", "Q b", "K x"], keys);
    }
}
