use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};

/// Bagged regression trees; every tree sees a bootstrap sample of the training rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Trees are grown sequentially from a single seeded generator, so equal inputs
    /// always produce an equal forest.
    pub fn fit(x: &[Vec<f64>], y: &[f64], n_trees: usize, seed: u64, params: &TreeParams) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows = x.len();

        let trees = (0..n_trees.max(1))
            .map(|_| {
                let sample: Vec<usize> = (0..rows).map(|_| rng.gen_range(0..rows)).collect();
                RegressionTree::fit(x, y, &sample, params)
            })
            .collect();

        Self { trees }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}
