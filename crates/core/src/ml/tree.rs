//! CART regression tree grown by variance reduction.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf { value: f64 },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { max_depth: None, min_samples_split: 2, min_samples_leaf: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    /// Grows a tree over the rows named by `sample` (indices may repeat).
    pub fn fit(x: &[Vec<f64>], y: &[f64], sample: &[usize], params: &TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, sample.to_vec(), 0, params);
        tree
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        sample: Vec<usize>,
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let index = self.nodes.len();
        let value = mean(y, &sample);
        self.nodes.push(Node::Leaf { value });

        let depth_reached = params.max_depth.is_some_and(|max_depth| depth >= max_depth);
        if depth_reached || sample.len() < params.min_samples_split.max(2) || is_pure(y, &sample) {
            return index;
        }

        let Some(split) = best_split(x, y, &sample, params.min_samples_leaf) else {
            return index;
        };

        let (left_sample, right_sample): (Vec<usize>, Vec<usize>) =
            sample.into_iter().partition(|&row| x[row][split.feature] <= split.threshold);

        let left = self.grow(x, y, left_sample, depth + 1, params);
        let right = self.grow(x, y, right_sample, depth + 1, params);
        self.nodes[index] =
            Node::Split { feature: split.feature, threshold: split.threshold, left, right };
        index
    }
}

fn mean(y: &[f64], sample: &[usize]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    sample.iter().map(|&row| y[row]).sum::<f64>() / sample.len() as f64
}

fn is_pure(y: &[f64], sample: &[usize]) -> bool {
    let first = y[sample[0]];
    sample.iter().all(|&row| (y[row] - first).abs() <= f64::EPSILON)
}

/// Maximises `sum_l^2 / n_l + sum_r^2 / n_r`, which is equivalent to minimising the
/// children's summed squared error. Ties keep the earliest feature and threshold.
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    sample: &[usize],
    min_samples_leaf: usize,
) -> Option<SplitCandidate> {
    let n = sample.len();
    let total: f64 = sample.iter().map(|&row| y[row]).sum();
    let parent_score = total * total / n as f64;
    let min_leaf = min_samples_leaf.max(1);
    let width = x[sample[0]].len();

    let mut best: Option<SplitCandidate> = None;
    let mut ordered: Vec<(f64, f64)> = Vec::with_capacity(n);

    for feature in 0..width {
        ordered.clear();
        ordered.extend(sample.iter().map(|&row| (x[row][feature], y[row])));
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_sum = 0.0;
        for position in 0..n - 1 {
            left_sum += ordered[position].1;
            let left_count = position + 1;
            let right_count = n - left_count;
            if left_count < min_leaf || right_count < min_leaf {
                continue;
            }

            let (current, next) = (ordered[position].0, ordered[position + 1].0);
            if current >= next {
                continue;
            }

            let right_sum = total - left_sum;
            let score = left_sum * left_sum / left_count as f64
                + right_sum * right_sum / right_count as f64;
            let improves_on_best = best.as_ref().map_or(true, |best| score > best.score);
            if score > parent_score + 1e-9 && improves_on_best {
                let midpoint = current + (next - current) / 2.0;
                let threshold = if midpoint < next { midpoint } else { current };
                best = Some(SplitCandidate { feature, threshold, score });
            }
        }
    }

    best
}
