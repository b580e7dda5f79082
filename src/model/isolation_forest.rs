//! Isolation forest outlier detection
//!
//! Anomalies are easier to isolate: random axis-aligned splits reach
//! them in fewer steps, so short average path lengths mean outliers.
//! The fitted forest is serializable and immutable at serving time.

use ndarray::{Array1, Array2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Euler-Mascheroni constant, used by the path-length normalizer.
const EULER_GAMMA: f64 = 0.5772156649;

/// Detector failures.
#[derive(Error, Debug)]
pub enum ForestError {
    #[error("isolation forest has not been fitted")]
    NotFitted,

    #[error("cannot fit isolation forest on an empty matrix")]
    EmptyFit,

    #[error("forest was fitted on {expected} features, input has {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// A node in an isolation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum IsolationNode {
    Internal {
        feature: usize,
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

/// Single isolation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    fn build(data: &Array2<f64>, max_depth: usize, rng: &mut impl Rng) -> Self {
        Self {
            root: Self::build_node(data, 0, max_depth, rng),
        }
    }

    fn build_node(
        data: &Array2<f64>,
        depth: usize,
        max_depth: usize,
        rng: &mut impl Rng,
    ) -> IsolationNode {
        let n_samples = data.nrows();
        let n_features = data.ncols();

        if depth >= max_depth || n_samples <= 1 {
            return IsolationNode::Leaf { size: n_samples };
        }

        let feature = rng.gen_range(0..n_features);

        let col = data.column(feature);
        let min_val = col.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_val = col.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        if (max_val - min_val).abs() < 1e-10 {
            return IsolationNode::Leaf { size: n_samples };
        }

        let threshold = rng.gen_range(min_val..max_val);

        let mut left_indices = Vec::new();
        let mut right_indices = Vec::new();
        for i in 0..n_samples {
            if data[[i, feature]] < threshold {
                left_indices.push(i);
            } else {
                right_indices.push(i);
            }
        }

        if left_indices.is_empty() || right_indices.is_empty() {
            return IsolationNode::Leaf { size: n_samples };
        }

        let left_data = Array2::from_shape_fn((left_indices.len(), n_features), |(i, j)| {
            data[[left_indices[i], j]]
        });
        let right_data = Array2::from_shape_fn((right_indices.len(), n_features), |(i, j)| {
            data[[right_indices[i], j]]
        });

        IsolationNode::Internal {
            feature,
            threshold,
            left: Box::new(Self::build_node(&left_data, depth + 1, max_depth, rng)),
            right: Box::new(Self::build_node(&right_data, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, sample: &Array1<f64>) -> f64 {
        Self::path_length_node(&self.root, sample, 0)
    }

    fn path_length_node(node: &IsolationNode, sample: &Array1<f64>, depth: usize) -> f64 {
        match node {
            IsolationNode::Leaf { size } => depth as f64 + c(*size),
            IsolationNode::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] < *threshold {
                    Self::path_length_node(left, sample, depth + 1)
                } else {
                    Self::path_length_node(right, sample, depth + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over n samples.
fn c(n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else if n == 2 {
        1.0
    } else {
        let n = n as f64;
        2.0 * (n.ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
    }
}

/// Isolation forest with the fit / predict / decision_function contract.
///
/// Label convention: `predict` returns -1 for anomalous rows and +1 for
/// normal rows; `decision_function` returns lower values for more
/// anomalous rows, negative at and beyond the contamination threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Maximum number of samples per tree
    pub max_samples: usize,
    /// Expected proportion of anomalies in the training data
    pub contamination: f64,
    /// Random seed
    pub seed: u64,
    max_depth: usize,
    n_features: usize,
    trees: Vec<IsolationTree>,
    /// Anomaly-score threshold derived from the contamination quantile
    threshold: Option<f64>,
}

impl IsolationForest {
    /// Create an unfitted forest.
    pub fn new(n_estimators: usize, contamination: f64) -> Self {
        Self {
            n_estimators,
            max_samples: 256,
            contamination,
            seed: 42,
            max_depth: 0,
            n_features: 0,
            trees: Vec::new(),
            threshold: None,
        }
    }

    /// Default parameters: 100 trees, 1% contamination.
    pub fn default_params() -> Self {
        Self::new(100, 0.01)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Number of features the forest was fitted on.
    pub fn dim(&self) -> Option<usize> {
        if self.trees.is_empty() {
            None
        } else {
            Some(self.n_features)
        }
    }

    /// Fit the forest and set the anomaly threshold from the
    /// contamination quantile of the training scores.
    pub fn fit(&mut self, data: &Array2<f64>) -> Result<(), ForestError> {
        let n_samples = data.nrows();
        if n_samples == 0 || data.ncols() == 0 {
            return Err(ForestError::EmptyFit);
        }

        let actual_samples = self.max_samples.min(n_samples);
        self.max_depth = (actual_samples as f64).log2().ceil() as usize;
        self.n_features = data.ncols();

        let mut rng = StdRng::seed_from_u64(self.seed);

        self.trees = (0..self.n_estimators)
            .map(|_| {
                let indices: Vec<usize> =
                    (0..n_samples).choose_multiple(&mut rng, actual_samples);
                let sampled =
                    Array2::from_shape_fn((indices.len(), data.ncols()), |(i, j)| {
                        data[[indices[i], j]]
                    });
                IsolationTree::build(&sampled, self.max_depth, &mut rng)
            })
            .collect();

        let scores = self.score_samples(data)?;
        let mut sorted: Vec<f64> = scores.iter().cloned().collect();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());

        let threshold_idx = (n_samples as f64 * self.contamination).ceil() as usize;
        self.threshold = Some(sorted[threshold_idx.min(n_samples - 1)]);

        Ok(())
    }

    /// Raw anomaly scores in (0, 1]: `2^(-E[h(x)] / c(max_samples))`,
    /// higher = more anomalous.
    pub fn score_samples(&self, data: &Array2<f64>) -> Result<Array1<f64>, ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::NotFitted);
        }
        if data.ncols() != self.n_features {
            return Err(ForestError::ShapeMismatch {
                expected: self.n_features,
                got: data.ncols(),
            });
        }

        let normalizer = c(self.max_samples);
        let mut scores = Array1::zeros(data.nrows());

        for i in 0..data.nrows() {
            let sample = data.row(i).to_owned();
            let avg_path: f64 = self
                .trees
                .iter()
                .map(|tree| tree.path_length(&sample))
                .sum::<f64>()
                / self.trees.len() as f64;

            scores[i] = if normalizer > 0.0 {
                2.0_f64.powf(-avg_path / normalizer)
            } else {
                0.5
            };
        }

        Ok(scores)
    }

    /// Signed anomaly score per row: lower = more anomalous, negative =
    /// beyond the contamination threshold.
    pub fn decision_function(&self, data: &Array2<f64>) -> Result<Array1<f64>, ForestError> {
        let threshold = self.threshold.ok_or(ForestError::NotFitted)?;
        let scores = self.score_samples(data)?;
        Ok(scores.mapv(|s| threshold - s))
    }

    /// Label per row: -1 = anomalous, +1 = normal.
    pub fn predict(&self, data: &Array2<f64>) -> Result<Array1<i8>, ForestError> {
        let decision = self.decision_function(data)?;
        Ok(decision.mapv(|d| if d < 0.0 { -1 } else { 1 }))
    }
}
