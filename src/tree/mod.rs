//! Pre-trained decision tree classifiers.
//!
//! Trees are built elsewhere and shipped as bincode artifacts; this module
//! only evaluates them:
//! - CART decision tree (`feature <= threshold` goes left)
//! - Random forest with majority voting
//!
//! # Example
//!
//! ```
//! use crimerisk::primitives::Matrix;
//! use crimerisk::traits::Classifier;
//! use crimerisk::tree::{DecisionTreeClassifier, TreeNode};
//!
//! // YEAR > 2015 -> class 1
//! let tree = DecisionTreeClassifier::from_root(
//!     TreeNode::split(2, 2015.0, TreeNode::leaf(0, 40), TreeNode::leaf(1, 25)),
//!     3,
//! )
//! .expect("valid tree");
//!
//! let x = Matrix::from_row(&[0.0, 0.0, 2023.0]);
//! assert_eq!(tree.predict(&x).expect("predict"), vec![1]);
//! ```

use crate::error::{Artifact, CrimeRiskError, Result};
use crate::primitives::Matrix;
use crate::traits::Classifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Internal node in a decision tree.
///
/// Contains a split condition (feature and threshold) and pointers to
/// left and right subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class label for this leaf
    pub class_label: i64,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Creates a leaf.
    #[must_use]
    pub fn leaf(class_label: i64, n_samples: usize) -> Self {
        TreeNode::Leaf(Leaf {
            class_label,
            n_samples,
        })
    }

    /// Creates an internal split node.
    #[must_use]
    pub fn split(feature_idx: usize, threshold: f32, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Node(Node {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Returns the largest feature index used by any split, if any.
    fn max_feature_idx(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Node(node) => [
                Some(node.feature_idx),
                node.left.max_feature_idx(),
                node.right.max_feature_idx(),
            ]
            .into_iter()
            .flatten()
            .max(),
        }
    }
}

/// Decision tree classifier using the CART layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    /// Number of features the model was trained on (for validation)
    #[serde(default)]
    n_features: Option<usize>,
}

impl DecisionTreeClassifier {
    /// Creates an empty (unfitted) classifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            n_features: None,
        }
    }

    /// Wraps an already-built tree expecting `n_features` inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if a split references a feature index `>= n_features`.
    pub fn from_root(root: TreeNode, n_features: usize) -> Result<Self> {
        let model = Self {
            tree: Some(root),
            n_features: Some(n_features),
        };
        model.validate()?;
        Ok(model)
    }

    /// Returns true if the model holds a tree.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Returns the tree depth, or `None` if unfitted.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::depth)
    }

    /// Checks internal consistency of a deserialized tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or a split index is out of range.
    pub fn validate(&self) -> Result<()> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| CrimeRiskError::prediction("Model not fitted"))?;
        if let (Some(max_idx), Some(n_features)) = (tree.max_feature_idx(), self.n_features) {
            if max_idx >= n_features {
                return Err(CrimeRiskError::prediction(format!(
                    "split on feature {max_idx} but model expects {n_features} features"
                )));
            }
        }
        Ok(())
    }

    /// Predicts the class label for a single sample.
    fn predict_one(tree: &TreeNode, x: &[f32]) -> Result<i64> {
        let mut node = tree;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return Ok(leaf.class_label),
                TreeNode::Node(internal) => {
                    let value = x.get(internal.feature_idx).ok_or_else(|| {
                        CrimeRiskError::prediction(format!(
                            "split on feature {} but sample has {} features",
                            internal.feature_idx,
                            x.len()
                        ))
                    })?;
                    node = if *value <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i64>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| CrimeRiskError::prediction("Model not fitted"))?;
        check_feature_count(self.n_features, x)?;
        x.rows().map(|row| Self::predict_one(tree, row)).collect()
    }
}

/// Random forest classifier: majority vote over decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
}

impl RandomForestClassifier {
    /// Creates a forest from already-built trees.
    ///
    /// # Errors
    ///
    /// Returns an error if `trees` is empty or any tree is invalid.
    pub fn from_trees(trees: Vec<DecisionTreeClassifier>) -> Result<Self> {
        let forest = Self { trees };
        forest.validate()?;
        Ok(forest)
    }

    /// Returns the number of trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Checks every tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is empty or a tree is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(CrimeRiskError::prediction("Random forest has no trees"));
        }
        self.trees.iter().try_for_each(DecisionTreeClassifier::validate)
    }
}

impl Classifier for RandomForestClassifier {
    fn n_features(&self) -> Option<usize> {
        self
            .trees
            .iter()
            .find_map(<DecisionTreeClassifier as Classifier>::n_features)
    }

    /// Ties go to the smallest class label.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i64>> {
        if self.trees.is_empty() {
            return Err(CrimeRiskError::prediction("Random forest has no trees"));
        }

        let per_tree = self
            .trees
            .iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        let predictions = (0..x.n_rows())
            .map(|sample_idx| {
                let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
                for tree_predictions in &per_tree {
                    *votes.entry(tree_predictions[sample_idx]).or_insert(0) += 1;
                }
                // BTreeMap iterates ascending, so the first maximum wins
                votes
                    .into_iter()
                    .fold((0, 0), |best, (class, count)| {
                        if count > best.1 {
                            (class, count)
                        } else {
                            best
                        }
                    })
                    .0
            })
            .collect();

        Ok(predictions)
    }
}

/// Serialized classifier artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassifierModel {
    /// Single decision tree.
    DecisionTree(DecisionTreeClassifier),
    /// Random forest.
    RandomForest(RandomForestClassifier),
}

impl ClassifierModel {
    /// Short name of the model family.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierModel::DecisionTree(_) => "decision-tree",
            ClassifierModel::RandomForest(_) => "random-forest",
        }
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), String> {
        let bytes = bincode::serialize(self).map_err(|e| format!("Serialization failed: {e}"))?;
        fs::write(path, bytes).map_err(|e| format!("File write failed: {e}"))?;
        Ok(())
    }

    /// Loads and validates a model from a bincode file.
    ///
    /// # Errors
    ///
    /// Returns `StartupLoadFailure` if reading, decoding or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|e| CrimeRiskError::load_failure(Artifact::Model, path, e))?;
        let model: Self = bincode::deserialize(&bytes).map_err(|e| {
            CrimeRiskError::load_failure(Artifact::Model, path, format!("Deserialization failed: {e}"))
        })?;
        let validation = match &model {
            ClassifierModel::DecisionTree(tree) => tree.validate(),
            ClassifierModel::RandomForest(forest) => forest.validate(),
        };
        validation.map_err(|e| CrimeRiskError::load_failure(Artifact::Model, path, e))?;
        Ok(model)
    }
}

impl Classifier for ClassifierModel {
    fn n_features(&self) -> Option<usize> {
        match self {
            ClassifierModel::DecisionTree(tree) => tree.n_features(),
            ClassifierModel::RandomForest(forest) => forest.n_features(),
        }
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i64>> {
        match self {
            ClassifierModel::DecisionTree(tree) => tree.predict(x),
            ClassifierModel::RandomForest(forest) => forest.predict(x),
        }
    }
}

fn check_feature_count(expected: Option<usize>, x: &Matrix<f32>) -> Result<()> {
    match expected {
        Some(expected) if expected != x.n_cols() => Err(CrimeRiskError::prediction(format!(
            "Feature count mismatch: model was trained with {expected} features but input has {} features",
            x.n_cols()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests;
