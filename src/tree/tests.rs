//! Tests for the tree classifiers.

use super::*;

/// STATE/UT code <= 0.5 -> low; otherwise YEAR > 2010 -> high.
fn state_year_tree() -> DecisionTreeClassifier {
    DecisionTreeClassifier::from_root(
        TreeNode::split(
            0,
            0.5,
            TreeNode::leaf(0, 30),
            TreeNode::split(2, 2010.0, TreeNode::leaf(0, 12), TreeNode::leaf(1, 18)),
        ),
        3,
    )
    .expect("valid tree")
}

fn constant_tree(class_label: i64) -> DecisionTreeClassifier {
    DecisionTreeClassifier::from_root(TreeNode::leaf(class_label, 1), 3).expect("valid tree")
}

#[test]
fn test_depth() {
    assert_eq!(TreeNode::leaf(0, 1).depth(), 0);
    assert_eq!(state_year_tree().depth(), Some(2));
    assert_eq!(DecisionTreeClassifier::new().depth(), None);
}

#[test]
fn test_predict_follows_splits() {
    let tree = state_year_tree();
    let x = Matrix::from_vec(
        3,
        3,
        vec![
            0.0, 4.0, 2023.0, // state 0 -> left leaf
            1.0, 4.0, 2005.0, // state 1, early year
            1.0, 4.0, 2023.0, // state 1, late year
        ],
    )
    .expect("3*3=9 elements");
    assert_eq!(tree.predict(&x).expect("predict"), vec![0, 0, 1]);
}

#[test]
fn test_threshold_is_inclusive_on_the_left() {
    let tree = state_year_tree();
    let x = Matrix::from_row(&[1.0, 0.0, 2010.0]);
    assert_eq!(tree.predict(&x).expect("predict"), vec![0]);
}

#[test]
fn test_predict_unfitted_fails() {
    let err = DecisionTreeClassifier::new()
        .predict(&Matrix::from_row(&[0.0, 0.0, 2023.0]))
        .unwrap_err();
    assert!(err.to_string().contains("not fitted"));
}

#[test]
fn test_predict_feature_count_mismatch_fails() {
    let err = state_year_tree()
        .predict(&Matrix::from_row(&[0.0, 2023.0]))
        .unwrap_err();
    assert!(matches!(err, CrimeRiskError::PredictionFailure { .. }));
    assert!(err.to_string().contains("Feature count mismatch"));
}

#[test]
fn test_from_root_rejects_out_of_range_split() {
    let result = DecisionTreeClassifier::from_root(
        TreeNode::split(5, 0.0, TreeNode::leaf(0, 1), TreeNode::leaf(1, 1)),
        3,
    );
    assert!(result.is_err());
}

#[test]
fn test_leaf_may_carry_any_label() {
    let tree = constant_tree(-1);
    assert_eq!(
        tree.predict(&Matrix::from_row(&[0.0, 0.0, 2023.0])).expect("predict"),
        vec![-1]
    );
}

#[test]
fn test_forest_majority_vote() {
    let forest =
        RandomForestClassifier::from_trees(vec![constant_tree(1), constant_tree(0), constant_tree(1)])
            .expect("valid forest");
    assert_eq!(forest.n_estimators(), 3);
    assert_eq!(forest.n_features(), Some(3));
    let x = Matrix::from_row(&[0.0, 0.0, 2023.0]);
    assert_eq!(forest.predict(&x).expect("predict"), vec![1]);
}

#[test]
fn test_forest_tie_goes_to_smallest_label() {
    let forest = RandomForestClassifier::from_trees(vec![constant_tree(1), constant_tree(0)])
        .expect("valid forest");
    let x = Matrix::from_row(&[0.0, 0.0, 2023.0]);
    assert_eq!(forest.predict(&x).expect("predict"), vec![0]);
}

#[test]
fn test_forest_per_sample_votes() {
    let forest = RandomForestClassifier::from_trees(vec![
        state_year_tree(),
        state_year_tree(),
        constant_tree(0),
    ])
    .expect("valid forest");
    let x = Matrix::from_vec(2, 3, vec![1.0, 0.0, 2020.0, 0.0, 0.0, 2020.0]).expect("2*3=6");
    assert_eq!(forest.predict(&x).expect("predict"), vec![1, 0]);
}

#[test]
fn test_forest_empty_rejected() {
    assert!(RandomForestClassifier::from_trees(Vec::new()).is_err());
}

#[test]
fn test_model_save_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("crime_model.bin");

    let model = ClassifierModel::RandomForest(
        RandomForestClassifier::from_trees(vec![state_year_tree(), constant_tree(1)])
            .expect("valid forest"),
    );
    model.save(&path).expect("save");

    let loaded = ClassifierModel::load(&path).expect("load");
    assert_eq!(loaded, model);
    assert_eq!(loaded.kind(), "random-forest");
    assert_eq!(loaded.n_features(), Some(3));
}

#[test]
fn test_model_load_garbage_is_startup_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("crime_model.bin");
    std::fs::write(&path, b"\x80\x04\x95 not a bincode model").expect("write");

    let err = ClassifierModel::load(&path).unwrap_err();
    assert!(matches!(
        err,
        CrimeRiskError::StartupLoadFailure {
            artifact: Artifact::Model,
            ..
        }
    ));
}

#[test]
fn test_model_load_unfitted_tree_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("crime_model.bin");
    ClassifierModel::DecisionTree(DecisionTreeClassifier::new())
        .save(&path)
        .expect("save");

    let err = ClassifierModel::load(&path).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("not fitted"));
}
