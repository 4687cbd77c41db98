//! Decision-forest classifier loaded from a serialized artifact.
//!
//! The artifact is the output of a training run that happened elsewhere;
//! this module only interprets it. Each tree is a flat node array walked
//! from index 0; the forest's answer is the majority class across trees,
//! ties broken toward the smallest code.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{Classifier, ModelError, FEATURE_COUNT};

const FOREST_FORMAT: &str = "cropwise-forest-v1";

#[derive(Debug, Deserialize)]
struct ForestDoc {
    format: String,
    n_features: usize,
    trees: Vec<TreeDoc>,
}

#[derive(Debug, Deserialize)]
struct TreeDoc {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Leaf {
        leaf: i64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug)]
pub struct ForestClassifier {
    trees: Vec<Vec<Node>>,
}

impl ForestClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: ForestDoc = serde_json::from_str(&content).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: ForestDoc) -> Result<Self, ModelError> {
        if doc.format != FOREST_FORMAT {
            return Err(ModelError::Invalid(format!(
                "unsupported model format '{}'",
                doc.format
            )));
        }
        if doc.n_features != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "model was fitted for {} features, expected {}",
                doc.n_features, FEATURE_COUNT
            )));
        }
        if doc.trees.is_empty() {
            return Err(ModelError::Invalid("model contains no trees".to_string()));
        }

        for (t, tree) in doc.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Invalid(format!("tree {} has no nodes", t)));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                if let Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= FEATURE_COUNT {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {} splits on feature {}",
                            t, n, feature
                        )));
                    }
                    if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {} has out-of-range child",
                            t, n
                        )));
                    }
                }
            }
        }

        Ok(Self {
            trees: doc.trees.into_iter().map(|t| t.nodes).collect(),
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn walk(nodes: &[Node], features: &[f64; FEATURE_COUNT]) -> Result<i64, ModelError> {
        let mut index = 0;
        // Child indices are bounds-checked at load time; the step cap guards
        // against an artifact whose valid indices still form a cycle
        for _ in 0..=nodes.len() {
            match &nodes[index] {
                Node::Leaf { leaf } => return Ok(*leaf),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        Err(ModelError::Classification(
            "tree evaluation did not reach a leaf".to_string(),
        ))
    }
}

impl Classifier for ForestClassifier {
    fn classify(&self, features: [f64; FEATURE_COUNT]) -> Result<i64, ModelError> {
        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for nodes in &self.trees {
            let code = Self::walk(nodes, &features)?;
            *votes.entry(code).or_insert(0) += 1;
        }

        // BTreeMap iteration is code-ascending, so on a tie the smallest
        // code wins deterministically
        votes
            .into_iter()
            .max_by_key(|(code, count)| (*count, std::cmp::Reverse(*code)))
            .map(|(code, _)| code)
            .ok_or_else(|| ModelError::Classification("empty forest".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> ForestDoc {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn single_tree_routes_on_threshold() {
        let forest = ForestClassifier::from_doc(doc(
            r#"{
                "format": "cropwise-forest-v1",
                "n_features": 7,
                "trees": [
                    {"nodes": [
                        {"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                        {"leaf": 3},
                        {"leaf": 9}
                    ]}
                ]
            }"#,
        ))
        .unwrap();

        assert_eq!(forest.classify([0.0; 7]).unwrap(), 3);
        assert_eq!(forest.classify([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap(), 9);
    }

    #[test]
    fn majority_vote_wins() {
        let forest = ForestClassifier::from_doc(doc(
            r#"{
                "format": "cropwise-forest-v1",
                "n_features": 7,
                "trees": [
                    {"nodes": [{"leaf": 2}]},
                    {"nodes": [{"leaf": 2}]},
                    {"nodes": [{"leaf": 5}]}
                ]
            }"#,
        ))
        .unwrap();
        assert_eq!(forest.classify([0.0; 7]).unwrap(), 2);
    }

    #[test]
    fn tie_breaks_toward_smallest_code() {
        let forest = ForestClassifier::from_doc(doc(
            r#"{
                "format": "cropwise-forest-v1",
                "n_features": 7,
                "trees": [
                    {"nodes": [{"leaf": 7}]},
                    {"nodes": [{"leaf": 4}]}
                ]
            }"#,
        ))
        .unwrap();
        assert_eq!(forest.classify([0.0; 7]).unwrap(), 4);
    }

    #[test]
    fn rejects_wrong_format_and_feature_count() {
        let err = ForestClassifier::from_doc(doc(
            r#"{"format": "other", "n_features": 7, "trees": [{"nodes": [{"leaf": 1}]}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));

        let err = ForestClassifier::from_doc(doc(
            r#"{"format": "cropwise-forest-v1", "n_features": 4, "trees": [{"nodes": [{"leaf": 1}]}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_children() {
        let err = ForestClassifier::from_doc(doc(
            r#"{
                "format": "cropwise-forest-v1",
                "n_features": 7,
                "trees": [
                    {"nodes": [{"feature": 0, "threshold": 0.0, "left": 1, "right": 99}, {"leaf": 1}]}
                ]
            }"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn cyclic_tree_surfaces_classification_error() {
        // Indices are in range but node 0 points back at itself
        let forest = ForestClassifier::from_doc(doc(
            r#"{
                "format": "cropwise-forest-v1",
                "n_features": 7,
                "trees": [
                    {"nodes": [
                        {"feature": 0, "threshold": 0.5, "left": 0, "right": 1},
                        {"leaf": 1}
                    ]}
                ]
            }"#,
        ))
        .unwrap();
        let err = forest.classify([0.0; 7]).unwrap_err();
        assert!(matches!(err, ModelError::Classification(_)));
    }
}
