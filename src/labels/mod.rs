//! Node label sets
//!
//! A node's labels are the space-separated labels configured on it plus,
//! unless disabled, the node name itself: node names are valid labels in a
//! job's label expression.

use label_expr::{LabelExpression, LabelSet, Labels};
use serde::{Deserialize, Serialize};

/// Labels attached to one execution node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLabels {
    /// Node name
    pub node: String,

    /// Effective label set used for matching
    pub labels: LabelSet,
}

impl NodeLabels {
    /// Build the label set of `node_name` from its configured label string.
    pub fn from_label_string(node_name: &str, label_text: &str, add_host_label: bool) -> Self {
        let mut labels = LabelSet::parse(label_text);
        if add_host_label {
            labels.insert(node_name);
        }
        Self {
            node: node_name.to_string(),
            labels,
        }
    }

    /// Whether this node may run a job restricted by `expression`
    pub fn satisfies(&self, expression: &LabelExpression) -> bool {
        expression.matches(&self.labels)
    }
}

impl Labels for NodeLabels {
    fn contains_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}
