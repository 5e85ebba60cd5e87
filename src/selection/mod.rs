//! Node Selection
//!
//! Matches inventory nodes against a label expression and jobs against a
//! node's labels.
//!
//! Selection algorithm:
//! 1. Drop offline nodes (unless included explicitly)
//! 2. Build each node's label set (configured labels + node name)
//! 3. Keep nodes whose label set satisfies the expression
//! 4. Sort deterministically: by priority (lower = higher), then by name
//! 5. Choose first

use chrono::{DateTime, Utc};
use label_expr::LabelExpression;
use serde::{Deserialize, Serialize};

use crate::inventory::{Inventory, JobEntry, NodeEntry};

/// Schema version for selection reports
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "node-labels/selection@1";

/// Knobs shared by node and job matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Consider offline nodes as candidates
    pub include_offline: bool,

    /// Count each node's own name as one of its labels
    pub add_host_label: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            include_offline: false,
            add_host_label: true,
        }
    }
}

impl SelectionOptions {
    /// Include offline nodes
    pub fn with_offline(mut self, include_offline: bool) -> Self {
        self.include_offline = include_offline;
        self
    }

    /// Set whether node names count as labels
    pub fn with_host_label(mut self, add_host_label: bool) -> Self {
        self.add_host_label = add_host_label;
        self
    }
}

/// Node selection errors
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// Inventory has no nodes
    #[error("No nodes configured in inventory")]
    NoNodesConfigured,

    /// No node satisfies the expression
    #[error("No nodes match label expression: {expression}")]
    NoLabelMatch { expression: String },

    /// Named node does not exist
    #[error("Unknown node: '{0}'")]
    UnknownNode(String),
}

/// Selection report (serialized by `nodes --json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When selection was performed
    pub created_at: DateTime<Utc>,

    /// Label expression the nodes were matched against
    pub expression: String,

    /// Matching nodes in selection order
    pub candidates: Vec<String>,

    /// First candidate, if any
    pub selected: Option<String>,

    /// Offline nodes that were not considered
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_offline: Vec<String>,
}

/// Nodes and jobs tied to a single label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelUsage {
    /// The label
    pub label: String,

    /// Nodes carrying the label (a node carries its own name)
    pub nodes: Vec<String>,

    /// Jobs whose label expression mentions the label
    pub jobs: Vec<String>,
}

/// Nodes whose labels satisfy `expression`, in selection order
pub fn eligible_nodes<'a>(
    inventory: &'a Inventory,
    expression: &LabelExpression,
    options: &SelectionOptions,
) -> Vec<&'a NodeEntry> {
    let nodes: Vec<_> = inventory
        .sorted_by_priority()
        .into_iter()
        .filter(|node| options.include_offline || !node.offline)
        .filter(|node| node.label_set(options.add_host_label).satisfies(expression))
        .collect();
    tracing::debug!(
        expression = %expression,
        candidates = nodes.len(),
        "matched nodes against label expression"
    );
    nodes
}

/// Pick a node for `expression` and describe the decision
pub fn select_node(
    inventory: &Inventory,
    expression: &LabelExpression,
    options: &SelectionOptions,
) -> Result<SelectionReport, SelectionError> {
    if inventory.is_empty() {
        return Err(SelectionError::NoNodesConfigured);
    }

    let candidates: Vec<String> = eligible_nodes(inventory, expression, options)
        .into_iter()
        .map(|node| node.name.clone())
        .collect();
    let skipped_offline = if options.include_offline {
        Vec::new()
    } else {
        inventory
            .sorted_by_priority()
            .into_iter()
            .filter(|node| node.offline)
            .map(|node| node.name.clone())
            .collect()
    };

    if candidates.is_empty() {
        return Err(SelectionError::NoLabelMatch {
            expression: expression.to_string(),
        });
    }

    Ok(SelectionReport {
        schema_version: SCHEMA_VERSION,
        schema_id: SCHEMA_ID.to_string(),
        created_at: Utc::now(),
        expression: expression.to_string(),
        selected: candidates.first().cloned(),
        candidates,
        skipped_offline,
    })
}

/// Jobs that may run on the named node
pub fn jobs_for_node<'a>(
    inventory: &'a Inventory,
    node_name: &str,
    options: &SelectionOptions,
) -> Result<Vec<&'a JobEntry>, SelectionError> {
    let node = inventory
        .node(node_name)
        .ok_or_else(|| SelectionError::UnknownNode(node_name.to_string()))?;
    let labels = node.label_set(options.add_host_label);

    Ok(inventory
        .jobs
        .iter()
        .filter(|job| job.matches_labels(&labels))
        .collect())
}

/// Nodes carrying `label` and jobs whose expression mentions it
pub fn labels_tied_to(inventory: &Inventory, label: &str) -> LabelUsage {
    let nodes = inventory
        .sorted_by_priority()
        .into_iter()
        .filter(|node| node.label_set(true).labels.contains(label))
        .map(|node| node.name.clone())
        .collect();
    let jobs = inventory
        .jobs
        .iter()
        .filter(|job| {
            job.label_expression()
                .is_some_and(|expr| expr.identifiers().contains(label))
        })
        .map(|job| job.name.clone())
        .collect();

    LabelUsage {
        label: label.to_string(),
        nodes,
        jobs,
    }
}

impl SelectionReport {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
