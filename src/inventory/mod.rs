//! Node and Job Inventory
//!
//! Parses and validates the inventory file (by default
//! `~/.config/node-labels/inventory.toml`). Nodes carry the labels a CI
//! server would report for them; jobs carry the label expression that
//! restricts where they may run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use label_expr::{ExpressionError, LabelExpression};
use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigError};
use crate::labels::NodeLabels;

/// Inventory file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Execution nodes
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeEntry>,

    /// Jobs and their label restrictions
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobEntry>,
}

fn default_schema_version() -> u32 {
    1
}

/// A single execution node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    /// Unique node name (also usable as a label)
    pub name: String,

    /// Space-separated labels, as configured on the node
    #[serde(default)]
    pub labels: String,

    /// Priority for deterministic selection (lower = higher priority)
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Offline nodes are skipped by selection unless explicitly included
    #[serde(default)]
    pub offline: bool,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_priority() -> i32 {
    100
}

/// A single job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    /// Unique job name
    pub name: String,

    /// Label expression restricting where the job runs; absent means anywhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_node: Option<String>,

    /// Parsed form of `assigned_node`, filled in by validation
    #[serde(skip)]
    expression: Option<LabelExpression>,
}

/// Errors that can occur when loading or validating the inventory
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Failed to read inventory file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate {kind} name: '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{kind} '{name}': missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        name: String,
        field: String,
    },

    #[error("{kind} '{name}': invalid value for '{field}': {reason}")]
    InvalidValue {
        kind: &'static str,
        name: String,
        field: String,
        reason: String,
    },

    #[error("Job '{job}': invalid label expression '{expression}': {source}")]
    InvalidExpression {
        job: String,
        expression: String,
        #[source]
        source: ExpressionError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Inventory file not found: {0}")]
    NotFound(PathBuf),
}

impl Inventory {
    /// Load the inventory from a specific path
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        if !path.exists() {
            return Err(InventoryError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let inventory = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            nodes = inventory.nodes.len(),
            jobs = inventory.jobs.len(),
            "loaded inventory"
        );
        Ok(inventory)
    }

    /// Load the inventory from the configured location
    pub fn load_default() -> Result<Self, InventoryError> {
        Self::load(&Self::default_path()?)
    }

    /// Resolved inventory path (`NODE_LABELS_INVENTORY`, then the per-user default)
    pub fn default_path() -> Result<PathBuf, InventoryError> {
        Ok(config::inventory_path(None)?.value)
    }

    /// Parse the inventory from a TOML string
    pub fn parse(content: &str) -> Result<Self, InventoryError> {
        let mut inventory: Inventory = toml::from_str(content)?;
        inventory.validate()?;
        Ok(inventory)
    }

    /// Validate names and parse job label expressions
    fn validate(&mut self) -> Result<(), InventoryError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            validate_name("node", &node.name)?;
            if !seen.insert(node.name.as_str()) {
                return Err(InventoryError::DuplicateName {
                    kind: "node",
                    name: node.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for job in &self.jobs {
            validate_name("job", &job.name)?;
            if !seen.insert(job.name.as_str()) {
                return Err(InventoryError::DuplicateName {
                    kind: "job",
                    name: job.name.clone(),
                });
            }
        }

        for job in &mut self.jobs {
            job.expression = job.parse_expression()?;
        }

        Ok(())
    }

    /// Get a node by name
    pub fn node(&self, name: &str) -> Option<&NodeEntry> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get a job by name
    pub fn job(&self, name: &str) -> Option<&JobEntry> {
        self.jobs.iter().find(|j| j.name == name)
    }

    /// Nodes sorted by priority (lower priority value = earlier in list), then name
    pub fn sorted_by_priority(&self) -> Vec<&NodeEntry> {
        let mut nodes: Vec<_> = self.nodes.iter().collect();
        nodes.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
        nodes
    }

    /// Check if the inventory has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Names must be non-empty and use only `[A-Za-z0-9_.-]`
fn validate_name(kind: &'static str, name: &str) -> Result<(), InventoryError> {
    if name.is_empty() {
        return Err(InventoryError::MissingField {
            kind,
            name: "(unnamed)".to_string(),
            field: "name".to_string(),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(InventoryError::InvalidValue {
            kind,
            name: name.to_string(),
            field: "name".to_string(),
            reason: "name must contain only alphanumeric characters, dots, dashes, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

impl NodeEntry {
    /// Label set of this node, optionally including its own name
    pub fn label_set(&self, add_host_label: bool) -> NodeLabels {
        NodeLabels::from_label_string(&self.name, &self.labels, add_host_label)
    }

    /// Check if this node carries a configured label (the node name is not counted)
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.split_whitespace().any(|l| l == label)
    }
}

impl JobEntry {
    pub fn new(name: impl Into<String>, assigned_node: Option<&str>) -> Result<Self, InventoryError> {
        let mut job = Self {
            name: name.into(),
            assigned_node: assigned_node.map(str::to_string),
            expression: None,
        };
        job.expression = job.parse_expression()?;
        Ok(job)
    }

    /// The job's label expression, if it is restricted
    pub fn label_expression(&self) -> Option<&LabelExpression> {
        self.expression.as_ref()
    }

    /// Whether the job may run on a node with `labels`
    pub fn matches_labels(&self, labels: &NodeLabels) -> bool {
        match &self.expression {
            Some(expression) => labels.satisfies(expression),
            None => true,
        }
    }

    fn parse_expression(&self) -> Result<Option<LabelExpression>, InventoryError> {
        let Some(text) = self.assigned_node.as_deref() else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        LabelExpression::parse(text)
            .map(Some)
            .map_err(|source| InventoryError::InvalidExpression {
                job: self.name.clone(),
                expression: text.to_string(),
                source,
            })
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            nodes: Vec::new(),
            jobs: Vec::new(),
        }
    }
}
