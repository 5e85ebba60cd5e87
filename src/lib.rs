//! Node Labels - match CI execution nodes against job label expressions
//!
//! Jobs restrict where they may run with a boolean label expression such as
//! `linux&&(docker||podman)`; nodes advertise a set of labels. This crate
//! loads an inventory of both and answers which nodes a job may use and
//! which jobs a node may run. Expression parsing and evaluation live in the
//! `label-expr` crate.

pub mod config;
pub mod inventory;
pub mod labels;
pub mod logging;
pub mod selection;

pub use inventory::{Inventory, InventoryError, JobEntry, NodeEntry};
pub use label_expr::{ExpressionError, LabelExpression, LabelSet, Labels, Token, TokenKind};
pub use labels::NodeLabels;
pub use selection::{
    eligible_nodes, jobs_for_node, labels_tied_to, select_node, LabelUsage, SelectionError,
    SelectionOptions, SelectionReport,
};
