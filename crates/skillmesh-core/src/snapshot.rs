//! Per-step state snapshots.
//!
//! A [`Snapshot`] is whatever view of the working data is meaningful for the
//! algorithm that recorded the step. It is a closed set of variants, one per
//! algorithm family, serialized adjacently tagged:
//!
//! ```json
//! { "kind": "sequence", "data": [2, 1, 3] }
//! ```
//!
//! Consumers dispatch on `kind` and never need to know which algorithm
//! produced the trace.

use serde::{Deserialize, Serialize};

use crate::id::CandidateId;

/// State captured alongside a trace step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Snapshot {
    /// Nothing to show (truncation sentinel, summary steps).
    #[default]
    Empty,
    /// Ordered record ids at this point of a sort.
    Sequence(Vec<CandidateId>),
    /// Failure-function table and the two scan pointers of a substring search.
    #[serde(rename_all = "camelCase")]
    Scan {
        failure: Vec<usize>,
        text_index: usize,
        pattern_index: usize,
    },
    /// A balanced-tree fragment (the whole tree or a rotated subtree).
    Tree(TreeNodeView),
    /// Trie walk position and the completions collected so far.
    #[serde(rename_all = "camelCase")]
    Trie {
        path: String,
        depth: usize,
        completions: Vec<String>,
    },
    /// One undirected edge of a label graph and its current weight.
    Edge { from: String, to: String, weight: u32 },
    /// Labels held by each bucket of a hash index, bucket order preserved.
    Buckets(Vec<Vec<String>>),
    /// Remaining budget and selection so far of a budgeted selection.
    Budget {
        remaining: u64,
        selected: Vec<CandidateId>,
    },
    /// One row of a dynamic-programming table.
    Table(Vec<u32>),
}

impl Snapshot {
    /// Returns the serialized `kind` tag of this snapshot.
    pub fn kind(&self) -> &'static str {
        match self {
            Snapshot::Empty => "empty",
            Snapshot::Sequence(_) => "sequence",
            Snapshot::Scan { .. } => "scan",
            Snapshot::Tree(_) => "tree",
            Snapshot::Trie { .. } => "trie",
            Snapshot::Edge { .. } => "edge",
            Snapshot::Buckets(_) => "buckets",
            Snapshot::Budget { .. } => "budget",
            Snapshot::Table(_) => "table",
        }
    }
}

/// Serializable view of one balanced-tree node and its subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNodeView {
    pub id: CandidateId,
    /// The primary ordering key (experience years).
    pub key: u32,
    pub label: String,
    pub height: u32,
    /// height(left) - height(right).
    pub balance: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<TreeNodeView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<TreeNodeView>>,
}

impl TreeNodeView {
    /// Number of nodes in this fragment.
    pub fn size(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.size()) + self.right.as_ref().map_or(0, |n| n.size())
    }
}
