//! Skill co-occurrence graph.
//!
//! Two labels are connected when they appear on the same candidate; the edge
//! weight counts how many candidates list both. The graph is stored as a
//! plain label → neighbor → weight map so it serializes directly and holds
//! no back-references. Component analysis goes through petgraph.

use indexmap::{IndexMap, IndexSet};
use petgraph::graphmap::UnGraphMap;
use petgraph::unionfind::UnionFind;
use serde::Serialize;

use skillmesh_core::{Candidate, Snapshot, Step, Trace, TraceRecorder};

pub const ALGORITHM: &str = "Skill Co-occurrence Graph";

/// Undirected weighted label graph. Both directions of an edge are stored
/// with the same weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillGraph {
    adjacency: IndexMap<String, IndexMap<String, u32>>,
}

impl SkillGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `label` as a node if absent.
    pub fn add_node(&mut self, label: &str) {
        if !self.adjacency.contains_key(label) {
            self.adjacency.insert(label.to_string(), IndexMap::new());
        }
    }

    /// Increments the `u`–`v` edge (creating it at weight 1) and returns the
    /// new weight. Self-loops are refused with `None`.
    pub fn bump_edge(&mut self, u: &str, v: &str) -> Option<u32> {
        if u == v {
            return None;
        }
        let forward = self
            .adjacency
            .entry(u.to_string())
            .or_default()
            .entry(v.to_string())
            .or_insert(0);
        *forward += 1;
        let weight = *forward;
        self.adjacency
            .entry(v.to_string())
            .or_default()
            .insert(u.to_string(), weight);
        Some(weight)
    }

    pub fn adjacency(&self) -> &IndexMap<String, IndexMap<String, u32>> {
        &self.adjacency
    }

    /// Neighbors of `label` with edge weights, in first-seen order.
    pub fn neighbors<'a>(&'a self, label: &str) -> impl Iterator<Item = (&'a str, u32)> + 'a {
        self.adjacency
            .get(label)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(n, &w)| (n.as_str(), w)))
    }

    pub fn weight(&self, u: &str, v: &str) -> Option<u32> {
        self.adjacency.get(u).and_then(|edges| edges.get(v)).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.adjacency.contains_key(label)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexMap::len).sum::<usize>() / 2
    }

    /// Up to `limit` neighbors of `label`, heaviest first, then by name.
    pub fn related(&self, label: &str, limit: usize) -> Vec<(String, u32)> {
        let mut ranked: Vec<(String, u32)> = self
            .neighbors(label)
            .map(|(n, w)| (n.to_string(), w))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Connected components. Each component lists its labels in node order;
    /// components are ordered by their first label's position.
    pub fn clusters(&self) -> Vec<Vec<String>> {
        let mut sets = UnionFind::<usize>::new(self.adjacency.len());
        for (i, edges) in self.adjacency.values().enumerate() {
            for neighbor in edges.keys() {
                if let Some(j) = self.adjacency.get_index_of(neighbor) {
                    sets.union(i, j);
                }
            }
        }

        let mut groups: IndexMap<usize, Vec<String>> = IndexMap::new();
        for (i, label) in self.adjacency.keys().enumerate() {
            groups.entry(sets.find(i)).or_default().push(label.clone());
        }
        groups.into_values().collect()
    }

    /// A borrowed petgraph view for callers that want its algorithms.
    pub fn to_graph_map(&self) -> UnGraphMap<&str, u32> {
        let mut graph = UnGraphMap::new();
        for (label, edges) in &self.adjacency {
            graph.add_node(label.as_str());
            for (neighbor, &weight) in edges {
                graph.add_edge(label.as_str(), neighbor.as_str(), weight);
            }
        }
        graph
    }
}

/// Builds the co-occurrence graph of all candidates' skills.
///
/// Labels are de-duplicated per candidate, keeping first occurrence order.
/// A candidate with fewer than two distinct labels adds isolated nodes only.
pub fn build_co_occurrence(records: &[Candidate]) -> (SkillGraph, Trace) {
    let mut rec = TraceRecorder::new(ALGORITHM);
    let mut graph = SkillGraph::new();

    for record in records {
        let labels: IndexSet<&str> = record.skills.iter().map(String::as_str).collect();
        for label in &labels {
            graph.add_node(label);
        }

        let labels: Vec<&str> = labels.into_iter().collect();
        for (i, &u) in labels.iter().enumerate() {
            for &v in &labels[i + 1..] {
                let Some(weight) = graph.bump_edge(u, v) else {
                    continue;
                };
                rec.record(|id| {
                    let description = if weight == 1 {
                        format!("Connect {} and {} (candidate {})", u, v, record.id)
                    } else {
                        format!(
                            "Strengthen {} and {} to weight {} (candidate {})",
                            u, v, weight, record.id
                        )
                    };
                    Step::new(id, description)
                        .with_snapshot(Snapshot::Edge {
                            from: u.to_string(),
                            to: v.to_string(),
                            weight,
                        })
                        .var("candidate", record.id)
                });
            }
        }
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "co-occurrence graph built"
    );
    (graph, rec.finish())
}
