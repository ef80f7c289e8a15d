//! AVL tree construction with rotation tracking.
//!
//! Candidates are inserted in input order, keyed by
//! `(experience_years, id)`. The id tie-break makes the key total and unique
//! per candidate; inserting a key that is already present replaces the
//! node's label instead of adding a node.
//!
//! After each insertion every ancestor on the insertion path is rebalanced
//! on the way back up. The balance factor `height(left) - height(right)`
//! selects the case:
//!
//! | balance | child balance | case | rotations |
//! |---|---|---|---|
//! | > 1 | >= 0 | Left-Left | right |
//! | > 1 | < 0 | Left-Right | left on child, right |
//! | < -1 | <= 0 | Right-Right | left |
//! | < -1 | > 0 | Right-Left | right on child, left |
//!
//! Each rotation records one step (snapshot: the rotated subtree), and each
//! insertion records one step once the tree is balanced again (snapshot: the
//! whole tree).

use std::cmp::Ordering;

use skillmesh_core::{Candidate, CandidateId, Snapshot, Step, Trace, TraceRecorder, TreeNodeView};

pub const ALGORITHM: &str = "AVL Tree Construction";

#[derive(Debug, Clone)]
struct Node {
    id: CandidateId,
    key: u32,
    label: String,
    height: u32,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(candidate: &Candidate) -> Self {
        Node {
            id: candidate.id,
            key: candidate.experience_years,
            label: candidate.full_name.clone(),
            height: 1,
            left: None,
            right: None,
        }
    }

    fn sort_key(&self) -> (u32, CandidateId) {
        (self.key, self.id)
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i32 {
        height(&self.left) as i32 - height(&self.right) as i32
    }

    fn view(&self) -> TreeNodeView {
        TreeNodeView {
            id: self.id,
            key: self.key,
            label: self.label.clone(),
            height: self.height,
            balance: self.balance(),
            left: self.left.as_ref().map(|n| Box::new(n.view())),
            right: self.right.as_ref().map(|n| Box::new(n.view())),
        }
    }
}

fn height(node: &Option<Box<Node>>) -> u32 {
    node.as_ref().map_or(0, |n| n.height)
}

fn balance_of(node: &Option<Box<Node>>) -> i32 {
    node.as_ref().map_or(0, |n| n.balance())
}

/// A self-balancing binary search tree of candidates.
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Serializable view of the whole tree.
    pub fn root(&self) -> Option<TreeNodeView> {
        self.root.as_ref().map(|n| n.view())
    }

    /// Candidate ids in key order.
    pub fn in_order(&self) -> Vec<CandidateId> {
        fn walk(node: &Option<Box<Node>>, out: &mut Vec<CandidateId>) {
            if let Some(n) = node {
                walk(&n.left, out);
                out.push(n.id);
                walk(&n.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        let target = (candidate.experience_years, candidate.id);
        let mut cursor = &self.root;
        while let Some(n) = cursor {
            match target.cmp(&n.sort_key()) {
                Ordering::Less => cursor = &n.left,
                Ordering::Greater => cursor = &n.right,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Recomputes heights from scratch and checks `|balance| <= 1` at every
    /// node. Does not trust the cached heights.
    pub fn is_balanced(&self) -> bool {
        fn check(node: &Option<Box<Node>>) -> Option<u32> {
            match node {
                None => Some(0),
                Some(n) => {
                    let l = check(&n.left)?;
                    let r = check(&n.right)?;
                    if l.abs_diff(r) > 1 || n.height != 1 + l.max(r) {
                        return None;
                    }
                    Some(1 + l.max(r))
                }
            }
        }
        check(&self.root).is_some()
    }

    /// Inserts one candidate, rebalancing the insertion path and recording
    /// rotation and insertion steps into `rec`.
    pub fn insert(&mut self, candidate: &Candidate, rec: &mut TraceRecorder) {
        let mut rotations = 0usize;
        let mut added = false;
        let root = self.root.take();
        self.root = Some(insert_node(root, candidate, rec, &mut rotations, &mut added));
        if added {
            self.len += 1;
        }

        let key = (candidate.experience_years, candidate.id);
        rec.record(|id| {
            let position = self
                .in_order_keys()
                .iter()
                .position(|k| *k == key)
                .unwrap_or_default();
            let verb = if added { "Insert" } else { "Update" };
            let mut step = Step::new(
                id,
                format!(
                    "{} candidate {} ({}, key {}): {} rotation(s), all ancestors balanced",
                    verb, candidate.id, candidate.full_name, candidate.experience_years, rotations
                ),
            )
            .highlight([position])
            .var("height", self.height())
            .var("size", self.len);
            if let Some(view) = self.root() {
                step = step.with_snapshot(Snapshot::Tree(view));
            }
            step
        });
    }

    fn in_order_keys(&self) -> Vec<(u32, CandidateId)> {
        fn walk(node: &Option<Box<Node>>, out: &mut Vec<(u32, CandidateId)>) {
            if let Some(n) = node {
                walk(&n.left, out);
                out.push(n.sort_key());
                walk(&n.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }
}

/// Builds a tree by inserting `records` in order.
pub fn build_from_sequence(records: &[Candidate]) -> (AvlTree, Trace) {
    let mut rec = TraceRecorder::new(ALGORITHM);
    let mut tree = AvlTree::new();
    for candidate in records {
        tree.insert(candidate, &mut rec);
    }
    tracing::debug!(nodes = tree.len(), height = tree.height(), "avl tree built");
    (tree, rec.finish())
}

fn insert_node(
    node: Option<Box<Node>>,
    candidate: &Candidate,
    rec: &mut TraceRecorder,
    rotations: &mut usize,
    added: &mut bool,
) -> Box<Node> {
    let mut n = match node {
        None => {
            *added = true;
            return Box::new(Node::leaf(candidate));
        }
        Some(n) => n,
    };

    match (candidate.experience_years, candidate.id).cmp(&n.sort_key()) {
        Ordering::Less => {
            n.left = Some(insert_node(n.left.take(), candidate, rec, rotations, added));
        }
        Ordering::Greater => {
            n.right = Some(insert_node(n.right.take(), candidate, rec, rotations, added));
        }
        Ordering::Equal => {
            n.label = candidate.full_name.clone();
            return n;
        }
    }

    n.update_height();
    rebalance(n, rec, rotations)
}

fn rebalance(mut n: Box<Node>, rec: &mut TraceRecorder, rotations: &mut usize) -> Box<Node> {
    let balance = n.balance();

    if balance > 1 {
        if balance_of(&n.left) < 0 {
            if let Some(child) = n.left.take() {
                n.left = Some(rotate_left(child, "Left-Right", rec, rotations));
            }
            return rotate_right(n, "Left-Right", rec, rotations);
        }
        return rotate_right(n, "Left-Left", rec, rotations);
    }

    if balance < -1 {
        if balance_of(&n.right) > 0 {
            if let Some(child) = n.right.take() {
                n.right = Some(rotate_right(child, "Right-Left", rec, rotations));
            }
            return rotate_left(n, "Right-Left", rec, rotations);
        }
        return rotate_left(n, "Right-Right", rec, rotations);
    }

    n
}

/// Promotes `y.left`. Returns `y` unchanged when it has no left child.
fn rotate_right(
    mut y: Box<Node>,
    case: &str,
    rec: &mut TraceRecorder,
    rotations: &mut usize,
) -> Box<Node> {
    let pivot = y.id;
    let pivot_balance = y.balance();
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();

    *rotations += 1;
    record_rotation(rec, "Right", case, pivot, pivot_balance, &x);
    x
}

/// Promotes `x.right`. Returns `x` unchanged when it has no right child.
fn rotate_left(
    mut x: Box<Node>,
    case: &str,
    rec: &mut TraceRecorder,
    rotations: &mut usize,
) -> Box<Node> {
    let pivot = x.id;
    let pivot_balance = x.balance();
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();

    *rotations += 1;
    record_rotation(rec, "Left", case, pivot, pivot_balance, &y);
    y
}

fn record_rotation(
    rec: &mut TraceRecorder,
    direction: &str,
    case: &str,
    pivot: CandidateId,
    pivot_balance: i32,
    new_root: &Node,
) {
    rec.record(|id| {
        Step::new(
            id,
            format!(
                "{} rotation at candidate {} (balance {}, {} case)",
                direction, pivot, pivot_balance, case
            ),
        )
        .with_snapshot(Snapshot::Tree(new_root.view()))
        .var("case", case)
        .var("pivot", pivot)
        .var("newRoot", new_root.id)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(years: &[u32]) -> Vec<Candidate> {
        years
            .iter()
            .enumerate()
            .map(|(i, &y)| Candidate::new(i as u32 + 1, format!("C{}", i + 1)).with_experience(y))
            .collect()
    }

    fn rotation_cases(trace: &Trace) -> Vec<String> {
        trace
            .steps()
            .iter()
            .filter_map(|s| s.variables.get("case").cloned())
            .collect()
    }

    #[test]
    fn ascending_inserts_trigger_right_right() {
        let (tree, trace) = build_from_sequence(&candidates(&[1, 2, 3]));
        assert_eq!(rotation_cases(&trace), vec!["Right-Right"]);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root().unwrap().key, 2);
    }

    #[test]
    fn descending_inserts_trigger_left_left() {
        let (tree, trace) = build_from_sequence(&candidates(&[3, 2, 1]));
        assert_eq!(rotation_cases(&trace), vec!["Left-Left"]);
        assert_eq!(tree.root().unwrap().key, 2);
    }

    #[test]
    fn zigzag_left_triggers_double_rotation() {
        let (tree, trace) = build_from_sequence(&candidates(&[3, 1, 2]));
        assert_eq!(rotation_cases(&trace), vec!["Left-Right", "Left-Right"]);
        assert_eq!(tree.root().unwrap().key, 2);
        assert!(tree.is_balanced());
    }

    #[test]
    fn zigzag_right_triggers_double_rotation() {
        let (tree, trace) = build_from_sequence(&candidates(&[1, 3, 2]));
        assert_eq!(rotation_cases(&trace), vec!["Right-Left", "Right-Left"]);
        assert_eq!(tree.root().unwrap().key, 2);
    }

    #[test]
    fn one_insertion_step_per_record() {
        let pool = candidates(&[5, 2, 8, 10, 4]);
        let (_, trace) = build_from_sequence(&pool);
        let inserts = trace
            .steps()
            .iter()
            .filter(|s| s.description.starts_with("Insert candidate"))
            .count();
        assert_eq!(inserts, pool.len());
    }

    #[test]
    fn equal_experience_is_tie_broken_by_id() {
        let (tree, _) = build_from_sequence(&candidates(&[4, 4, 4, 4]));
        assert_eq!(tree.len(), 4);
        let ids: Vec<u32> = tree.in_order().iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(tree.is_balanced());
    }

    #[test]
    fn reinserting_same_record_updates_label() {
        let first = Candidate::new(1, "Old Name").with_experience(3);
        let second = Candidate::new(1, "New Name").with_experience(3);
        let (tree, trace) = build_from_sequence(&[first.clone(), second]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().unwrap().label, "New Name");
        assert!(tree.contains(&first));
        assert!(trace.has_step_containing("Update candidate 1"));
    }

    #[test]
    fn in_order_is_sorted_by_key() {
        let pool = candidates(&[9, 3, 7, 1, 5, 8, 2]);
        let (tree, _) = build_from_sequence(&pool);
        let keys: Vec<u32> = tree
            .in_order()
            .iter()
            .map(|id| pool[id.0 as usize - 1].experience_years)
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn insertion_snapshot_holds_whole_tree() {
        let pool = candidates(&[10, 20, 30, 40, 50]);
        let (_, trace) = build_from_sequence(&pool);
        let last_insert = trace
            .steps()
            .iter()
            .rev()
            .find(|s| s.description.starts_with("Insert"))
            .unwrap();
        match &last_insert.state_snapshot {
            Snapshot::Tree(view) => assert_eq!(view.size(), 5),
            other => panic!("expected tree snapshot, got {:?}", other),
        }
    }

    #[test]
    fn empty_sequence_builds_empty_tree() {
        let (tree, trace) = build_from_sequence(&[]);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert!(trace.is_empty());
    }
}
