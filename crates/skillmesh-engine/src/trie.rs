//! Prefix index over a skill vocabulary.
//!
//! A character trie keyed by the lowercase form of each word. Terminal nodes
//! keep every original spelling that folded to them, so `"py"` completes to
//! `"Python"`. Children live in a `BTreeMap`, which makes the depth-first
//! collection order lexicographic by folded key without a separate sort.
//!
//! The index holds no global state: callers build it from whatever
//! vocabulary they have and may cache the result themselves.

use std::collections::{BTreeMap, BTreeSet};

use skillmesh_core::{Snapshot, Step, Trace, TraceRecorder};

pub const BUILD_ALGORITHM: &str = "Trie Construction";
pub const COMPLETE_ALGORITHM: &str = "Trie Autocomplete";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Original spellings of the words ending here.
    words: BTreeSet<String>,
}

/// A built trie. Rebuilding from the same vocabulary yields an equal index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixIndex {
    root: TrieNode,
    word_count: usize,
    node_count: usize,
}

fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

fn trie_snapshot(path: &str, completions: &[String]) -> Snapshot {
    Snapshot::Trie {
        path: path.to_string(),
        depth: path.chars().count(),
        completions: completions.to_vec(),
    }
}

impl PrefixIndex {
    /// Inserts every non-blank vocabulary entry character by character.
    pub fn build<S: AsRef<str>>(vocabulary: &[S]) -> (Self, Trace) {
        let mut rec = TraceRecorder::new(BUILD_ALGORITHM);
        let mut index = PrefixIndex::default();

        for word in vocabulary {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            index.insert(word, &mut rec);
        }

        tracing::debug!(words = index.word_count, nodes = index.node_count, "prefix index built");
        (index, rec.finish())
    }

    fn insert(&mut self, word: &str, rec: &mut TraceRecorder) {
        let key = fold(word);
        let mut node = &mut self.root;
        let mut path = String::new();

        for c in key.chars() {
            path.push(c);
            let created = !node.children.contains_key(&c);
            node = node.children.entry(c).or_default();
            if created {
                self.node_count += 1;
                rec.record(|id| {
                    Step::new(id, format!("Create node '{}' for \"{}\"", c, word))
                        .with_snapshot(trie_snapshot(&path, &[]))
                        .var("char", c)
                });
            }
        }

        if node.words.insert(word.to_string()) {
            self.word_count += 1;
            rec.record(|id| {
                Step::new(id, format!("Mark \"{}\" complete at depth {}", word, path.chars().count()))
                    .with_snapshot(trie_snapshot(&path, &[word.to_string()]))
                    .var("word", word)
            });
        } else {
            rec.record(|id| {
                Step::new(id, format!("\"{}\" already indexed", word))
                    .with_snapshot(trie_snapshot(&path, &[]))
                    .var("word", word)
            });
        }
    }

    /// Returns every indexed word starting with `prefix` (case-insensitive).
    ///
    /// An empty prefix returns the whole vocabulary. A prefix with no path
    /// returns nothing, and the trace ends at the deepest node reached.
    pub fn complete(&self, prefix: &str) -> (Vec<String>, Trace) {
        let mut rec = TraceRecorder::new(COMPLETE_ALGORITHM);
        let key = fold(prefix);
        let mut node = &self.root;
        let mut path = String::new();

        for (depth, c) in key.chars().enumerate() {
            match node.children.get(&c) {
                Some(child) => {
                    path.push(c);
                    node = child;
                    rec.record(|id| {
                        Step::new(id, format!("Walk '{}' (depth {})", c, depth + 1))
                            .with_snapshot(trie_snapshot(&path, &[]))
                            .highlight([depth])
                            .var("char", c)
                    });
                }
                None => {
                    rec.record(|id| {
                        Step::new(
                            id,
                            format!(
                                "No child '{}' below \"{}\": stop at depth {}, no completions",
                                c, path, depth
                            ),
                        )
                        .with_snapshot(trie_snapshot(&path, &[]))
                        .highlight([depth])
                        .var("char", c)
                    });
                    return (Vec::new(), rec.finish());
                }
            }
        }

        let mut found = Vec::new();
        collect(node, &mut path, &mut found, &mut rec);
        (found, rec.finish())
    }

    /// Number of distinct spellings indexed.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Number of trie nodes below the root.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Whether `word` was indexed with exactly this spelling.
    pub fn contains(&self, word: &str) -> bool {
        let mut node = &self.root;
        for c in fold(word).chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.words.contains(word)
    }
}

/// Pre-order collection: a node's own words, then its children in key order.
fn collect(node: &TrieNode, path: &mut String, found: &mut Vec<String>, rec: &mut TraceRecorder) {
    for word in &node.words {
        found.push(word.clone());
        rec.record(|id| {
            Step::new(id, format!("Collect \"{}\"", word))
                .with_snapshot(trie_snapshot(path, found))
                .var("count", found.len())
        });
    }
    for (&c, child) in &node.children {
        path.push(c);
        collect(child, path, found, rec);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<&'static str> {
        vec!["Python", "PostgreSQL", "Java", "JavaScript", "SQL", "Rust", "React"]
    }

    #[test]
    fn completes_case_insensitively() {
        let (index, _) = PrefixIndex::build(&vocabulary());
        let (found, trace) = index.complete("py");
        assert_eq!(found, vec!["Python"]);
        assert_eq!(trace.algorithm_name(), COMPLETE_ALGORITHM);
    }

    #[test]
    fn completions_are_lexicographic() {
        let (index, _) = PrefixIndex::build(&vocabulary());
        let (found, _) = index.complete("J");
        assert_eq!(found, vec!["Java", "JavaScript"]);
        let (found, _) = index.complete("r");
        assert_eq!(found, vec!["React", "Rust"]);
    }

    #[test]
    fn empty_prefix_returns_full_vocabulary() {
        let (index, _) = PrefixIndex::build(&vocabulary());
        let (found, _) = index.complete("");
        assert_eq!(found.len(), vocabulary().len());
        assert_eq!(found.first().map(String::as_str), Some("Java"));
    }

    #[test]
    fn missing_path_stops_at_deepest_node() {
        let (index, _) = PrefixIndex::build(&vocabulary());
        let (found, trace) = index.complete("Jaz");
        assert!(found.is_empty());
        let last = trace.last_step().unwrap();
        assert!(last.description.contains("No child 'z'"));
        match &last.state_snapshot {
            Snapshot::Trie { path, depth, .. } => {
                assert_eq!(path, "ja");
                assert_eq!(*depth, 2);
            }
            other => panic!("expected trie snapshot, got {:?}", other),
        }
    }

    #[test]
    fn one_step_per_walked_char_and_completion() {
        let (index, _) = PrefixIndex::build(&vocabulary());
        let (found, trace) = index.complete("ja");
        assert_eq!(found.len(), 2);
        assert_eq!(trace.len(), 2 + 2);
    }

    #[test]
    fn case_variants_share_a_terminal() {
        let (index, _) = PrefixIndex::build(&["Go", "go", "Golang"]);
        assert_eq!(index.len(), 3);
        let (found, _) = index.complete("GO");
        assert_eq!(found, vec!["Go", "go", "Golang"]);
        assert!(index.contains("go"));
        assert!(!index.contains("GO"));
    }

    #[test]
    fn duplicates_and_blanks_are_not_reindexed() {
        let (index, trace) = PrefixIndex::build(&["SQL", "SQL", "  ", ""]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.node_count(), 3);
        assert!(trace.has_step_containing("already indexed"));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let (a, ta) = PrefixIndex::build(&vocabulary());
        let (b, tb) = PrefixIndex::build(&vocabulary());
        assert_eq!(a, b);
        assert_eq!(ta, tb);
    }

    #[test]
    fn empty_vocabulary() {
        let (index, trace) = PrefixIndex::build::<&str>(&[]);
        assert!(index.is_empty());
        assert!(trace.is_empty());
        let (found, trace) = index.complete("");
        assert!(found.is_empty());
        assert!(trace.is_empty());
    }
}
