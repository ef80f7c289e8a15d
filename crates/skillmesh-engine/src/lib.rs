//! Instrumented algorithms over candidate records.
//!
//! Every entry point takes its input by reference, works on its own copy,
//! and returns its result together with a capped [`skillmesh_core::Trace`].
//! Nothing here holds global state or locks; callers that want to reuse a
//! built index or graph cache it themselves.

pub mod avl;
pub mod fit_score;
pub mod graph;
pub mod greedy;
pub mod hash_index;
pub mod pattern;
pub mod sorting;
pub mod synthetic;
pub mod trie;

// Re-export commonly used types
pub use avl::{build_from_sequence, AvlTree};
pub use fit_score::{rank_matches, MatchResult};
pub use graph::{build_co_occurrence, SkillGraph};
pub use hash_index::{HashIndex, IndexEntry};
pub use pattern::{find_all, search, search_candidates, KeywordSearch, FOUND_SIGNAL};
pub use sorting::{sort, Comparator, SortKey, SortStrategy};
pub use trie::PrefixIndex;
