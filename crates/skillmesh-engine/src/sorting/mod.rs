//! Sorting engine: ordering candidates by a pluggable comparison rule.
//!
//! [`sort`] takes the records, an optional [`Comparator`] and a
//! [`SortStrategy`], and returns the records **best first** (descending by
//! the comparator) together with the trace of the chosen strategy.
//!
//! # Strategies
//!
//! - [`SortStrategy::Heap`]: bottom-up max-heap, root extraction, one final
//!   untraced reversal. Not stable.
//! - [`SortStrategy::Merge`]: top-down merge sort, stable in best-first order
//!   (on a tie the left run wins).
//! - [`SortStrategy::Quick`]: Lomuto partition with the middle element of
//!   each range as pivot. Not stable.
//!
//! Every strategy snapshots the full id sequence at each step.

mod heap;
mod merge;
mod quick;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use skillmesh_core::{Candidate, CoreError, Snapshot, Trace};

/// A strict total order over candidates. "Greater" means "better".
///
/// The lifetime lets closures borrow caller data such as lookup tables.
pub type Comparator<'a> = dyn Fn(&Candidate, &Candidate) -> Ordering + 'a;

/// Ascending by years of experience. The default comparator.
pub fn by_experience(a: &Candidate, b: &Candidate) -> Ordering {
    a.experience_years.cmp(&b.experience_years)
}

/// Ascending by expected salary.
pub fn by_expected_salary(a: &Candidate, b: &Candidate) -> Ordering {
    a.expected_salary.cmp(&b.expected_salary)
}

/// Ascending by full name, byte-wise.
pub fn by_name(a: &Candidate, b: &Candidate) -> Ordering {
    a.full_name.cmp(&b.full_name)
}

/// Which sorting algorithm to run.
///
/// Deserializes through [`FromStr`], so `MergeSort` and `merge` both work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortStrategy {
    #[default]
    Heap,
    Merge,
    Quick,
}

impl SortStrategy {
    /// The `algorithmName` written into traces.
    pub fn algorithm_name(self) -> &'static str {
        match self {
            SortStrategy::Heap => "Max Heap Sort",
            SortStrategy::Merge => "Merge Sort",
            SortStrategy::Quick => "Quick Sort",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortStrategy::Heap => "heap",
            SortStrategy::Merge => "merge",
            SortStrategy::Quick => "quick",
        };
        f.write_str(name)
    }
}

impl FromStr for SortStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heap" | "heapsort" => Ok(SortStrategy::Heap),
            "merge" | "mergesort" => Ok(SortStrategy::Merge),
            "quick" | "quicksort" => Ok(SortStrategy::Quick),
            _ => Err(CoreError::UnknownStrategy { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for SortStrategy {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Named comparators selectable by callers that cannot pass a closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SortKey {
    #[default]
    Experience,
    Salary,
    Name,
}

impl SortKey {
    pub fn comparator(self) -> fn(&Candidate, &Candidate) -> Ordering {
        match self {
            SortKey::Experience => by_experience,
            SortKey::Salary => by_expected_salary,
            SortKey::Name => by_name,
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "experience" | "experienceyears" => Ok(SortKey::Experience),
            "salary" | "expectedsalary" | "cost" => Ok(SortKey::Salary),
            "name" | "fullname" => Ok(SortKey::Name),
            _ => Err(CoreError::UnknownSortKey { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Sorts `records` best first.
///
/// `comparator` defaults to [`by_experience`]. The input slice is never
/// modified; the returned vector is a permutation of it.
pub fn sort(
    records: &[Candidate],
    comparator: Option<&Comparator<'_>>,
    strategy: SortStrategy,
) -> (Vec<Candidate>, Trace) {
    let default: &Comparator<'_> = &by_experience;
    let compare = comparator.unwrap_or(default);
    tracing::debug!(strategy = %strategy, records = records.len(), "sorting candidates");

    match strategy {
        SortStrategy::Heap => heap::heap_sort(records, compare),
        SortStrategy::Merge => merge::merge_sort(records, compare),
        SortStrategy::Quick => quick::quick_sort(records, compare),
    }
}

/// Id sequence snapshot of a working array.
fn sequence(items: &[Candidate]) -> Snapshot {
    Snapshot::Sequence(items.iter().map(|c| c.id).collect())
}
