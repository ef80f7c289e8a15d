//! Exact substring search with a failure function (Knuth-Morris-Pratt).
//!
//! [`search`] and [`find_all`] build the pattern's failure table in O(m) and
//! scan the text in O(n) without re-reading matched characters. Matching is
//! case-sensitive and runs over Unicode scalar values, so reported indices are
//! char offsets.
//!
//! # Found signal
//!
//! Trace consumers detect a hit by looking for [`FOUND_SIGNAL`] in any step
//! description. The verdict step is pinned into reserved trace capacity, so
//! the signal is present iff the pattern occurs, even in a truncated trace.
//! No other step description contains the signal.

use serde::Serialize;

use skillmesh_core::{Candidate, Snapshot, Step, Trace, TraceRecorder};

pub const ALGORITHM: &str = "KMP Search";

/// Substring trace consumers match on to detect a hit.
pub const FOUND_SIGNAL: &str = "Pattern found";

/// How many per-candidate traces [`search_candidates`] hands back.
pub const MAX_SEARCH_TRACES: usize = 3;

/// Searches `text` for `pattern` and returns the trace only.
pub fn search(text: &str, pattern: &str) -> Trace {
    find_all(text, pattern).1
}

/// Searches `text` for every occurrence of `pattern`.
///
/// Returns the char offsets of all match starts (overlapping matches
/// included) and the trace. An empty pattern is reported as not found.
pub fn find_all(text: &str, pattern: &str) -> (Vec<usize>, Trace) {
    let mut rec = TraceRecorder::with_reserved(ALGORITHM, 1);
    let text: Vec<char> = text.chars().collect();
    let pat: Vec<char> = pattern.chars().collect();

    if pat.is_empty() {
        rec.record_pinned(|id| Step::new(id, "Empty pattern: Pattern not found"));
        return (Vec::new(), rec.finish());
    }

    let failure = failure_table(&pat, &mut rec);
    let matches = scan(&text, &pat, &failure, &mut rec);

    match matches.first() {
        Some(&first) => {
            let count = matches.len();
            rec.record_pinned(|id| {
                Step::new(
                    id,
                    format!("{} at index {} ({} occurrence(s))", FOUND_SIGNAL, first, count),
                )
                .highlight([first])
                .var("occurrences", count)
            });
        }
        None => {
            rec.record_pinned(|id| {
                Step::new(id, "Pattern not found").var("textLength", text.len())
            });
        }
    }
    (matches, rec.finish())
}

/// Longest proper prefix that is also a suffix, per pattern position.
fn failure_table(pat: &[char], rec: &mut TraceRecorder) -> Vec<usize> {
    let mut failure = vec![0usize; pat.len()];
    let mut len = 0;
    let mut i = 1;

    while i < pat.len() {
        if pat[i] == pat[len] {
            len += 1;
            failure[i] = len;
            rec.record(|id| {
                Step::new(id, format!("Table: '{}' extends prefix, LPS[{}] = {}", pat[i], i, len))
                    .with_snapshot(scan_snapshot(&failure, i, len))
                    .highlight([i])
                    .var("phase", "table")
            });
            i += 1;
        } else if len != 0 {
            let fallback = failure[len - 1];
            rec.record(|id| {
                Step::new(
                    id,
                    format!("Table: '{}' breaks prefix of length {}, fall back to {}", pat[i], len, fallback),
                )
                .with_snapshot(scan_snapshot(&failure, i, len))
                .highlight([i])
                .var("phase", "table")
            });
            len = fallback;
        } else {
            rec.record(|id| {
                Step::new(id, format!("Table: no prefix ends at '{}', LPS[{}] = 0", pat[i], i))
                    .with_snapshot(scan_snapshot(&failure, i, 0))
                    .highlight([i])
                    .var("phase", "table")
            });
            i += 1;
        }
    }
    failure
}

fn scan(text: &[char], pat: &[char], failure: &[usize], rec: &mut TraceRecorder) -> Vec<usize> {
    let mut matches = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < text.len() {
        if text[i] == pat[j] {
            rec.record(|id| {
                Step::new(id, format!("Compare text[{}] = '{}' with pattern[{}]: match", i, text[i], j))
                    .with_snapshot(scan_snapshot(failure, i, j))
                    .highlight([i])
                    .var("i", i)
                    .var("j", j)
            });
            i += 1;
            j += 1;
            if j == pat.len() {
                let start = i - j;
                matches.push(start);
                rec.record(|id| {
                    Step::new(id, format!("Match at index {}", start))
                        .with_snapshot(scan_snapshot(failure, i, j))
                        .highlight(start..i)
                        .var("start", start)
                });
                j = failure[j - 1];
            }
        } else if j != 0 {
            let fallback = failure[j - 1];
            rec.record(|id| {
                Step::new(
                    id,
                    format!(
                        "Compare text[{}] = '{}' with pattern[{}] = '{}': mismatch, fall back to pattern[{}]",
                        i, text[i], j, pat[j], fallback
                    ),
                )
                .with_snapshot(scan_snapshot(failure, i, j))
                .highlight([i])
                .var("i", i)
                .var("j", j)
            });
            j = fallback;
        } else {
            rec.record(|id| {
                Step::new(
                    id,
                    format!("Compare text[{}] = '{}' with pattern[0]: mismatch, advance text", i, text[i]),
                )
                .with_snapshot(scan_snapshot(failure, i, 0))
                .highlight([i])
                .var("i", i)
                .var("j", 0)
            });
            i += 1;
        }
    }
    matches
}

fn scan_snapshot(failure: &[usize], text_index: usize, pattern_index: usize) -> Snapshot {
    Snapshot::Scan {
        failure: failure.to_vec(),
        text_index,
        pattern_index,
    }
}

/// Result of a keyword search over many candidates.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSearch {
    /// Candidates whose resume text contains the keyword, in input order.
    pub candidates: Vec<Candidate>,
    /// Up to [`MAX_SEARCH_TRACES`] traces, hits first.
    pub traces: Vec<Trace>,
}

/// Runs the matcher over every candidate's resume text.
///
/// Hit traces are kept first, in input order; miss traces fill the remaining
/// slots so a consumer always has something to replay.
pub fn search_candidates(records: &[Candidate], keyword: &str) -> KeywordSearch {
    let mut candidates = Vec::new();
    let mut hits = Vec::new();
    let mut misses = Vec::new();

    for record in records {
        let trace = search(&record.resume_text, keyword);
        if trace.has_step_containing(FOUND_SIGNAL) {
            candidates.push(record.clone());
            if hits.len() < MAX_SEARCH_TRACES {
                hits.push(trace);
            }
        } else if misses.len() < MAX_SEARCH_TRACES {
            misses.push(trace);
        }
    }

    tracing::debug!(keyword, hits = candidates.len(), "keyword search finished");
    let mut traces = hits;
    let room = MAX_SEARCH_TRACES - traces.len();
    traces.extend(misses.into_iter().take(room));
    KeywordSearch { candidates, traces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillmesh_core::{MAX_STEPS, TRUNCATION_NOTICE};

    #[test]
    fn finds_pattern_in_sentence() {
        let trace = search("DSA is important for Software Engineers.", "Software");
        assert!(trace.has_step_containing(FOUND_SIGNAL));
        assert_eq!(trace.algorithm_name(), ALGORITHM);
    }

    #[test]
    fn missing_pattern_has_no_found_step() {
        let trace = search("Hello World", "Python");
        assert!(!trace.has_step_containing(FOUND_SIGNAL));
        assert_eq!(trace.last_step().unwrap().description, "Pattern not found");
    }

    #[test]
    fn reports_all_overlapping_offsets() {
        let (matches, _) = find_all("aaaa", "aa");
        assert_eq!(matches, vec![0, 1, 2]);
    }

    #[test]
    fn offsets_are_char_based() {
        let (matches, _) = find_all("héllo wörld", "wörld");
        assert_eq!(matches, vec![6]);
    }

    #[test]
    fn search_is_case_sensitive() {
        let (matches, trace) = find_all("Rust and rust", "Rust");
        assert_eq!(matches, vec![0]);
        assert!(trace.has_step_containing("(1 occurrence(s))"));
    }

    #[test]
    fn failure_table_handles_repeated_prefix() {
        // LPS of "abab" is [0, 0, 1, 2].
        let (_, trace) = find_all("", "abab");
        let table_steps: Vec<_> = trace
            .steps()
            .iter()
            .filter(|s| s.variables.get("phase").map(String::as_str) == Some("table"))
            .collect();
        let last = table_steps.last().unwrap();
        match &last.state_snapshot {
            Snapshot::Scan { failure, .. } => assert_eq!(failure, &vec![0, 0, 1, 2]),
            other => panic!("expected scan snapshot, got {:?}", other),
        }
    }

    #[test]
    fn empty_pattern_is_not_found() {
        let (matches, trace) = find_all("anything", "");
        assert!(matches.is_empty());
        assert!(!trace.has_step_containing(FOUND_SIGNAL));
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn found_signal_survives_truncation() {
        let mut text = "x".repeat(2_000);
        text.push_str("needle");
        let (matches, trace) = find_all(&text, "needle");
        assert_eq!(matches, vec![2_000]);
        assert!(trace.is_truncated());
        assert_eq!(trace.len(), MAX_STEPS + 1);
        assert!(trace.has_step_containing(FOUND_SIGNAL));
        assert_eq!(trace.last_step().unwrap().description, TRUNCATION_NOTICE);
    }

    #[test]
    fn long_miss_stays_silent_when_truncated() {
        let text = "y".repeat(2_000);
        let trace = search(&text, "needle");
        assert!(trace.is_truncated());
        assert!(!trace.has_step_containing(FOUND_SIGNAL));
        assert!(trace.has_step_containing("Pattern not found"));
    }

    #[test]
    fn search_candidates_keeps_hits_in_order() {
        let pool = vec![
            Candidate::new(1, "Alice").with_resume("Experienced Java and SQL developer."),
            Candidate::new(2, "Bob").with_resume("Junior React developer. Learning Python."),
            Candidate::new(3, "Evan").with_resume("Machine Learning, Python, C++."),
        ];
        let result = search_candidates(&pool, "Python");
        let ids: Vec<u32> = result.candidates.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(result.traces.len(), 3);
        assert!(result.traces[0].has_step_containing(FOUND_SIGNAL));
        assert!(result.traces[1].has_step_containing(FOUND_SIGNAL));
        assert!(!result.traces[2].has_step_containing(FOUND_SIGNAL));
    }

    #[test]
    fn search_candidates_on_empty_pool() {
        let result = search_candidates(&[], "Rust");
        assert!(result.candidates.is_empty());
        assert!(result.traces.is_empty());
    }
}
