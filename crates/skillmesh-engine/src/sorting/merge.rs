//! Top-down merge sort, stable in best-first order.
//!
//! Works on a permutation of input positions rather than on the records, so
//! a merge only copies `usize`s. Mid-merge snapshots show a consistent
//! permutation: the merged prefix, then what remains of both runs.

use std::cmp::Ordering;

use skillmesh_core::{Candidate, CandidateId, Snapshot, Step, Trace, TraceRecorder};

use super::{Comparator, SortStrategy};

pub(super) fn merge_sort(records: &[Candidate], compare: &Comparator<'_>) -> (Vec<Candidate>, Trace) {
    let mut rec = TraceRecorder::new(SortStrategy::Merge.algorithm_name());
    let mut order: Vec<usize> = (0..records.len()).collect();
    let len = order.len();

    let mut ctx = MergeCtx {
        records,
        compare,
        rec: &mut rec,
    };
    ctx.sort_range(&mut order, 0, len);

    let sorted = order.into_iter().map(|i| records[i].clone()).collect();
    (sorted, rec.finish())
}

struct MergeCtx<'a, 'r> {
    records: &'a [Candidate],
    compare: &'a Comparator<'a>,
    rec: &'r mut TraceRecorder,
}

impl MergeCtx<'_, '_> {
    fn sort_range(&mut self, order: &mut [usize], lo: usize, hi: usize) {
        if hi - lo < 2 {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        self.sort_range(order, lo, mid);
        self.sort_range(order, mid, hi);
        self.merge(order, lo, mid, hi);
    }

    fn merge(&mut self, order: &mut [usize], lo: usize, mid: usize, hi: usize) {
        let records = self.records;
        let left = order[lo..mid].to_vec();
        let right = order[mid..hi].to_vec();
        let (mut i, mut j, mut k) = (0, 0, lo);

        while i < left.len() && j < right.len() {
            let a = &records[left[i]];
            let b = &records[right[j]];
            // Descending; equal keys keep the left run first.
            let take_left = (self.compare)(a, b) != Ordering::Less;
            self.rec.record(|id| {
                let view = merge_view(records, order, k, &left[i..], &right[j..], hi);
                Step::new(
                    id,
                    format!(
                        "Compare {} (left) with {} (right): take {}",
                        a.id,
                        b.id,
                        if take_left { "left" } else { "right" }
                    ),
                )
                .with_snapshot(Snapshot::Sequence(view))
                .highlight([k, k + left.len() - i])
                .var("lo", lo)
                .var("mid", mid)
                .var("hi", hi)
            });

            if take_left {
                order[k] = left[i];
                i += 1;
            } else {
                order[k] = right[j];
                j += 1;
            }
            k += 1;
        }
        for &pos in left[i..].iter().chain(&right[j..]) {
            order[k] = pos;
            k += 1;
        }

        self.rec.record(|id| {
            Step::new(id, format!("Merged range [{}, {})", lo, hi))
                .with_snapshot(Snapshot::Sequence(order.iter().map(|&p| records[p].id).collect()))
                .highlight([lo, hi - 1])
                .var("lo", lo)
                .var("hi", hi)
        });
    }
}

/// Id view mid-merge: merged prefix, remaining runs, untouched suffix.
fn merge_view(
    records: &[Candidate],
    order: &[usize],
    written: usize,
    left_rest: &[usize],
    right_rest: &[usize],
    hi: usize,
) -> Vec<CandidateId> {
    order[..written]
        .iter()
        .chain(left_rest)
        .chain(right_rest)
        .chain(&order[hi..])
        .map(|&p| records[p].id)
        .collect()
}
