//! Quick sort with Lomuto partitioning.
//!
//! Pivot rule: the middle element of the range, swapped to the range end
//! before partitioning. Elements strictly better than the pivot move left.
//! The smaller side recurses and the larger side loops, so stack depth stays
//! logarithmic.

use skillmesh_core::{Candidate, Step, Trace, TraceRecorder};

use super::{sequence, Comparator, SortStrategy};

pub(super) fn quick_sort(records: &[Candidate], compare: &Comparator<'_>) -> (Vec<Candidate>, Trace) {
    let mut rec = TraceRecorder::new(SortStrategy::Quick.algorithm_name());
    let mut items = records.to_vec();
    let len = items.len();
    sort_range(&mut items, 0, len, compare, &mut rec);
    (items, rec.finish())
}

/// Sorts `items[lo..hi]`.
fn sort_range(
    items: &mut [Candidate],
    mut lo: usize,
    mut hi: usize,
    compare: &Comparator<'_>,
    rec: &mut TraceRecorder,
) {
    while hi - lo > 1 {
        let p = partition(items, lo, hi, compare, rec);
        if p - lo < hi - (p + 1) {
            sort_range(items, lo, p, compare, rec);
            lo = p + 1;
        } else {
            sort_range(items, p + 1, hi, compare, rec);
            hi = p;
        }
    }
}

/// Partitions `items[lo..hi]` around its middle element and returns the
/// pivot's final index.
fn partition(
    items: &mut [Candidate],
    lo: usize,
    hi: usize,
    compare: &Comparator<'_>,
    rec: &mut TraceRecorder,
) -> usize {
    let mid = lo + (hi - lo) / 2;
    let last = hi - 1;

    if mid != last {
        rec.record(|id| {
            Step::new(id, format!("Pivot: move index {} to end of range [{}, {})", mid, lo, hi))
                .with_snapshot(sequence(items))
                .highlight([mid, last])
                .var("pivot", items[mid].id)
        });
        items.swap(mid, last);
    }

    let mut store = lo;
    for j in lo..last {
        let ahead = compare(&items[j], &items[last]).is_gt();
        rec.record(|id| {
            let verdict = if ahead { "goes before pivot" } else { "stays after pivot" };
            Step::new(id, format!("Compare index {} with pivot: {}", j, verdict))
                .with_snapshot(sequence(items))
                .highlight([j, last])
                .var("j", j)
                .var("store", store)
        });

        if ahead {
            if j != store {
                rec.record(|id| {
                    Step::new(id, format!("Swap index {} with {}", store, j))
                        .with_snapshot(sequence(items))
                        .highlight([store, j])
                });
                items.swap(store, j);
            }
            store += 1;
        }
    }

    rec.record(|id| {
        Step::new(id, format!("Place pivot at index {}", store))
            .with_snapshot(sequence(items))
            .highlight([store, last])
            .var("lo", lo)
            .var("hi", hi)
    });
    items.swap(store, last);
    store
}
