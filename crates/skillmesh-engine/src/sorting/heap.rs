//! Max-heap sort over an implicit array heap.

use skillmesh_core::{Candidate, Step, Trace, TraceRecorder};

use super::{sequence, Comparator, SortStrategy};

pub(super) fn heap_sort(records: &[Candidate], compare: &Comparator<'_>) -> (Vec<Candidate>, Trace) {
    let mut rec = TraceRecorder::new(SortStrategy::Heap.algorithm_name());
    let mut heap = records.to_vec();
    let n = heap.len();

    // Build phase: sift down every internal node, last parent first.
    for i in (0..n / 2).rev() {
        sift_down(&mut heap, n, i, compare, &mut rec);
    }

    // Extraction phase: move the max behind the shrinking boundary.
    for end in (1..n).rev() {
        rec.record(|id| {
            Step::new(id, format!("Swap root (Max) with element at index {}", end))
                .with_snapshot(sequence(&heap))
                .highlight([0, end])
                .var("boundary", end)
        });
        heap.swap(0, end);
        sift_down(&mut heap, end, 0, compare, &mut rec);
    }

    // Ascending after extraction; present best first.
    heap.reverse();
    (heap, rec.finish())
}

/// Restores the heap property for the subtree rooted at `i` within `heap[..n]`.
fn sift_down(
    heap: &mut [Candidate],
    n: usize,
    mut i: usize,
    compare: &Comparator<'_>,
    rec: &mut TraceRecorder,
) {
    loop {
        let left = 2 * i + 1;
        let right = 2 * i + 2;
        let mut largest = i;

        if left < n && compare(&heap[left], &heap[largest]).is_gt() {
            largest = left;
        }
        if right < n && compare(&heap[right], &heap[largest]).is_gt() {
            largest = right;
        }
        if largest == i {
            return;
        }

        rec.record(|id| {
            Step::new(
                id,
                format!("Heapify: Swap index {} with {} (Child larger than Parent)", i, largest),
            )
            .with_snapshot(sequence(heap))
            .highlight([i, largest])
            .var("i", i)
            .var("largest", largest)
            .var("heapSize", n)
        });
        heap.swap(i, largest);
        i = largest;
    }
}
