//! Budgeted shortlist by value-per-cost.
//!
//! Value is years of experience, cost is expected salary. Candidates are
//! visited once in priority order and taken whenever their cost still fits
//! the remaining budget. This is a heuristic and is not optimal in general.

use std::cmp::Ordering;

use skillmesh_core::{Candidate, CandidateId, Snapshot, Step, Trace, TraceRecorder};

pub const ALGORITHM: &str = "Greedy Shortlist";

/// Priority order: zero-cost first (by value desc), then value/cost desc,
/// then cost asc, then id asc. `Less` means "visit earlier".
pub fn priority(a: &Candidate, b: &Candidate) -> Ordering {
    let (va, ca) = (a.experience_years as u128, a.expected_salary as u128);
    let (vb, cb) = (b.experience_years as u128, b.expected_salary as u128);

    let by_ratio = match (ca == 0, cb == 0) {
        (true, true) => vb.cmp(&va),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // va/ca > vb/cb  <=>  va*cb > vb*ca
        (false, false) => (vb * ca).cmp(&(va * cb)),
    };
    by_ratio
        .then_with(|| ca.cmp(&cb))
        .then_with(|| a.id.cmp(&b.id))
}

/// Selects candidates whose total expected salary stays within `budget`.
pub fn select(records: &[Candidate], budget: i64) -> (Vec<Candidate>, Trace) {
    let mut rec = TraceRecorder::new(ALGORITHM);
    if records.is_empty() {
        return (Vec::new(), rec.finish());
    }
    if budget <= 0 {
        rec.record(|id| {
            Step::new(id, format!("Budget {} leaves nothing to spend: no candidates selected", budget))
                .with_snapshot(Snapshot::Budget {
                    remaining: 0,
                    selected: Vec::new(),
                })
                .var("budget", budget)
        });
        return (Vec::new(), rec.finish());
    }

    let mut order: Vec<&Candidate> = records.iter().collect();
    order.sort_by(|a, b| priority(a, b));

    let mut remaining = budget as u64;
    let mut selected: Vec<Candidate> = Vec::new();
    let mut selected_ids: Vec<CandidateId> = Vec::new();

    for (rank, candidate) in order.into_iter().enumerate() {
        let cost = candidate.expected_salary;
        let take = cost <= remaining;
        let before = remaining;
        if take {
            remaining -= cost;
            selected.push(candidate.clone());
            selected_ids.push(candidate.id);
        }
        rec.record(|id| {
            let description = if take {
                format!(
                    "Include candidate {} ({}): cost {} fits remaining {}",
                    candidate.id, candidate.full_name, cost, before
                )
            } else {
                format!(
                    "Skip candidate {} ({}): cost {} exceeds remaining {}",
                    candidate.id, candidate.full_name, cost, before
                )
            };
            Step::new(id, description)
                .with_snapshot(Snapshot::Budget {
                    remaining,
                    selected: selected_ids.clone(),
                })
                .highlight([rank])
                .var("value", candidate.experience_years)
                .var("cost", cost)
                .var("remaining", remaining)
        });
    }

    tracing::debug!(budget, selected = selected.len(), remaining, "shortlist selected");
    (selected, rec.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<Candidate> {
        vec![
            Candidate::new(1, "Alice").with_experience(5).with_salary(50_000),
            Candidate::new(2, "Bob").with_experience(2).with_salary(10_000),
            Candidate::new(3, "Charlie").with_experience(10).with_salary(200_000),
            Candidate::new(4, "Diana").with_experience(1).with_salary(40_000),
        ]
    }

    fn ids(records: &[Candidate]) -> Vec<u32> {
        records.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn takes_best_ratio_first_within_budget() {
        // Ratios: Bob 2e-4, Alice 1e-4, Charlie 5e-5, Diana 2.5e-5.
        let (selected, trace) = select(&pool(), 100_000);
        assert_eq!(ids(&selected), vec![2, 1, 4]);
        assert_eq!(trace.len(), 4);
        assert!(trace.has_step_containing("Skip candidate 3 (Charlie)"));
        let total: u64 = selected.iter().map(|c| c.expected_salary).sum();
        assert!(total <= 100_000);
    }

    #[test]
    fn never_revisits_a_skipped_candidate() {
        let (selected, _) = select(&pool(), 60_000);
        assert_eq!(ids(&selected), vec![2, 1]);
    }

    #[test]
    fn zero_cost_candidates_come_first() {
        let records = vec![
            Candidate::new(1, "Paid").with_experience(9).with_salary(1),
            Candidate::new(2, "Volunteer").with_experience(1).with_salary(0),
            Candidate::new(3, "Intern").with_experience(3).with_salary(0),
        ];
        let mut order = records.clone();
        order.sort_by(priority);
        assert_eq!(ids(&order), vec![3, 2, 1]);
    }

    #[test]
    fn ratio_ties_prefer_cheaper_then_lower_id() {
        let records = vec![
            Candidate::new(5, "A").with_experience(4).with_salary(40),
            Candidate::new(3, "B").with_experience(2).with_salary(20),
            Candidate::new(1, "C").with_experience(4).with_salary(40),
        ];
        let mut order = records.clone();
        order.sort_by(priority);
        assert_eq!(ids(&order), vec![3, 1, 5]);
    }

    #[test]
    fn non_positive_budget_selects_nothing() {
        for budget in [0, -5] {
            let (selected, trace) = select(&pool(), budget);
            assert!(selected.is_empty());
            assert_eq!(trace.len(), 1);
        }
    }

    #[test]
    fn empty_records_yield_empty_trace() {
        let (selected, trace) = select(&[], 1_000);
        assert!(selected.is_empty());
        assert!(trace.is_empty());
    }

    #[test]
    fn budget_snapshot_tracks_selection() {
        let (_, trace) = select(&pool(), 100_000);
        match &trace.steps()[1].state_snapshot {
            Snapshot::Budget { remaining, selected } => {
                assert_eq!(*remaining, 40_000);
                assert_eq!(selected, &vec![CandidateId(2), CandidateId(1)]);
            }
            other => panic!("expected budget snapshot, got {:?}", other),
        }
    }
}
