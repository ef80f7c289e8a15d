//! Candidate-to-job fit score in [0, 100].
//!
//! Three weighted criteria:
//!
//! | criterion  | weight | full marks when                        |
//! |------------|--------|----------------------------------------|
//! | skills     | 60     | every required skill is listed         |
//! | experience | 25     | years ≥ the job's minimum              |
//! | salary     | 15     | no ceiling, or expectation ≤ ceiling   |
//!
//! Skill overlap is an LCS over the case-folded, de-duplicated, sorted skill
//! lists. On sorted sets the LCS length equals the intersection size, and the
//! DP rows give the trace something to show per required skill.

use serde::Serialize;

use skillmesh_core::{Candidate, JobRequirement, Snapshot, Step, Trace, TraceRecorder};

pub const ALGORITHM: &str = "DP Fit Score";

pub const SKILL_WEIGHT: f64 = 60.0;
pub const EXPERIENCE_WEIGHT: f64 = 25.0;
pub const SALARY_WEIGHT: f64 = 15.0;

fn normalize(skills: &[String]) -> Vec<String> {
    let mut folded: Vec<String> = skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    folded.sort();
    folded.dedup();
    folded
}

/// LCS length of `want` against `have`, one recorded step per `want` row.
fn skill_overlap(want: &[String], have: &[String], rec: &mut TraceRecorder) -> u32 {
    let mut prev = vec![0u32; have.len() + 1];
    let mut row = vec![0u32; have.len() + 1];

    for (i, skill) in want.iter().enumerate() {
        row[0] = 0;
        for (j, owned) in have.iter().enumerate() {
            row[j + 1] = if skill == owned {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        let best = row[have.len()];
        rec.record(|id| {
            Step::new(id, format!("LCS row {} ('{}'): {} skill(s) matched so far", i + 1, skill, best))
                .with_snapshot(Snapshot::Table(row.clone()))
                .highlight([i])
                .var("skill", skill)
                .var("matched", best)
        });
        std::mem::swap(&mut prev, &mut row);
    }
    prev[have.len()]
}

fn experience_component(years: u32, minimum: u32) -> f64 {
    if years >= minimum {
        EXPERIENCE_WEIGHT
    } else {
        EXPERIENCE_WEIGHT * years as f64 / minimum as f64
    }
}

fn salary_component(expected: u64, ceiling: u64) -> f64 {
    if ceiling == 0 || expected <= ceiling {
        SALARY_WEIGHT
    } else {
        SALARY_WEIGHT * ceiling as f64 / expected as f64
    }
}

/// Scores `candidate` against `requirement`.
pub fn score(candidate: &Candidate, requirement: &JobRequirement) -> (f64, Trace) {
    let mut rec = TraceRecorder::new(ALGORITHM);

    let want = normalize(&requirement.required_skills);
    let have = normalize(&candidate.skills);
    let matched = skill_overlap(&want, &have, &mut rec);

    let skills = if want.is_empty() {
        SKILL_WEIGHT
    } else {
        SKILL_WEIGHT * matched as f64 / want.len() as f64
    };
    rec.record(|id| {
        Step::new(
            id,
            format!("Skills: {}/{} required matched -> {:.1} of {}", matched, want.len(), skills, SKILL_WEIGHT),
        )
        .var("component", format!("{:.2}", skills))
    });

    let experience = experience_component(candidate.experience_years, requirement.min_experience);
    rec.record(|id| {
        Step::new(
            id,
            format!(
                "Experience: {} year(s) vs minimum {} -> {:.1} of {}",
                candidate.experience_years, requirement.min_experience, experience, EXPERIENCE_WEIGHT
            ),
        )
        .var("component", format!("{:.2}", experience))
    });

    let salary = salary_component(candidate.expected_salary, requirement.max_salary);
    rec.record(|id| {
        let ceiling = match requirement.max_salary {
            0 => "no ceiling".to_string(),
            max => format!("ceiling {}", max),
        };
        Step::new(
            id,
            format!(
                "Salary: expects {} vs {} -> {:.1} of {}",
                candidate.expected_salary, ceiling, salary, SALARY_WEIGHT
            ),
        )
        .var("component", format!("{:.2}", salary))
    });

    let total = (skills + experience + salary).clamp(0.0, 100.0);
    rec.record(|id| {
        Step::new(id, format!("Fit score for candidate {}: {:.1} / 100", candidate.id, total))
            .var("total", format!("{:.2}", total))
    });

    (total, rec.finish())
}

/// One candidate's score against a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate: Candidate,
    pub score: f64,
}

/// Scores every candidate and orders them by score desc, then id asc.
pub fn rank_matches(records: &[Candidate], requirement: &JobRequirement) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = records
        .iter()
        .map(|candidate| MatchResult {
            candidate: candidate.clone(),
            score: score(candidate, requirement).0,
        })
        .collect();
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });
    tracing::debug!(job = %requirement.title, candidates = results.len(), "matches ranked");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobRequirement {
        JobRequirement::new("Backend Developer", "Java, SQL, AWS", 3, 80_000)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn partial_skill_match_full_other_criteria() {
        let alice = Candidate::new(1, "Alice")
            .with_experience(5)
            .with_salary(70_000)
            .with_skills(["Java", "SQL", "Spring"]);
        let (total, trace) = score(&alice, &job());
        assert!(close(total, 40.0 + 25.0 + 15.0));
        // 3 DP rows, 3 criteria, 1 total
        assert_eq!(trace.len(), 7);
        assert_eq!(trace.algorithm_name(), ALGORITHM);
    }

    #[test]
    fn skills_match_case_insensitively_and_once() {
        let c = Candidate::new(2, "Bob").with_skills(["java", "JAVA", " sql ", "aws"]);
        let (total, _) = score(&c, &JobRequirement::new("Dev", "Java, SQL, AWS", 0, 0));
        assert!(close(total, 100.0));
    }

    #[test]
    fn shortfalls_scale_proportionally() {
        let c = Candidate::new(3, "Diana")
            .with_experience(1)
            .with_salary(100_000)
            .with_skills(["Go"]);
        let req = JobRequirement::new("Dev", "Java", 4, 80_000);
        let (total, trace) = score(&c, &req);
        assert!(close(total, 0.0 + 6.25 + 12.0));
        assert!(trace.has_step_containing("Experience: 1 year(s) vs minimum 4"));
    }

    #[test]
    fn no_required_skills_gives_full_skill_weight() {
        let c = Candidate::new(4, "Evan");
        let (total, trace) = score(&c, &JobRequirement::new("Anything", "", 0, 0));
        assert!(close(total, 100.0));
        assert_eq!(trace.len(), 4);
        assert!(trace.has_step_containing("no ceiling"));
    }

    #[test]
    fn dp_rows_are_table_snapshots() {
        let c = Candidate::new(5, "Fay").with_skills(["AWS", "Java"]);
        let (_, trace) = score(&c, &job());
        // want = [aws, java, sql], have = [aws, java]
        match &trace.steps()[2].state_snapshot {
            Snapshot::Table(row) => assert_eq!(row, &vec![0, 1, 2]),
            other => panic!("expected table snapshot, got {:?}", other),
        }
    }

    #[test]
    fn rank_orders_by_score_then_id() {
        let records = vec![
            Candidate::new(3, "C").with_experience(5).with_skills(["Java"]),
            Candidate::new(1, "A").with_experience(5).with_skills(["Java"]),
            Candidate::new(2, "B").with_experience(5).with_skills(["Java", "SQL", "AWS"]),
        ];
        let ranked = rank_matches(&records, &job());
        let ids: Vec<u32> = ranked.iter().map(|m| m.candidate.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
