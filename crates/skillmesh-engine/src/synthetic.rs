//! Seeded synthetic candidate generator.
//!
//! Produces reproducible record sets for load and property testing: the same
//! `(count, seed, vocabulary)` always yields the same candidates. Every
//! generated record passes [`Candidate::validate`].

use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skillmesh_core::record::{MAX_EXPECTED_SALARY, MAX_EXPERIENCE_YEARS};
use skillmesh_core::Candidate;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Brian", "Chen", "Dara", "Elif", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Kemi",
    "Luca", "Maya", "Nils", "Omar", "Priya",
];

const LAST_NAMES: &[&str] = &[
    "Okafor", "Lindqvist", "Tanaka", "Moreau", "Silva", "Novak", "Haddad", "Kowalski", "Reyes",
    "Fischer",
];

const EDUCATION: &[&str] = &["BSc Computer Science", "MSc Software Engineering", "BEng Electronics", "Bootcamp"];

/// Most skills a generated candidate lists.
const MAX_SKILLS: usize = 5;

/// Generates `count` candidates with ids `1..=count`, drawing skills from
/// `vocabulary` (no skills when it is empty).
pub fn generate<S: AsRef<str>>(count: usize, seed: u64, vocabulary: &[S]) -> Vec<Candidate> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let vocabulary: Vec<&str> = vocabulary.iter().map(AsRef::as_ref).collect();

    let records: Vec<Candidate> = (1..=count)
        .map(|i| generate_one(i as u32, &vocabulary, &mut rng))
        .collect();
    tracing::debug!(count, seed, "synthetic candidates generated");
    records
}

fn generate_one(id: u32, vocabulary: &[&str], rng: &mut ChaCha8Rng) -> Candidate {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let years = rng.gen_range(0..=MAX_EXPERIENCE_YEARS.min(30));
    // Salary loosely tracks experience, in steps of 1000.
    let salary = (30_000 + years as u64 * 4_000 + rng.gen_range(0..=40u64) * 1_000).min(MAX_EXPECTED_SALARY);

    let take = rng.gen_range(0..=MAX_SKILLS.min(vocabulary.len()));
    let skills: Vec<String> = vocabulary
        .choose_multiple(rng, take)
        .map(|s| s.to_string())
        .collect();

    let resume = if skills.is_empty() {
        format!("{} year(s) of general experience.", years)
    } else {
        format!("{} year(s) working with {}.", years, skills.join(", "))
    };

    Candidate::new(id, format!("{} {}", first, last))
        .with_experience(years)
        .with_salary(salary)
        .with_education(EDUCATION[rng.gen_range(0..EDUCATION.len())])
        .with_resume(resume)
        .with_skills(skills)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCAB: &[&str] = &["Java", "SQL", "Python", "Rust", "React", "Go", "AWS"];

    #[test]
    fn same_seed_same_records() {
        assert_eq!(generate(20, 42, VOCAB), generate(20, 42, VOCAB));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(generate(20, 1, VOCAB), generate(20, 2, VOCAB));
    }

    #[test]
    fn ids_are_sequential_and_records_valid() {
        let records = generate(50, 7, VOCAB);
        assert_eq!(records.len(), 50);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id.0, i as u32 + 1);
            assert!(record.validate().is_ok(), "{:?}", record);
            assert!(record.skills.len() <= MAX_SKILLS);
            assert!(record.skills.iter().all(|s| VOCAB.contains(&s.as_str())));
        }
    }

    #[test]
    fn empty_vocabulary_means_no_skills() {
        let records = generate::<&str>(5, 3, &[]);
        assert!(records.iter().all(|r| r.skills.is_empty()));
    }

    #[test]
    fn zero_count() {
        assert!(generate(0, 9, VOCAB).is_empty());
    }
}
