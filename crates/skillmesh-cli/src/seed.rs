//! Built-in demo dataset: skill vocabulary, job postings and candidates.

use skillmesh_core::{Candidate, JobRequirement};

/// Skill labels known to the autocomplete index before any record is loaded.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Java", "Python", "C#", "SQL", "React", "Data Structures", "C++", "HTML", "CSS",
    "TypeScript", "Next.js", "Figma", "Machine Learning", "JavaScript", "Docker", "Kubernetes",
    "AWS", "Azure", "CI/CD", "Linux", "Networking", "Security", "Excel", "Tableau", "Jira",
    "Agile", "Selenium", "Testing", "NoSQL", "PostgreSQL", "Rust", "Go", "Golang", "Swift",
    "Kotlin", "ASP.NET", "ASP.NET Core", ".NET", ".NET Core", "RESTful", "REST", "API",
    "Authentication", "Authorization",
];

pub fn demo_jobs() -> Vec<JobRequirement> {
    vec![
        JobRequirement::new("Senior Backend Engineer", "C#, SQL, Data Structures", 5, 130_000),
        JobRequirement::new("Frontend Developer", "React, JavaScript", 1, 70_000),
        JobRequirement::new("Data Scientist", "Python, SQL, Machine Learning", 3, 110_000),
        JobRequirement::new("Cloud Engineer", "AWS, Docker, Kubernetes, SQL", 4, 125_000),
        JobRequirement::new("DevOps Engineer", "Docker, Kubernetes, Python, CI/CD", 3, 120_000),
        JobRequirement::new("Offensive Security", "Python, C++, Networking, Security", 4, 140_000),
        JobRequirement::new("Data Analyst", "Python, SQL, Excel, Tableau", 2, 85_000),
        JobRequirement::new("Project Manager", "Jira, Agile, Communication", 5, 115_000),
        JobRequirement::new("SQA", "Java, Python, SQL, Selenium, Testing", 2, 80_000),
        JobRequirement::new("Database Engineer", "SQL, PostgreSQL, NoSQL, Python", 5, 125_000),
    ]
}

pub fn demo_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(1, "Alice Smith")
            .with_experience(5)
            .with_education("BS CS")
            .with_salary(90_000)
            .with_resume("Experienced Java and SQL developer. Good with Algorithms.")
            .with_skills(["Java", "SQL"]),
        Candidate::new(2, "Bob Jones")
            .with_experience(2)
            .with_education("Bootcamp")
            .with_salary(60_000)
            .with_resume("Junior React developer. Learning Python.")
            .with_skills(["React", "Python"]),
        Candidate::new(3, "Charlie Day")
            .with_experience(8)
            .with_education("MS CS")
            .with_salary(120_000)
            .with_resume(
                "Senior C# Architect. Expert in Data Structures and High Performance Computing.",
            )
            .with_skills(["C#", "Data Structures"]),
        Candidate::new(4, "Diana Prince")
            .with_experience(4)
            .with_education("BS Eng")
            .with_salary(85_000)
            .with_resume("Full stack Python and React. SQL optimization expert.")
            .with_skills(["Python", "React", "SQL"]),
        Candidate::new(5, "Evan Wright")
            .with_experience(10)
            .with_education("PhD AI")
            .with_salary(150_000)
            .with_resume("Machine Learning, Python, C++, Advanced Algorithms.")
            .with_skills(["Python", "Data Structures", "C++"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_candidates_are_valid() {
        for candidate in demo_candidates() {
            assert!(candidate.validate().is_ok(), "{:?}", candidate);
        }
    }

    #[test]
    fn demo_skills_are_in_vocabulary() {
        for candidate in demo_candidates() {
            for skill in &candidate.skills {
                assert!(SKILL_VOCABULARY.contains(&skill.as_str()), "{}", skill);
            }
        }
    }

    #[test]
    fn job_titles_are_unique() {
        let jobs = demo_jobs();
        for (i, job) in jobs.iter().enumerate() {
            assert!(jobs[i + 1..].iter().all(|other| other.title != job.title));
        }
    }
}
