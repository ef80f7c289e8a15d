//! Domain records consumed read-only by the engine.
//!
//! [`Candidate`] is the record every algorithm runs over. [`JobRequirement`]
//! is the query side of the fit score. Both serialize camelCase so JSON
//! produced by an existing record source can be read without translation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::CandidateId;

/// Longest accepted candidate name, in characters.
pub const MAX_NAME_LEN: usize = 100;
/// Shortest accepted candidate name, in characters.
pub const MIN_NAME_LEN: usize = 2;
/// Upper bound on years of experience.
pub const MAX_EXPERIENCE_YEARS: u32 = 50;
/// Upper bound on expected salary, in whole currency units.
pub const MAX_EXPECTED_SALARY: u64 = 1_000_000;

/// A candidate record.
///
/// Components only read the fields they need: sorting reads the comparator's
/// fields, the pattern matcher reads `resume_text`, graph and index builders
/// read `skills`, the greedy selector reads experience and salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub resume_text: String,
    /// Expected cost of hiring, in whole currency units.
    #[serde(default)]
    pub expected_salary: u64,
    /// Ordered skill labels.
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Candidate {
    /// Creates a candidate with only an id and name set.
    pub fn new(id: u32, full_name: impl Into<String>) -> Self {
        Candidate {
            id: CandidateId(id),
            full_name: full_name.into(),
            experience_years: 0,
            education: String::new(),
            resume_text: String::new(),
            expected_salary: 0,
            skills: Vec::new(),
        }
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = years;
        self
    }

    pub fn with_salary(mut self, salary: u64) -> Self {
        self.expected_salary = salary;
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = education.into();
        self
    }

    pub fn with_resume(mut self, text: impl Into<String>) -> Self {
        self.resume_text = text.into();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the field ranges a record source enforces before records reach
    /// the engine. The engine itself never calls this.
    pub fn validate(&self) -> Result<(), CoreError> {
        let name_len = self.full_name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
            return Err(CoreError::InvalidRecord {
                id: self.id,
                field: "fullName",
                reason: format!(
                    "must be {}..={} characters, got {}",
                    MIN_NAME_LEN, MAX_NAME_LEN, name_len
                ),
            });
        }
        if self.experience_years > MAX_EXPERIENCE_YEARS {
            return Err(CoreError::InvalidRecord {
                id: self.id,
                field: "experienceYears",
                reason: format!(
                    "must be at most {}, got {}",
                    MAX_EXPERIENCE_YEARS, self.experience_years
                ),
            });
        }
        if self.expected_salary > MAX_EXPECTED_SALARY {
            return Err(CoreError::InvalidRecord {
                id: self.id,
                field: "expectedSalary",
                reason: format!(
                    "must be at most {}, got {}",
                    MAX_EXPECTED_SALARY, self.expected_salary
                ),
            });
        }
        Ok(())
    }
}

/// What a job asks for. Input to the fit score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequirement {
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub min_experience: u32,
    /// Salary ceiling; 0 means no ceiling.
    #[serde(default)]
    pub max_salary: u64,
}

impl JobRequirement {
    /// Builds a requirement from the comma-separated skill text job postings
    /// are stored with.
    pub fn new(title: impl Into<String>, skills: &str, min_experience: u32, max_salary: u64) -> Self {
        JobRequirement {
            title: title.into(),
            required_skills: Self::parse_skills(skills),
            min_experience,
            max_salary,
        }
    }

    /// Splits `"C#, SQL, Data Structures"` into trimmed, non-empty labels.
    pub fn parse_skills(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_record() {
        let json = r#"{
            "id": 4,
            "fullName": "Diana Prince",
            "experienceYears": 4,
            "education": "BS Eng",
            "resumeText": "Full stack Python and React.",
            "expectedSalary": 85000,
            "skills": ["Python", "React", "SQL"]
        }"#;
        let c: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, CandidateId(4));
        assert_eq!(c.experience_years, 4);
        assert_eq!(c.expected_salary, 85000);
        assert_eq!(c.skills, vec!["Python", "React", "SQL"]);
    }

    #[test]
    fn missing_optional_fields_default() {
        let c: Candidate = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(c.full_name, "");
        assert!(c.skills.is_empty());
    }

    #[test]
    fn validate_accepts_in_range_record() {
        let c = Candidate::new(1, "Alice Smith").with_experience(5).with_salary(90_000);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_name() {
        let err = Candidate::new(9, "A").validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord { field: "fullName", .. }));
    }

    #[test]
    fn validate_rejects_excess_experience() {
        let err = Candidate::new(2, "Bob Jones")
            .with_experience(51)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("experienceYears"));
    }

    #[test]
    fn validate_rejects_excess_salary() {
        let err = Candidate::new(3, "Charlie Day")
            .with_salary(MAX_EXPECTED_SALARY + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord { field: "expectedSalary", .. }));
    }

    #[test]
    fn parse_skills_trims_and_drops_empties() {
        assert_eq!(
            JobRequirement::parse_skills(" C#, SQL ,, Data Structures,"),
            vec!["C#", "SQL", "Data Structures"]
        );
    }

    #[test]
    fn requirement_new_parses_skill_text() {
        let job = JobRequirement::new("Data Analyst", "Python, SQL, Excel", 2, 85_000);
        assert_eq!(job.required_skills.len(), 3);
        assert_eq!(job.min_experience, 2);
    }
}
