//! Where candidate records come from.

use std::collections::HashSet;
use std::path::PathBuf;

use skillmesh_core::{Candidate, CoreError};
use skillmesh_engine::synthetic;

use crate::error::CliError;
use crate::seed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// The built-in demo candidates.
    Demo,
    /// A JSON array of candidates.
    File(PathBuf),
    /// Seeded synthetic candidates drawing on the demo vocabulary.
    Synthetic { count: usize, seed: u64 },
}

impl RecordSource {
    pub fn load(&self) -> Result<Vec<Candidate>, CliError> {
        let records = match self {
            RecordSource::Demo => seed::demo_candidates(),
            RecordSource::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
                let records: Vec<Candidate> =
                    serde_json::from_str(&text).map_err(|source| CliError::Parse {
                        context: path.display().to_string(),
                        source,
                    })?;
                check(&records)?;
                records
            }
            RecordSource::Synthetic { count, seed } => {
                synthetic::generate(*count, *seed, seed::SKILL_VOCABULARY)
            }
        };
        tracing::info!(source = ?self, records = records.len(), "records loaded");
        Ok(records)
    }
}

/// Applies the field rules and rejects duplicate ids.
fn check(records: &[Candidate]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for record in records {
        record.validate()?;
        if !seen.insert(record.id) {
            return Err(CoreError::InvalidRecord {
                id: record.id,
                field: "id",
                reason: "appears more than once".to_string(),
            });
        }
    }
    Ok(())
}
