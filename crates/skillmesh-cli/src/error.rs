use std::path::PathBuf;

use thiserror::Error;

use skillmesh_core::CoreError;

/// Errors surfaced by the `skillmesh` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("unknown job '{title}'")]
    UnknownJob { title: String },

    #[error("{0}")]
    Usage(String),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl CliError {
    /// Process exit code: 1 for input and usage errors, 3 for I/O.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } | CliError::Runtime(_) | CliError::Output(_) => 3,
            CliError::Parse { .. }
            | CliError::Core(_)
            | CliError::UnknownJob { .. }
            | CliError::Usage(_)
            | CliError::Serialize(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let io = CliError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io.exit_code(), 3);
        assert_eq!(io.to_string(), "failed to read 'missing.json': gone");

        let core = CliError::from(CoreError::UnknownStrategy { name: "bogo".into() });
        assert_eq!(core.exit_code(), 1);

        let job = CliError::UnknownJob { title: "Astronaut".into() };
        assert_eq!(job.exit_code(), 1);
        assert_eq!(job.to_string(), "unknown job 'Astronaut'");
    }
}
