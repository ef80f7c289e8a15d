pub mod error;
pub mod id;
pub mod record;
pub mod snapshot;
pub mod trace;

// Re-export commonly used types
pub use error::CoreError;
pub use id::CandidateId;
pub use record::{Candidate, JobRequirement};
pub use snapshot::{Snapshot, TreeNodeView};
pub use trace::{Step, Trace, TraceRecorder, MAX_STEPS, TRUNCATION_NOTICE};
