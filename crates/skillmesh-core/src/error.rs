//! Core error types for skillmesh-core.
//!
//! The engine itself never fails on well-formed input. These errors cover
//! the edges around it: parsing caller-supplied selector names and the
//! field rules a record source applies before handing records over.

use crate::id::CandidateId;
use thiserror::Error;

/// Core errors produced by the skillmesh-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A sort strategy name did not match any known strategy.
    #[error("unknown sort strategy: '{name}' (expected heap, merge or quick)")]
    UnknownStrategy { name: String },

    /// A sort key name did not match any known comparator.
    #[error("unknown sort key: '{name}' (expected experience, salary or name)")]
    UnknownSortKey { name: String },

    /// A record field is outside the range the record source accepts.
    #[error("invalid candidate {id}: {field} {reason}")]
    InvalidRecord {
        id: CandidateId,
        field: &'static str,
        reason: String,
    },
}
