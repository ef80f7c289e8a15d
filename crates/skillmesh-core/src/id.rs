//! Stable ID newtype for candidate records.
//!
//! Record identifiers are assigned by the record source. Wrapping the raw
//! `u32` keeps them from being confused with positional indices, which the
//! traces also carry (highlight indices, bucket numbers).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable candidate identifier, serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CandidateId {
    fn from(raw: u32) -> Self {
        CandidateId(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_id_display() {
        assert_eq!(format!("{}", CandidateId(7)), "7");
    }

    #[test]
    fn candidate_id_orders_by_inner_value() {
        let mut ids = vec![CandidateId(3), CandidateId(1), CandidateId(2)];
        ids.sort();
        assert_eq!(ids, vec![CandidateId(1), CandidateId(2), CandidateId(3)]);
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&CandidateId(42)).unwrap();
        assert_eq!(json, "42");
        let back: CandidateId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CandidateId(42));
    }
}
