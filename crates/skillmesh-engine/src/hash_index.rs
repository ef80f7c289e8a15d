//! Label → candidate index with an explicit bucket array.
//!
//! The bucket function is spelled out rather than delegated to `HashMap` so
//! that collisions are observable in the trace: the first 8 bytes of the
//! label's blake3 digest, read little-endian, modulo the bucket count.
//! Buckets chain their entries in insertion order.
//!
//! Hashing is deterministic, so two indexes built from the same records are
//! equal bucket for bucket.

use serde::Serialize;

use skillmesh_core::{Candidate, CandidateId, Snapshot, Step, Trace, TraceRecorder};

pub const ALGORITHM: &str = "Hash Index";
pub const DEFAULT_BUCKETS: usize = 16;

/// One chained key and the candidates listing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub label: String,
    pub ids: Vec<CandidateId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashIndex {
    buckets: Vec<Vec<IndexEntry>>,
}

/// 64-bit label hash: leading 8 digest bytes, little-endian.
pub fn label_hash(label: &str) -> u64 {
    let digest = blake3::hash(label.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Bucket of `label` in a table of `bucket_count` buckets.
pub fn bucket_of(label: &str, bucket_count: usize) -> usize {
    (label_hash(label) % bucket_count.max(1) as u64) as usize
}

enum Placement {
    EmptyBucket,
    Collision { chained: usize },
    Existing,
    AlreadyListed,
}

impl HashIndex {
    /// Builds an index with [`DEFAULT_BUCKETS`] buckets.
    pub fn build(records: &[Candidate]) -> (Self, Trace) {
        Self::with_buckets(DEFAULT_BUCKETS, records)
    }

    /// Builds an index with `bucket_count` buckets (at least one).
    pub fn with_buckets(bucket_count: usize, records: &[Candidate]) -> (Self, Trace) {
        let mut rec = TraceRecorder::new(ALGORITHM);
        let mut index = HashIndex {
            buckets: vec![Vec::new(); bucket_count.max(1)],
        };

        for record in records {
            for label in &record.skills {
                let bucket = bucket_of(label, index.buckets.len());
                let placement = index.insert(bucket, label, record.id);
                rec.record(|id| {
                    let description = match placement {
                        Placement::EmptyBucket => format!(
                            "Insert '{}' -> candidate {} into empty bucket {}",
                            label, record.id, bucket
                        ),
                        Placement::Collision { chained } => format!(
                            "Collision in bucket {}: chain '{}' after {} key(s), add candidate {}",
                            bucket, label, chained, record.id
                        ),
                        Placement::Existing => format!(
                            "Append candidate {} to existing key '{}' in bucket {}",
                            record.id, label, bucket
                        ),
                        Placement::AlreadyListed => format!(
                            "Candidate {} already listed under '{}' in bucket {}",
                            record.id, label, bucket
                        ),
                    };
                    Step::new(id, description)
                        .with_snapshot(index.bucket_snapshot())
                        .highlight([bucket])
                        .var("hash", format!("{:016x}", label_hash(label)))
                        .var("bucket", bucket)
                        .var("chainLength", index.buckets[bucket].len())
                });
            }
        }

        tracing::debug!(
            keys = index.key_count(),
            buckets = index.buckets.len(),
            "hash index built"
        );
        (index, rec.finish())
    }

    fn insert(&mut self, bucket: usize, label: &str, id: CandidateId) -> Placement {
        let chain = &mut self.buckets[bucket];
        if let Some(entry) = chain.iter_mut().find(|e| e.label == label) {
            if entry.ids.contains(&id) {
                return Placement::AlreadyListed;
            }
            entry.ids.push(id);
            return Placement::Existing;
        }

        let chained = chain.len();
        chain.push(IndexEntry {
            label: label.to_string(),
            ids: vec![id],
        });
        if chained == 0 {
            Placement::EmptyBucket
        } else {
            Placement::Collision { chained }
        }
    }

    fn bucket_snapshot(&self) -> Snapshot {
        Snapshot::Buckets(
            self.buckets
                .iter()
                .map(|chain| chain.iter().map(|e| e.label.clone()).collect())
                .collect(),
        )
    }

    /// Candidates listing `label` (exact match), in insertion order.
    pub fn lookup(&self, label: &str) -> &[CandidateId] {
        self.buckets[bucket_of(label, self.buckets.len())]
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn buckets(&self) -> &[Vec<IndexEntry>] {
        &self.buckets
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of distinct labels.
    pub fn key_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Keys per bucket.
    pub fn load_factor(&self) -> f64 {
        self.key_count() as f64 / self.buckets.len() as f64
    }
}
