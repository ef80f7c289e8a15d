//! Capped execution traces.
//!
//! Every algorithm in the engine produces a [`Trace`]: an ordered log of
//! [`Step`]s suitable for step-by-step visualization. Traces are bounded.
//! After [`MAX_STEPS`] regular steps, one sentinel step carrying
//! [`TRUNCATION_NOTICE`] is appended, the trace is flagged truncated, and
//! every later append is silently dropped.
//!
//! # Recording
//!
//! Algorithms do not touch a [`Trace`] directly. They thread a
//! [`TraceRecorder`] by `&mut` through their loops and recursive helpers. The
//! recorder assigns step ids, builds each step lazily so no snapshot work is
//! spent once the cap is hit, and hands back the finished trace by value.
//!
//! A recorder may reserve tail capacity for *pinned* steps: verdicts that
//! must be present even when the detail steps before them overflowed the cap.
//! Detail steps stop at `MAX_STEPS - reserved`, pinned steps at `MAX_STEPS`,
//! and the sentinel is appended after both.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::snapshot::Snapshot;

/// Maximum number of regular steps in one trace.
pub const MAX_STEPS: usize = 500;

/// Description of the sentinel step appended when a trace overflows.
pub const TRUNCATION_NOTICE: &str = "** Trace Truncated (Limit Reached) **";

/// One recorded step of an algorithm run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Caller-assigned, expected to increase within one trace.
    pub step_id: u32,
    pub description: String,
    pub state_snapshot: Snapshot,
    /// Positions the visualizer should emphasize, in order.
    pub highlight_indices: SmallVec<[usize; 4]>,
    /// Named pointer/counter values at this step, in insertion order.
    pub variables: IndexMap<String, String>,
}

impl Step {
    /// Creates a step with an empty snapshot, no highlights and no variables.
    pub fn new(step_id: u32, description: impl Into<String>) -> Self {
        Step {
            step_id,
            description: description.into(),
            state_snapshot: Snapshot::Empty,
            highlight_indices: SmallVec::new(),
            variables: IndexMap::new(),
        }
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.state_snapshot = snapshot;
        self
    }

    pub fn highlight<I: IntoIterator<Item = usize>>(mut self, indices: I) -> Self {
        self.highlight_indices.extend(indices);
        self
    }

    /// Adds a named variable, rendered with `Display`.
    pub fn var(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.variables.insert(name.into(), value.to_string());
        self
    }
}

/// The capped step log of one algorithm run.
///
/// Fields are read-only from outside the crate so the length cap cannot be
/// bypassed; the trace is produced once and handed off. For the same reason
/// a trace is serialize-only:
///
/// ```compile_fail
/// let trace: skillmesh_core::Trace = serde_json::from_str(
///     r#"{"algorithmName": "x", "steps": [], "isTruncated": false}"#,
/// ).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    algorithm_name: String,
    steps: Vec<Step>,
    is_truncated: bool,
}

impl Trace {
    pub fn new(algorithm_name: impl Into<String>) -> Self {
        Trace {
            algorithm_name: algorithm_name.into(),
            steps: Vec::new(),
            is_truncated: false,
        }
    }

    /// Appends `step` unless the cap is reached.
    ///
    /// The first refused append adds the truncation sentinel (carrying the
    /// refused step's id) and flags the trace; later appends are dropped.
    pub fn add_step(&mut self, step: Step) {
        if self.steps.len() >= MAX_STEPS {
            self.truncate(step.step_id);
            return;
        }
        self.steps.push(step);
    }

    fn truncate(&mut self, step_id: u32) {
        if self.is_truncated {
            return;
        }
        self.is_truncated = true;
        self.steps.push(Step::new(step_id, TRUNCATION_NOTICE));
    }

    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step description contains `needle` (plain substring match,
    /// the same check trace consumers perform).
    pub fn has_step_containing(&self, needle: &str) -> bool {
        self.steps.iter().any(|s| s.description.contains(needle))
    }

    /// The last step, if any.
    pub fn last_step(&self) -> Option<&Step> {
        self.steps.last()
    }
}

/// Mutable trace context threaded through one algorithm run.
#[derive(Debug)]
pub struct TraceRecorder {
    trace: Trace,
    next_step_id: u32,
    /// Tail capacity held back for pinned steps.
    reserved: usize,
    /// Id of the first step that did not fit; becomes the sentinel's id.
    first_dropped: Option<u32>,
}

impl TraceRecorder {
    /// Creates a recorder with no reserved capacity. Step ids start at 1.
    pub fn new(algorithm_name: impl Into<String>) -> Self {
        Self::with_reserved(algorithm_name, 0)
    }

    /// Creates a recorder that keeps `reserved` tail slots for pinned steps.
    pub fn with_reserved(algorithm_name: impl Into<String>, reserved: usize) -> Self {
        TraceRecorder {
            trace: Trace::new(algorithm_name),
            next_step_id: 1,
            reserved: reserved.min(MAX_STEPS),
            first_dropped: None,
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_step_id;
        self.next_step_id += 1;
        id
    }

    fn drop_step(&mut self, step_id: u32) {
        if self.first_dropped.is_none() {
            self.first_dropped = Some(step_id);
        }
    }

    /// Records a detail step. `build` receives the assigned step id and is
    /// only called when the step will be kept.
    pub fn record<F>(&mut self, build: F)
    where
        F: FnOnce(u32) -> Step,
    {
        let step_id = self.next_id();
        if self.is_saturated() {
            self.drop_step(step_id);
            return;
        }
        self.trace.add_step(build(step_id));
    }

    /// Records a step into the reserved tail capacity.
    pub fn record_pinned<F>(&mut self, build: F)
    where
        F: FnOnce(u32) -> Step,
    {
        let step_id = self.next_id();
        if self.trace.len() >= MAX_STEPS {
            self.drop_step(step_id);
            return;
        }
        self.trace.add_step(build(step_id));
    }

    /// Whether detail steps are currently being dropped.
    pub fn is_saturated(&self) -> bool {
        self.first_dropped.is_some() || self.trace.len() + self.reserved >= MAX_STEPS
    }

    /// Number of steps kept so far.
    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Closes the run and returns the trace, appending the sentinel if any
    /// step was dropped.
    pub fn finish(mut self) -> Trace {
        if let Some(step_id) = self.first_dropped {
            self.trace.truncate(step_id);
        }
        tracing::debug!(
            algorithm = %self.trace.algorithm_name,
            steps = self.trace.len(),
            truncated = self.trace.is_truncated,
            "trace finished"
        );
        self.trace
    }
}
