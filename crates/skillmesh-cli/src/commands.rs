//! Requests and their JSON responses.
//!
//! Every subcommand and every batch line becomes a [`Request`]. Requests that
//! need a built structure (prefix index, co-occurrence graph, hash index)
//! have separate `*_response` functions taking the structure, so the batch
//! runner can feed them from its caches while one-shot commands build fresh.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use skillmesh_core::{Candidate, JobRequirement, Trace, TreeNodeView};
use skillmesh_engine::hash_index::IndexEntry;
use skillmesh_engine::{
    build_co_occurrence, build_from_sequence, fit_score, greedy, pattern, sort, HashIndex,
    MatchResult, PrefixIndex, SkillGraph, SortKey, SortStrategy,
};

use crate::error::CliError;
use crate::seed;

/// One unit of work, as parsed from a batch line (`{"op": "sort", ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Rank,
    Sort {
        #[serde(default = "merge_strategy")]
        strategy: SortStrategy,
        #[serde(default)]
        by: SortKey,
    },
    Search {
        keyword: String,
    },
    Avl,
    Autocomplete {
        #[serde(default)]
        prefix: String,
    },
    Network,
    Index {
        #[serde(default)]
        label: Option<String>,
    },
    Shortlist {
        budget: i64,
    },
    Match {
        job: String,
    },
}

fn merge_strategy() -> SortStrategy {
    SortStrategy::Merge
}

/// Records plus the reference data requests run against.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub records: Vec<Candidate>,
    /// Base vocabulary followed by any record skill not already in it.
    pub vocabulary: Vec<String>,
    pub jobs: Vec<JobRequirement>,
}

impl Workspace {
    pub fn new(records: Vec<Candidate>) -> Self {
        let mut vocabulary: Vec<String> = seed::SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect();
        for skill in records.iter().flat_map(|r| &r.skills) {
            if !vocabulary.contains(skill) {
                vocabulary.push(skill.clone());
            }
        }
        Workspace {
            records,
            vocabulary,
            jobs: seed::demo_jobs(),
        }
    }

    /// Finds a job by title, ignoring case.
    pub fn job(&self, title: &str) -> Result<&JobRequirement, CliError> {
        self.jobs
            .iter()
            .find(|job| job.title.eq_ignore_ascii_case(title.trim()))
            .ok_or_else(|| CliError::UnknownJob {
                title: title.to_string(),
            })
    }
}

#[derive(Serialize)]
struct CandidatesResponse {
    candidates: Vec<Candidate>,
    trace: Trace,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeResponse {
    tree: Option<TreeNodeView>,
    size: usize,
    height: u32,
    trace: Trace,
}

#[derive(Serialize)]
struct AutocompleteResponse<'a> {
    prefix: &'a str,
    suggestions: Vec<String>,
    trace: Trace,
}

#[derive(Serialize)]
struct NetworkResponse<'a> {
    graph: &'a SkillGraph,
    clusters: Vec<Vec<String>>,
    trace: &'a Trace,
}

#[derive(Serialize)]
struct Lookup<'a> {
    label: &'a str,
    ids: Vec<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexResponse<'a> {
    buckets: &'a [Vec<IndexEntry>],
    load_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<Lookup<'a>>,
    trace: &'a Trace,
}

#[derive(Serialize)]
struct MatchResponse<'a> {
    job: &'a JobRequirement,
    matches: Vec<MatchResult>,
    /// Score trace of the best match.
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Trace>,
}

/// Runs `request` against `workspace`, building any index it needs.
pub fn execute(request: &Request, workspace: &Workspace) -> Result<Value, CliError> {
    let records = &workspace.records;
    let response = match request {
        Request::Rank => {
            let (candidates, trace) = sort(records, None, SortStrategy::Heap);
            serde_json::to_value(CandidatesResponse { candidates, trace })?
        }
        Request::Sort { strategy, by } => {
            let compare = by.comparator();
            let (candidates, trace) = sort(records, Some(&compare), *strategy);
            serde_json::to_value(CandidatesResponse { candidates, trace })?
        }
        Request::Search { keyword } => serde_json::to_value(pattern::search_candidates(records, keyword))?,
        Request::Avl => {
            let (tree, trace) = build_from_sequence(records);
            serde_json::to_value(TreeResponse {
                tree: tree.root(),
                size: tree.len(),
                height: tree.height(),
                trace,
            })?
        }
        Request::Autocomplete { prefix } => {
            let (index, _) = PrefixIndex::build(&workspace.vocabulary);
            autocomplete_response(&index, prefix)?
        }
        Request::Network => {
            let (graph, trace) = build_co_occurrence(records);
            network_response(&graph, &trace)?
        }
        Request::Index { label } => {
            let (index, trace) = HashIndex::build(records);
            index_response(&index, &trace, label.as_deref())?
        }
        Request::Shortlist { budget } => {
            let (candidates, trace) = greedy::select(records, *budget);
            serde_json::to_value(CandidatesResponse { candidates, trace })?
        }
        Request::Match { job } => {
            let job = workspace.job(job)?;
            let matches = fit_score::rank_matches(records, job);
            let trace = matches
                .first()
                .map(|best| fit_score::score(&best.candidate, job).1);
            serde_json::to_value(MatchResponse { job, matches, trace })?
        }
    };
    Ok(response)
}

pub fn autocomplete_response(index: &PrefixIndex, prefix: &str) -> Result<Value, CliError> {
    let (suggestions, trace) = index.complete(prefix);
    Ok(serde_json::to_value(AutocompleteResponse {
        prefix,
        suggestions,
        trace,
    })?)
}

pub fn network_response(graph: &SkillGraph, trace: &Trace) -> Result<Value, CliError> {
    Ok(serde_json::to_value(NetworkResponse {
        graph,
        clusters: graph.clusters(),
        trace,
    })?)
}

pub fn index_response(index: &HashIndex, trace: &Trace, label: Option<&str>) -> Result<Value, CliError> {
    let lookup = label.map(|label| Lookup {
        label,
        ids: index.lookup(label).iter().map(|id| id.0).collect(),
    });
    Ok(serde_json::to_value(IndexResponse {
        buckets: index.buckets(),
        load_factor: index.load_factor(),
        lookup,
        trace,
    })?)
}
