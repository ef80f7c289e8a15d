//! Concurrent batch mode.
//!
//! Reads one JSON request per line and runs every request as its own tokio
//! task. The prefix index, co-occurrence graph and hash index are built at
//! most once per TTL window through [`BuildCache`]s shared by all tasks.
//! Responses come back in request order; a line that fails yields an
//! `{"line": n, "error": ...}` object in its place.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use skillmesh_cache::BuildCache;
use skillmesh_core::Trace;
use skillmesh_engine::{build_co_occurrence, HashIndex, PrefixIndex, SkillGraph};

use crate::commands::{self, Request, Workspace};
use crate::config::Config;
use crate::error::CliError;

/// Caches keyed by `()`: one workspace per batch run, so one value each.
pub struct Caches {
    pub vocabulary: Arc<BuildCache<(), PrefixIndex>>,
    pub graph: Arc<BuildCache<(), (SkillGraph, Trace)>>,
    pub index: Arc<BuildCache<(), (HashIndex, Trace)>>,
}

impl Caches {
    pub fn new(config: &Config) -> Self {
        Caches {
            vocabulary: Arc::new(BuildCache::new("vocabulary", config.vocab_ttl)),
            graph: Arc::new(BuildCache::new("graph", config.graph_ttl)),
            index: Arc::new(BuildCache::new("index", config.graph_ttl)),
        }
    }
}

/// A non-blank request line and its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub number: usize,
    pub text: String,
}

pub fn read_requests(path: &Path) -> Result<Vec<RequestLine>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_lines(&text))
}

pub fn parse_lines(text: &str) -> Vec<RequestLine> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| RequestLine {
            number: i + 1,
            text: line.to_string(),
        })
        .collect()
}

/// Runs all requests concurrently and returns their responses in order.
pub async fn run(lines: Vec<RequestLine>, workspace: Arc<Workspace>, config: &Config) -> Vec<Value> {
    let caches = Arc::new(Caches::new(config));
    let sweepers = [
        caches.vocabulary.start_expiry_sweep(config.sweep_interval),
        caches.graph.start_expiry_sweep(config.sweep_interval),
        caches.index.start_expiry_sweep(config.sweep_interval),
    ];
    tracing::info!(requests = lines.len(), "batch started");

    let handles: Vec<_> = lines
        .into_iter()
        .map(|line| {
            let workspace = Arc::clone(&workspace);
            let caches = Arc::clone(&caches);
            let number = line.number;
            let handle = tokio::spawn(async move {
                let request: Request =
                    serde_json::from_str(&line.text).map_err(|source| CliError::Parse {
                        context: format!("request line {}", line.number),
                        source,
                    })?;
                execute(&request, &workspace, &caches).await
            });
            (number, handle)
        })
        .collect();

    let mut responses = Vec::with_capacity(handles.len());
    for (number, handle) in handles {
        let response = match handle.await {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => json!({ "line": number, "error": err.to_string() }),
            Err(join) => json!({ "line": number, "error": join.to_string() }),
        };
        responses.push(response);
    }

    for sweeper in sweepers {
        sweeper.abort();
    }
    tracing::info!(responses = responses.len(), "batch finished");
    responses
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Like [`commands::execute`], but reads built structures from `caches`.
pub async fn execute(request: &Request, workspace: &Workspace, caches: &Caches) -> Result<Value, CliError> {
    match request {
        Request::Autocomplete { prefix } => {
            let index = infallible(
                caches
                    .vocabulary
                    .get_or_build((), || async { Ok(PrefixIndex::build(&workspace.vocabulary).0) })
                    .await,
            );
            commands::autocomplete_response(&index, prefix)
        }
        Request::Network => {
            let built = infallible(
                caches
                    .graph
                    .get_or_build((), || async { Ok(build_co_occurrence(&workspace.records)) })
                    .await,
            );
            commands::network_response(&built.0, &built.1)
        }
        Request::Index { label } => {
            let built = infallible(
                caches
                    .index
                    .get_or_build((), || async { Ok(HashIndex::build(&workspace.records)) })
                    .await,
            );
            commands::index_response(&built.0, &built.1, label.as_deref())
        }
        other => commands::execute(other, workspace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::seed;

    fn workspace() -> Arc<Workspace> {
        Arc::new(Workspace::new(seed::demo_candidates()))
    }

    #[test]
    fn blank_lines_are_skipped_but_numbered() {
        let lines = parse_lines("{\"op\":\"rank\"}\n\n  \n{\"op\":\"avl\"}\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 4);
    }

    #[tokio::test]
    async fn responses_keep_request_order() {
        let text = [
            r#"{"op":"rank"}"#,
            r#"{"op":"autocomplete","prefix":"py"}"#,
            r#"{"op":"autocomplete","prefix":"ja"}"#,
            r#"{"op":"index","label":"SQL"}"#,
            r#"{"op":"network"}"#,
        ]
        .join("\n");
        let responses = run(parse_lines(&text), workspace(), &Config::default()).await;

        assert_eq!(responses.len(), 5);
        assert_eq!(responses[0]["trace"]["algorithmName"], "Max Heap Sort");
        assert_eq!(responses[1]["suggestions"], json!(["Python"]));
        assert_eq!(responses[2]["suggestions"], json!(["Java", "JavaScript"]));
        assert_eq!(responses[3]["lookup"]["ids"], json!([1, 4]));
        assert_eq!(responses[4]["graph"]["SQL"]["Java"], 1);
    }

    #[tokio::test]
    async fn bad_lines_become_error_objects() {
        let text = "{\"op\":\"rank\"}\nnot json\n{\"op\":\"match\",\"job\":\"Astronaut\"}";
        let responses = run(parse_lines(text), workspace(), &Config::default()).await;

        assert!(responses[0].get("error").is_none());
        assert_eq!(responses[1]["line"], 2);
        assert!(responses[1]["error"].as_str().unwrap().contains("request line 2"));
        assert_eq!(responses[2]["error"], "unknown job 'Astronaut'");
    }

    #[tokio::test]
    async fn cached_structures_are_built_once() {
        let caches = Caches::new(&Config::default());
        let ws = workspace();
        let builds = &AtomicUsize::new(0);
        let vocabulary = &ws.vocabulary;
        let cached = move || async move {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(PrefixIndex::build(vocabulary).0)
        };

        let request = Request::Autocomplete { prefix: "s".into() };
        let first = execute(&request, &ws, &caches).await.unwrap();
        let built = caches.vocabulary.get_or_build((), cached).await.unwrap();

        let second = execute(&request, &ws, &caches).await.unwrap();
        let again = caches.vocabulary.get_or_build((), cached).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(builds.load(Ordering::SeqCst), 0);
        assert!(Arc::ptr_eq(&built, &again));
        assert_eq!(caches.vocabulary.len(), 1);
    }
}
