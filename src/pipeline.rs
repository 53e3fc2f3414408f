// Fan-out followed by allowlist projection

use crate::fanout::{aggregate, aggregate_bounded, AggregatedResult, FetchFailure};
use crate::tree_filter::project_by_allowlist;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    // None fetches every identifier at once
    pub max_concurrency: Option<usize>,
}

// Filtered document plus the identifiers that could not be fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub document: Value,
    pub failures: Vec<FetchFailure>,
}

/// Fetches every identifier, merges the payloads by identifier and projects the
/// result through `allowlist`. Returns `{}` when nothing qualifies.
pub async fn run<F, Fut, E>(
    identifiers: &[String],
    fetch: F,
    allowlist: &HashSet<String>,
) -> Value
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: fmt::Display,
{
    run_detailed(identifiers, fetch, allowlist, &PipelineOptions::default())
        .await
        .document
}

pub async fn run_detailed<F, Fut, E>(
    identifiers: &[String],
    fetch: F,
    allowlist: &HashSet<String>,
    options: &PipelineOptions,
) -> Digest
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: fmt::Display,
{
    let aggregated = match options.max_concurrency {
        Some(limit) => aggregate_bounded(identifiers, fetch, limit).await,
        None => aggregate(identifiers, fetch).await,
    };

    project_aggregated(aggregated, allowlist)
}

fn project_aggregated(aggregated: AggregatedResult, allowlist: &HashSet<String>) -> Digest {
    let AggregatedResult { payloads, failures } = aggregated;
    let document = project_by_allowlist(&Value::Object(payloads), allowlist)
        .unwrap_or_else(|| Value::Object(Map::new()));

    Digest { document, failures }
}
