// Settle-all fan-out over identifiers
// Every identifier is one independent fetch; a failed fetch is recorded and left out of the result

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, warn};

// Result of fetching a single identifier
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Value),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub identifier: String,
    pub reason: String,
}

/// Payloads of every identifier that was fetched successfully.
///
/// Identifiers whose fetch failed have no entry in `payloads`; they are listed in
/// `failures` instead. Entry order follows completion and is not guaranteed to
/// match the order identifiers were given in.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregatedResult {
    pub payloads: Map<String, Value>,
    pub failures: Vec<FetchFailure>,
}

impl AggregatedResult {
    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.payloads.get(identifier)
    }

    pub fn succeeded(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    // The identifier -> payload mapping as a single JSON object
    pub fn into_value(self) -> Value {
        Value::Object(self.payloads)
    }

    fn record(&mut self, identifier: String, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Success(payload) => {
                debug!(identifier = %identifier, "fetch succeeded");
                self.payloads.insert(identifier, payload);
            }
            FetchOutcome::Failure(reason) => {
                warn!(
                    identifier = %identifier,
                    error = %reason,
                    "failed to fetch availability for identifier"
                );
                self.failures.push(FetchFailure { identifier, reason });
            }
        }
    }
}

/// Fetches every identifier concurrently and waits for all of them to settle.
///
/// All fetches are started before any is awaited. A failing or panicking fetch
/// never cancels the others and never makes this function fail; it is logged and
/// left out of the mapping. Duplicate identifiers are fetched independently.
pub async fn aggregate<F, Fut, E>(identifiers: &[String], fetch: F) -> AggregatedResult
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: fmt::Display,
{
    info!(count = identifiers.len(), "fetching identifiers");

    let settled = join_all(
        identifiers
            .iter()
            .map(|identifier| settle(identifier.clone(), &fetch)),
    )
    .await;

    collect(settled)
}

/// Same contract as [`aggregate`], with at most `limit` fetches in flight.
///
/// A limit of zero is treated as one.
pub async fn aggregate_bounded<F, Fut, E>(
    identifiers: &[String],
    fetch: F,
    limit: usize,
) -> AggregatedResult
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: fmt::Display,
{
    let limit = limit.max(1);
    info!(count = identifiers.len(), limit, "fetching identifiers");

    let settled: Vec<(String, FetchOutcome)> = stream::iter(identifiers.iter().cloned())
        .map(|identifier| settle(identifier, &fetch))
        .buffer_unordered(limit)
        .collect()
        .await;

    collect(settled)
}

// Runs one fetch and turns whatever happens into an outcome, including a panic
async fn settle<F, Fut, E>(identifier: String, fetch: &F) -> (String, FetchOutcome)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: fmt::Display,
{
    let attempt = AssertUnwindSafe(async { fetch(identifier.clone()).await })
        .catch_unwind()
        .await;

    let outcome = match attempt {
        Ok(Ok(payload)) => FetchOutcome::Success(payload),
        Ok(Err(err)) => FetchOutcome::Failure(err.to_string()),
        Err(panic) => FetchOutcome::Failure(format!(
            "fetch panicked: {}",
            panic_message(panic.as_ref())
        )),
    };

    (identifier, outcome)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn collect(settled: Vec<(String, FetchOutcome)>) -> AggregatedResult {
    let mut result = AggregatedResult::default();
    for (identifier, outcome) in settled {
        result.record(identifier, outcome);
    }
    // A duplicate that succeeded elsewhere is in the mapping, so it is not missing
    result
        .failures
        .retain(|failure| !result.payloads.contains_key(&failure.identifier));

    info!(
        succeeded = result.succeeded(),
        failed = result.failures.len(),
        "all fetches settled"
    );
    result
}
