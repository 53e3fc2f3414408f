// Main library file for the availability digest

// Core: tree filtering, settle-all fan-out and their composition
pub mod fanout;
pub mod pipeline;
pub mod tree_filter;

// Collaborators: identifier source, availability client, stay dates, configuration
pub mod airports;
pub mod availability;
pub mod config;
pub mod stay;

// Re-export key types for convenience
pub use airports::{Airport, AirportSource, JsonFileAirportSource, SourceError};
pub use availability::{
    ApiError, AvailabilityRequest, AvailabilityService, ClientConfig, ClientError,
    HttpAvailabilityClient, RequestTemplate,
};
pub use config::{Config, ConfigError};
pub use fanout::{aggregate, aggregate_bounded, AggregatedResult, FetchFailure, FetchOutcome};
pub use pipeline::{run, run_detailed, Digest, PipelineOptions};
pub use stay::StayWindow;
pub use tree_filter::{allowlist_from, project_by_allowlist, remove_by_key_substring};
