//! matterscope: browse and compare Matter device capability data.
//!
//! The core is a pure scoring/comparison engine over ingested endpoint
//! telemetry; around it sit an MQTT ingest source, an in-memory snapshot
//! store, and a small HTTP API.

pub mod api;
pub mod config;
pub mod ingest;
pub mod score;
pub mod snapshot;
pub mod store;

pub use config::format_diagnostics;
pub use config::Config;
pub use config::Diagnostic;
pub use config::LogLevel;
pub use score::aggregate::aggregate_capabilities;
pub use score::aggregate::ComparisonMatrix;
pub use score::analyzer::analyze_capabilities;
pub use score::analyzer::AnalyzerResult;
pub use score::engine::calculate_device_score;
pub use score::DeviceScore;
pub use score::DeviceTypeScore;
pub use score::ScoreWeights;
pub use snapshot::ClusterInstance;
pub use snapshot::ClusterSide;
pub use snapshot::Endpoint;
pub use store::DeviceStore;
pub use store::EndpointProvider;
