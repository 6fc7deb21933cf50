//! Device capability scoring and comparison engine.
//!
//! Three pure components over in-memory telemetry:
//! - `analyzer` classifies cluster data into supported/unsupported
//!   capabilities per category,
//! - `engine` computes compliance scores and star ratings per device type,
//! - `aggregate` merges several devices' capability sets into one comparison
//!   matrix.
//!
//! All of them are total functions of their inputs: same endpoints in, same
//! result out, no I/O and no shared state, so callers may cache and
//! parallelize freely.

pub mod aggregate;
pub mod analyzer;
pub mod engine;
mod score;

pub use score::CapabilityContribution;
pub use score::DeviceScore;
pub use score::DeviceTypeScore;
pub use score::ScoreWeights;

pub(crate) use score::star_rating_for;
