//! Schema profiling for newline-delimited JSON streams.
//!
//! This crate discovers every distinct key path in a stream of JSON
//! documents, counts occurrences per path, and keeps a bounded,
//! statistically representative sample of the scalar values seen at each
//! path, alongside a running SHA-1 checksum of the raw input.
//!
//! # Features
//!
//! - **Path discovery**: dotted/bracketed key paths (`a.b[].c`) derived
//!   structurally, never declared up front
//! - **Reservoir sampling**: per-path Algorithm-R samples with equal
//!   survival probability for every value seen
//! - **Unique examples**: an independently capped list of distinct values
//!   per path
//! - **Content digest**: SHA-1 over the raw input bytes, independent of
//!   sampling randomness
//!
//! # Example
//!
//! ```
//! use schema_profile::{ProfileConfig, ProfilePass};
//!
//! let mut pass = ProfilePass::new(ProfileConfig::default())?;
//! pass.feed_line(br#"{"user": {"id": 1, "tags": ["a", "b"]}}"#)?;
//! pass.feed_line(br#"{"user": {"id": 2, "tags": []}}"#)?;
//!
//! let report = pass.finish();
//! assert_eq!(report.meta.total, 2);
//! assert_eq!(report.c["user.id"], 2);
//! # Ok::<(), schema_profile::ProfileError>(())
//! ```

mod counter;
mod errors;
mod pass;
mod report;
mod reservoir;
mod value;
mod walker;

pub use counter::PathCounter;
pub use errors::{ProfileError, ProfileResult};
pub use pass::ProfilePass;
pub use report::{Report, ReportMeta};
pub use reservoir::ReservoirSampler;
pub use value::ScalarValue;
pub use walker::walk;

pub use indigo_config::{ParseErrorPolicy, ProfileConfig, SamplerCfg};
