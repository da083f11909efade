//! The `indigo` binary: input selection and the ingestion loop around
//! `schema_profile::ProfilePass`.

pub mod inputs;
pub mod version;

pub use inputs::{Input, open_inputs};
