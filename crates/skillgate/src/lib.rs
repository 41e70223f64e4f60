//! Evidence-grounded scoring of hiring challenge submissions.
//!
//! The [`scoring`] module holds the evaluation engine and its data model;
//! [`config`], [`telemetry`], and [`error`] carry the service plumbing
//! shared with the API binary.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
