//! Cluster-model snapshots and indented text reports.
//!
//! `thicket` owns the presentation side of a clustering pipeline: a mining
//! engine builds the model, this crate captures it as a plain value and
//! renders it as text.
//!
//! The pieces, bottom up:
//! - [`model`]: an owned snapshot of one clustering model, an id-linked
//!   cluster arena plus rules, per-cluster statistics and the signature.
//! - [`report`]: the [`Report`] renderer (hierarchy walk, rule and
//!   statistics formatting) and the apply-output tables.
//! - [`engine`]: the session/task contract a pipeline drives, with an
//!   in-memory implementation for tests and demos.
//! - [`sample`]: a seeded demo model generator backing the engine, the
//!   benches and the example.

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;
pub mod report;
pub mod sample;

pub use error::{Error, Result};
pub use model::{Cluster, ClusterId, ClusteringModel, ModelBuilder, Rule, RuleId};
pub use report::Report;
