//! Text reports over model snapshots.
//!
//! The centerpiece is [`Report`], which renders a full model report:
//! header, leaf-cluster details (with statistics tables for the first
//! leaf), a rule summary listing, and the cluster hierarchy walked
//! depth-first with indentation tracking tree depth.
//!
//! [`render_segment_counts`] and [`render_top_cases`] format the two
//! apply-output tables from rows an engine hands back.
//!
//! Everything here is presentation: the renderers borrow a model for one
//! pass, mutate nothing, and degrade on defective data (placeholder lines
//! plus `tracing` warnings) instead of returning errors.

mod render;
mod rules;
mod scoring;
mod stats;
mod util;

pub use render::Report;
pub use scoring::{render_segment_counts, render_top_cases, ScoredCase, SegmentCount};
