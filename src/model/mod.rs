//! Owned snapshots of clustering models.
//!
//! A mining engine hands back models as object graphs; this module captures
//! one as a plain value the rest of the crate can walk without touching the
//! engine again. The snapshot covers four things:
//!
//! - the **cluster arena** ([`ClusteringModel`], [`Cluster`]): the split
//!   tree as id-linked nodes in a flat, insertion-ordered store;
//! - the **rule table** ([`Rule`], [`SimplePredicate`], [`Operator`]): each
//!   leaf's decision rule as ordered predicate conjunctions;
//! - **per-cluster statistics** ([`UnivariateStatistics`], [`Interval`]):
//!   binned value distributions describing each centroid;
//! - the **signature** ([`ModelSignature`]): attribute names and kinds, which
//!   the report layer uses to pick numerical or categorical formatting.
//!
//! ## Construction
//!
//! [`ModelBuilder`] is the checked path: declare clusters top-down with
//! parent links and it derives levels, ancestor chains and child lists,
//! refusing structurally broken input. [`ClusteringModel::from_parts`] is
//! the unchecked path for engine-shaped snapshots that may carry defects
//! the report layer is expected to tolerate.
//!
//! ```rust
//! use thicket::model::{ClusterId, ClusterSeed, ModelBuilder};
//!
//! let model = ModelBuilder::new("demo")
//!     .with_cluster(ClusterSeed::new(ClusterId(1)).with_case_count(100))
//!     .with_cluster(
//!         ClusterSeed::new(ClusterId(2))
//!             .with_parent(ClusterId(1))
//!             .with_case_count(45),
//!     )
//!     .with_cluster(
//!         ClusterSeed::new(ClusterId(3))
//!             .with_parent(ClusterId(1))
//!             .with_case_count(55),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.number_of_levels(), 2);
//! assert_eq!(model.number_of_clusters(), 2); // the two leaves
//! assert_eq!(model.root().map(|c| c.id), Some(ClusterId(1)));
//! ```

mod cluster;
mod rule;
mod signature;
mod stats;

pub use cluster::{Cluster, ClusterId, ClusterSeed, ClusteringModel, ModelBuilder};
pub use rule::{CompoundPredicate, Operator, Rule, RuleId, SimplePredicate};
pub use signature::{AttributeKind, ModelSignature, SignatureAttribute};
pub use stats::{AttributeStatisticsSet, Bins, Interval, IntervalClosure, UnivariateStatistics};
