use crate::model::{ClusterId, RuleId};
use thiserror::Error;

/// Errors returned by model construction, validation, and engine contracts.
///
/// Rendering itself never returns an error: data defects degrade to
/// placeholder lines and one-line diagnostics (see [`crate::report`]).
#[derive(Debug, Error)]
pub enum Error {
    /// Two clusters in one model share an id.
    #[error("duplicate cluster id {id}")]
    DuplicateCluster {
        /// The repeated id.
        id: ClusterId,
    },

    /// A cluster names a parent that is not in the model.
    #[error("cluster {id} references unknown parent {parent}")]
    UnknownParent {
        /// The referencing cluster.
        id: ClusterId,
        /// The missing parent id.
        parent: ClusterId,
    },

    /// Two rules in one model share an id.
    #[error("duplicate rule id {id}")]
    DuplicateRule {
        /// The repeated id.
        id: RuleId,
    },

    /// A cluster names a rule that is not in the model's rule table.
    #[error("cluster {id} references unknown rule {rule}")]
    UnknownRule {
        /// The referencing cluster.
        id: ClusterId,
        /// The missing rule id.
        rule: RuleId,
    },

    /// A cluster's stored ancestor chain disagrees with its tree level.
    #[error("cluster {id}: ancestor chain has length {found} but tree level is {level}")]
    AncestryMismatch {
        /// The offending cluster.
        id: ClusterId,
        /// Stored chain length.
        found: usize,
        /// Stored tree level.
        level: u32,
    },

    /// Parent/child links are inconsistent (dangling child, one-way link,
    /// or a child level that is not one below the parent).
    #[error("cluster {id}: {message}")]
    InvalidLink {
        /// The offending cluster.
        id: ClusterId,
        /// What is inconsistent.
        message: &'static str,
    },

    /// A hierarchical model must have exactly one root cluster.
    #[error("expected exactly one root cluster, found {found}")]
    RootCount {
        /// Number of parentless clusters found.
        found: usize,
    },

    /// A statistics entry has differing bin and frequency counts.
    #[error("cluster {id}, attribute {attribute}: {bins} bins but {frequencies} frequencies")]
    BinFrequencyMismatch {
        /// The owning cluster.
        id: ClusterId,
        /// The attribute whose statistics are malformed.
        attribute: String,
        /// Number of bins.
        bins: usize,
        /// Number of frequencies.
        frequencies: usize,
    },

    /// An engine object (model, task, apply output) was not found by name.
    #[error("unknown object: {name}")]
    UnknownObject {
        /// The requested name.
        name: String,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
