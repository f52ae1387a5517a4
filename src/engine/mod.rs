//! Mining-engine session and task contracts.
//!
//! Model building and scoring happen inside an external mining engine; this
//! crate only needs the thin surface declared here: open a session from an
//! explicit [`ConnectionSpec`], submit named [`TaskSpec`]s, poll them to a
//! terminal [`ExecutionState`], and pull results (a model snapshot, segment
//! counts, top scored cases) back out.
//!
//! [`run_task`] wraps the submit-then-block ritual every pipeline repeats:
//! submit, poll until terminal, log the outcome, return success as a bool.
//! Engine failures (`Err`) propagate; a task that *ran* and failed is an
//! `Ok(false)` with the failure description logged.
//!
//! [`MemoryEngine`](memory::MemoryEngine) is the in-process implementation
//! used by tests, benches and the demo.

pub mod memory;

use tracing::{info, warn};

use crate::error::Result;
use crate::model::{ClusterId, ClusteringModel};
use crate::report::{ScoredCase, SegmentCount};

pub use memory::MemoryEngine;

/// Where and how to open an engine session.
///
/// Replaces ambient global connection state: whoever drives a pipeline
/// builds one of these and passes it down.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSpec {
    uri: String,
    name: String,
    password: String,
}

impl ConnectionSpec {
    /// Spec for the engine at `uri`, with no credentials yet.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: String::new(),
            password: String::new(),
        }
    }

    /// Attach login credentials.
    pub fn with_credentials(
        mut self,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.password = password.into();
        self
    }

    /// Engine location.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Login name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Login password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// What a task does, named by the engine-side objects it reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Prepare `input` into the transformed data set `output`
    /// (normalization and the like happen engine-side).
    Transform {
        /// Source data set name.
        input: String,
        /// Prepared data set name to create.
        output: String,
    },
    /// Build the model `model` from prepared `data` under named `settings`.
    Build {
        /// Prepared data set name.
        data: String,
        /// Build settings object name.
        settings: String,
        /// Model name to publish.
        model: String,
    },
    /// Apply `model` to prepared `data`, writing per-case scores to `output`.
    Apply {
        /// Prepared data set name.
        data: String,
        /// Model name to apply.
        model: String,
        /// Scoring output name to publish.
        output: String,
    },
}

/// A named unit of engine work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Task name, unique per session.
    pub name: String,
    /// What to run.
    pub kind: TaskKind,
}

impl TaskSpec {
    /// Name a task.
    pub fn new(name: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Handle to a submitted task, used for status polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub(crate) name: String,
}

impl TaskHandle {
    /// Name of the submitted task.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lifecycle state of a submitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// Still executing.
    Running,
    /// Finished and produced its outputs.
    Success,
    /// Finished without producing its outputs.
    Failure,
}

impl ExecutionState {
    /// True for every state except [`Running`](ExecutionState::Running).
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExecutionState::Running)
    }
}

/// Task state plus the engine's failure description, when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    /// Current lifecycle state.
    pub state: ExecutionState,
    /// Engine-supplied detail, normally present on failure.
    pub description: Option<String>,
}

impl ExecutionStatus {
    /// A successful terminal status.
    pub fn success() -> Self {
        Self {
            state: ExecutionState::Success,
            description: None,
        }
    }

    /// A failed terminal status with a description.
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            state: ExecutionState::Failure,
            description: Some(description.into()),
        }
    }
}

/// The collaborator surface a report pipeline assumes.
pub trait MiningEngine {
    /// Submit a task for execution.
    fn submit_task(&mut self, spec: TaskSpec) -> Result<TaskHandle>;

    /// Current status of a submitted task.
    fn task_status(&self, handle: &TaskHandle) -> Result<ExecutionStatus>;

    /// Retrieve a published model snapshot by name.
    fn retrieve_model(&self, name: &str) -> Result<ClusteringModel>;

    /// Per-cluster case counts of a scoring output, largest first.
    fn segment_counts(&self, output: &str) -> Result<Vec<SegmentCount>>;

    /// Highest-probability cases of one cluster in a scoring output.
    fn top_cases(
        &self,
        output: &str,
        cluster: ClusterId,
        limit: usize,
    ) -> Result<Vec<ScoredCase>>;
}

/// Submit `spec` and block until it reaches a terminal state.
///
/// Returns `Ok(true)` on success and `Ok(false)` on task failure, logging
/// the outcome either way. Engine errors propagate unchanged.
pub fn run_task(engine: &mut impl MiningEngine, spec: TaskSpec) -> Result<bool> {
    let task = spec.name.clone();
    info!(task = %task, "task started");
    let handle = engine.submit_task(spec)?;
    loop {
        let status = engine.task_status(&handle)?;
        match status.state {
            ExecutionState::Running => continue,
            ExecutionState::Success => {
                info!(task = %task, "task succeeded");
                return Ok(true);
            }
            ExecutionState::Failure => {
                let description = status.description.unwrap_or_default();
                warn!(task = %task, description = %description, "task failed");
                return Ok(false);
            }
        }
    }
}
