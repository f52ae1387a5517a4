//! In-process [`MiningEngine`] for tests, benches and demos.
//!
//! Tasks complete at submission time: `Transform` registers its output as a
//! prepared data set, `Build` publishes a deterministic sample model, and
//! `Apply` publishes deterministic scored rows. A task whose inputs are
//! missing fails with a descriptive status (so `run_task` reports
//! `Ok(false)`, as a real engine would); asking for an object that was
//! never published is an [`Error::UnknownObject`].

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::engine::{
    ConnectionSpec, ExecutionStatus, MiningEngine, TaskHandle, TaskKind, TaskSpec,
};
use crate::error::{Error, Result};
use crate::model::{ClusterId, ClusteringModel};
use crate::report::{ScoredCase, SegmentCount};
use crate::sample;

const DEFAULT_SEED: u64 = 42;
const APPLY_CASES: usize = 100;

/// In-memory engine session.
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    session: String,
    seed: u64,
    prepared: HashSet<String>,
    models: HashMap<String, ClusteringModel>,
    scores: HashMap<String, Vec<(u64, ClusterId, f64)>>,
    tasks: HashMap<String, ExecutionStatus>,
}

impl MemoryEngine {
    /// Open a session. Never fails: there is no remote engine to refuse us.
    pub fn connect(spec: &ConnectionSpec) -> Self {
        debug!(session = %spec.name(), uri = %spec.uri(), "opened in-memory session");
        Self {
            session: spec.name().to_string(),
            seed: DEFAULT_SEED,
            prepared: HashSet::new(),
            models: HashMap::new(),
            scores: HashMap::new(),
            tasks: HashMap::new(),
        }
    }

    /// Seed for the published sample model and scores.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Publish a model ahead of time, keyed by its own name.
    pub fn with_model(mut self, model: ClusteringModel) -> Self {
        self.models.insert(model.name().to_string(), model);
        self
    }

    /// Login name this session was opened with.
    pub fn session(&self) -> &str {
        &self.session
    }

    /// Drop every published object and task record.
    pub fn clear(&mut self) {
        self.prepared.clear();
        self.models.clear();
        self.scores.clear();
        self.tasks.clear();
    }

    fn score_rows(&self, output: &str) -> Result<&Vec<(u64, ClusterId, f64)>> {
        self.scores.get(output).ok_or_else(|| Error::UnknownObject {
            name: output.to_string(),
        })
    }

    fn execute(&mut self, kind: &TaskKind) -> ExecutionStatus {
        match kind {
            TaskKind::Transform { input, output } => {
                if input.is_empty() || output.is_empty() {
                    return ExecutionStatus::failure("transform needs input and output names");
                }
                self.prepared.insert(output.clone());
                ExecutionStatus::success()
            }
            TaskKind::Build {
                data,
                settings: _,
                model,
            } => {
                if !self.prepared.contains(data) {
                    return ExecutionStatus::failure(format!("data set {data} is not prepared"));
                }
                match sample::demo_model(model, self.seed) {
                    Ok(built) => {
                        self.models.insert(model.clone(), built);
                        ExecutionStatus::success()
                    }
                    Err(err) => ExecutionStatus::failure(err.to_string()),
                }
            }
            TaskKind::Apply {
                data,
                model,
                output,
            } => {
                if !self.prepared.contains(data) {
                    return ExecutionStatus::failure(format!("data set {data} is not prepared"));
                }
                let Some(published) = self.models.get(model) else {
                    return ExecutionStatus::failure(format!("model {model} is not published"));
                };
                let rows = sample::apply_rows(self.seed, APPLY_CASES, published);
                self.scores.insert(output.clone(), rows);
                ExecutionStatus::success()
            }
        }
    }
}

impl MiningEngine for MemoryEngine {
    fn submit_task(&mut self, spec: TaskSpec) -> Result<TaskHandle> {
        debug!(task = %spec.name, session = %self.session, "executing task in process");
        let status = self.execute(&spec.kind);
        self.tasks.insert(spec.name.clone(), status);
        Ok(TaskHandle { name: spec.name })
    }

    fn task_status(&self, handle: &TaskHandle) -> Result<ExecutionStatus> {
        self.tasks
            .get(handle.name())
            .cloned()
            .ok_or_else(|| Error::UnknownObject {
                name: handle.name().to_string(),
            })
    }

    fn retrieve_model(&self, name: &str) -> Result<ClusteringModel> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownObject {
                name: name.to_string(),
            })
    }

    fn segment_counts(&self, output: &str) -> Result<Vec<SegmentCount>> {
        let rows = self.score_rows(output)?;
        let mut counts: HashMap<ClusterId, u64> = HashMap::new();
        for &(_, cluster, _) in rows {
            *counts.entry(cluster).or_insert(0) += 1;
        }
        let mut table: Vec<SegmentCount> = counts
            .into_iter()
            .map(|(cluster, count)| SegmentCount { cluster, count })
            .collect();
        table.sort_by(|a, b| b.count.cmp(&a.count).then(a.cluster.cmp(&b.cluster)));
        Ok(table)
    }

    fn top_cases(
        &self,
        output: &str,
        cluster: ClusterId,
        limit: usize,
    ) -> Result<Vec<ScoredCase>> {
        let rows = self.score_rows(output)?;
        let mut cases: Vec<ScoredCase> = rows
            .iter()
            .filter(|&&(_, assigned, _)| assigned == cluster)
            .map(|&(case_id, _, probability)| ScoredCase {
                case_id,
                probability,
            })
            .collect();
        cases.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then(a.case_id.cmp(&b.case_id))
        });
        cases.truncate(limit);
        Ok(cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_task;

    fn engine() -> MemoryEngine {
        let spec = ConnectionSpec::new("mem://test").with_credentials("dmuser", "dmuser");
        MemoryEngine::connect(&spec).with_seed(7)
    }

    fn transform(input: &str, output: &str) -> TaskSpec {
        TaskSpec::new(
            format!("prepare_{output}"),
            TaskKind::Transform {
                input: input.to_string(),
                output: output.to_string(),
            },
        )
    }

    #[test]
    fn full_pipeline_builds_applies_and_reports() {
        let mut engine = engine();
        assert!(run_task(&mut engine, transform("BUILD_V", "BUILD_PREP")).unwrap());
        assert!(run_task(&mut engine, transform("APPLY_V", "APPLY_PREP")).unwrap());
        assert!(run_task(
            &mut engine,
            TaskSpec::new(
                "build",
                TaskKind::Build {
                    data: "BUILD_PREP".into(),
                    settings: "km_settings".into(),
                    model: "km_model".into(),
                },
            ),
        )
        .unwrap());
        assert!(run_task(
            &mut engine,
            TaskSpec::new(
                "apply",
                TaskKind::Apply {
                    data: "APPLY_PREP".into(),
                    model: "km_model".into(),
                    output: "scores".into(),
                },
            ),
        )
        .unwrap());

        let model = engine.retrieve_model("km_model").unwrap();
        assert_eq!(model.name(), "km_model");
        assert!(model.validate().is_ok());

        let counts = engine.segment_counts("scores").unwrap();
        let total: u64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, APPLY_CASES as u64);
        assert!(counts.windows(2).all(|w| w[0].count >= w[1].count));

        let best = counts[0].cluster;
        let cases = engine.top_cases("scores", best, 10).unwrap();
        assert!(cases.len() <= 10);
        assert!(cases
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn build_on_unprepared_data_fails_the_task() {
        let mut engine = engine();
        let ok = run_task(
            &mut engine,
            TaskSpec::new(
                "build",
                TaskKind::Build {
                    data: "MISSING".into(),
                    settings: "s".into(),
                    model: "m".into(),
                },
            ),
        )
        .unwrap();
        assert!(!ok);
        assert!(engine.retrieve_model("m").is_err());
    }

    #[test]
    fn unknown_objects_are_reported_by_name() {
        let engine = engine();
        let err = engine.segment_counts("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownObject { name } if name == "nope"));
    }

    #[test]
    fn clear_drops_published_objects() {
        let mut engine = engine();
        run_task(&mut engine, transform("BUILD_V", "PREP")).unwrap();
        run_task(
            &mut engine,
            TaskSpec::new(
                "build",
                TaskKind::Build {
                    data: "PREP".into(),
                    settings: "s".into(),
                    model: "m".into(),
                },
            ),
        )
        .unwrap();
        assert!(engine.retrieve_model("m").is_ok());
        engine.clear();
        assert!(engine.retrieve_model("m").is_err());
    }

    #[test]
    fn same_seed_publishes_the_same_model_and_scores() {
        let run = |seed: u64| {
            let spec = ConnectionSpec::new("mem://test");
            let mut engine = MemoryEngine::connect(&spec).with_seed(seed);
            run_task(&mut engine, transform("BUILD_V", "PREP")).unwrap();
            run_task(
                &mut engine,
                TaskSpec::new(
                    "build",
                    TaskKind::Build {
                        data: "PREP".into(),
                        settings: "s".into(),
                        model: "m".into(),
                    },
                ),
            )
            .unwrap();
            run_task(
                &mut engine,
                TaskSpec::new(
                    "apply",
                    TaskKind::Apply {
                        data: "PREP".into(),
                        model: "m".into(),
                        output: "scores".into(),
                    },
                ),
            )
            .unwrap();
            (
                engine.retrieve_model("m").unwrap(),
                engine.segment_counts("scores").unwrap(),
            )
        };

        let (model_a, counts_a) = run(11);
        let (model_b, counts_b) = run(11);
        assert_eq!(model_a, model_b);
        assert_eq!(counts_a, counts_b);
    }
}
