//! Build, apply and report a clustering model against the in-memory engine.

use thicket::engine::{run_task, ConnectionSpec, MemoryEngine, MiningEngine, TaskKind, TaskSpec};
use thicket::report::{render_segment_counts, render_top_cases, Report};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let spec = ConnectionSpec::new("mem://demo").with_credentials("dmuser", "dmuser");
    let mut engine = MemoryEngine::connect(&spec).with_seed(42);
    engine.clear();

    // --- Prepare both data sets, build, then apply ---
    let steps = [
        TaskSpec::new(
            "prepare_build_data",
            TaskKind::Transform {
                input: "MINING_DATA_BUILD_V".into(),
                output: "KM_NORM_DATA_BUILD".into(),
            },
        ),
        TaskSpec::new(
            "prepare_apply_data",
            TaskKind::Transform {
                input: "MINING_DATA_APPLY_V".into(),
                output: "KM_NORM_DATA_APPLY".into(),
            },
        ),
        TaskSpec::new(
            "build_model",
            TaskKind::Build {
                data: "KM_NORM_DATA_BUILD".into(),
                settings: "km_settings".into(),
                model: "km_model".into(),
            },
        ),
        TaskSpec::new(
            "apply_model",
            TaskKind::Apply {
                data: "KM_NORM_DATA_APPLY".into(),
                model: "km_model".into(),
                output: "km_apply_output".into(),
            },
        ),
    ];
    for step in steps {
        let name = step.name.clone();
        let ok = run_task(&mut engine, step).unwrap();
        assert!(ok, "task {name} failed");
    }

    // --- Model report ---
    let model = engine.retrieve_model("km_model").unwrap();
    print!("{}", Report::new().render(&model));

    // --- Scoring summary ---
    let counts = engine.segment_counts("km_apply_output").unwrap();
    println!("\n=== Cases per cluster ===");
    print!("{}", render_segment_counts(&counts));

    if let Some(widest) = counts.first() {
        let cases = engine
            .top_cases("km_apply_output", widest.cluster, 10)
            .unwrap();
        println!("\n=== Top cases of cluster {} ===", widest.cluster);
        print!("{}", render_top_cases(&cases));
    }
}
