use proptest::prelude::*;
use thicket::model::{
    AttributeStatisticsSet, ClusterId, ClusterSeed, ClusteringModel, CompoundPredicate, Interval,
    IntervalClosure, ModelBuilder, ModelSignature, Operator, Rule, RuleId, SimplePredicate,
    UnivariateStatistics,
};
use thicket::report::Report;
use thicket::sample;

fn closure_strategy() -> impl Strategy<Value = IntervalClosure> {
    prop_oneof![
        Just(IntervalClosure::OpenOpen),
        Just(IntervalClosure::OpenClosed),
        Just(IntervalClosure::ClosedOpen),
        Just(IntervalClosure::ClosedClosed),
    ]
}

/// One cluster, statistics attached, signature covering AGE and CAT.
fn single_cluster_model(stats: AttributeStatisticsSet) -> ClusteringModel {
    ModelBuilder::new("prop")
        .with_signature(
            ModelSignature::new()
                .with_numerical("AGE")
                .with_categorical("CAT"),
        )
        .with_cluster(
            ClusterSeed::new(ClusterId(1))
                .with_case_count(10)
                .with_statistics(stats),
        )
        .build()
        .unwrap()
}

/// Root plus one leaf child carrying `rule`, so the hierarchy walk renders
/// the full rule block.
fn leaf_rule_model(rule: Rule) -> ClusteringModel {
    ModelBuilder::new("prop")
        .with_rule(rule)
        .with_cluster(ClusterSeed::new(ClusterId(1)).with_case_count(10))
        .with_cluster(
            ClusterSeed::new(ClusterId(2))
                .with_parent(ClusterId(1))
                .with_case_count(10)
                .with_rule(RuleId(1)),
        )
        .build()
        .unwrap()
}

/// Complete tree: one root, `branching` children per node, `depth` levels
/// below the root.
fn complete_tree(depth: u32, branching: usize) -> ClusteringModel {
    let mut builder = ModelBuilder::new("tree")
        .with_cluster(ClusterSeed::new(ClusterId(1)).with_case_count(100));
    let mut next = 2u32;
    let mut frontier = vec![1u32];
    for _ in 0..depth {
        let mut grown = Vec::new();
        for parent in frontier {
            for _ in 0..branching {
                builder = builder.with_cluster(
                    ClusterSeed::new(ClusterId(next))
                        .with_parent(ClusterId(parent))
                        .with_case_count(10),
                );
                grown.push(next);
                next += 1;
            }
        }
        frontier = grown;
    }
    builder.build().unwrap()
}

fn hierarchy_section(report: &str) -> &str {
    let at = report.find("Cluster hierarchy").expect("hierarchy banner");
    &report[at..]
}

fn indent_units(line: &str) -> usize {
    (line.len() - line.trim_start_matches(' ').len()) / 4
}

/// Raw lines directly under the first occurrence of `label`, up to the
/// next blank line or predicate label.
fn lines_under<'a>(text: &'a str, label: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut take = false;
    for line in text.lines() {
        let trimmed = line.trim_start();
        if take {
            if trimmed.is_empty() || trimmed == "Antecedent:" || trimmed == "Consequent:" {
                break;
            }
            out.push(line);
        } else if trimmed == label {
            take = true;
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_frequencies_render_truncated(
        frequencies in prop::collection::vec(0.0f64..1e6, 1..6)
    ) {
        let values: Vec<String> = (0..frequencies.len()).map(|i| format!("V{i}")).collect();
        let stats = AttributeStatisticsSet::new().with(UnivariateStatistics::categorical(
            "CAT",
            values.clone(),
            frequencies.clone(),
        ));
        let text = Report::new().render(&single_cluster_model(stats));

        for (i, frequency) in frequencies.iter().enumerate() {
            let row = format!("{:<8}{:<22}{}", i + 1, values[i], *frequency as i64);
            prop_assert!(
                text.contains(&row),
                "missing row {:?} in:\n{}", row, text
            );
        }
    }

    #[test]
    fn prop_interval_brackets_follow_the_closure_table(
        start in -1e3f64..1e3,
        end in -1e3f64..1e3,
        closure in closure_strategy()
    ) {
        let stats = AttributeStatisticsSet::new().with(UnivariateStatistics::numerical(
            "AGE",
            vec![Interval::new(start, end, closure)],
            vec![1.0],
        ));
        let text = Report::new().render(&single_cluster_model(stats));

        let (open, close) = match closure {
            IntervalClosure::OpenOpen => ("( ", " )"),
            IntervalClosure::OpenClosed => ("( ", " ]"),
            IntervalClosure::ClosedOpen => ("[ ", " )"),
            IntervalClosure::ClosedClosed => ("[ ", " ]"),
        };
        let range = format!("{open}{start} - {end}{close}");
        prop_assert!(text.contains(&range), "missing range {:?}", range);
    }

    #[test]
    fn prop_consequent_joins_all_but_the_last_line(n in 1usize..6) {
        let consequent: CompoundPredicate = (0..n)
            .map(|i| SimplePredicate::numerical(format!("C{i}"), Operator::Eq, i as f64))
            .collect();
        let rule = Rule::new(RuleId(1), 0.5, 0.9, CompoundPredicate::new(), consequent);
        let text = Report::new().render(&leaf_rule_model(rule));

        let lines = lines_under(&text, "Consequent:");
        prop_assert_eq!(lines.len(), n);
        for (i, line) in lines.iter().enumerate() {
            if i + 1 < n {
                prop_assert!(line.ends_with(" AND "), "line {:?} lacks joiner", line);
            } else {
                prop_assert!(!line.ends_with(" AND "), "last line {:?} has joiner", line);
            }
        }
    }

    #[test]
    fn prop_antecedent_groups_by_attribute_and_survives_malformed_siblings(
        k in 2usize..5
    ) {
        let mut antecedent = CompoundPredicate::new();
        for i in 0..k {
            antecedent.push(SimplePredicate::categorical(
                "REGION",
                Operator::Eq,
                vec![format!("V{i}")],
            ));
        }
        antecedent.push(SimplePredicate::categorical(
            "BROKEN",
            Operator::In,
            Vec::<String>::new(),
        ));
        antecedent.push(SimplePredicate::numerical("BAD", Operator::LessThan, f64::NAN));
        antecedent.push(SimplePredicate::numerical("OTHER", Operator::GreaterOrEq, 1.5));

        let rule = Rule::new(RuleId(1), 0.5, 0.9, antecedent, CompoundPredicate::new());
        let text = Report::new().render(&leaf_rule_model(rule));

        let lines = lines_under(&text, "Antecedent:");
        let clauses: Vec<&str> = lines.iter().map(|line| line.trim_start()).collect();

        // One line per surviving attribute, in no promised order.
        prop_assert_eq!(clauses.len(), 2);
        let region = clauses
            .iter()
            .find(|clause| clause.starts_with("REGION"))
            .expect("REGION clause");
        prop_assert_eq!(region.matches(" AND ").count(), k - 1);
        prop_assert!(clauses.iter().any(|clause| *clause == "OTHER >= 1.5"));
        prop_assert!(!text.contains("BROKEN"));
        prop_assert!(!text.contains("BAD"));
    }

    #[test]
    fn prop_walk_depth_tracks_tree_level(
        depth in 1u32..4,
        branching in 1usize..3
    ) {
        let model = complete_tree(depth, branching);
        let text = Report::new().with_first_leaf_statistics(false).render(&model);
        let section = hierarchy_section(&text);

        for cluster in model.clusters() {
            if cluster.is_root() {
                continue;
            }
            let marker = format!("Cluster Id: {}", cluster.id);
            let hits: Vec<&str> = section
                .lines()
                .filter(|line| line.trim_start() == marker)
                .collect();
            prop_assert_eq!(hits.len(), 1, "cluster {} not visited exactly once", cluster.id);
            prop_assert_eq!(indent_units(hits[0]), cluster.level as usize);
        }
    }

    #[test]
    fn prop_builder_models_uphold_structural_invariants(seed in any::<u64>()) {
        let model = sample::demo_model("km_prop", seed).unwrap();
        prop_assert!(model.validate().is_ok());
        for cluster in model.clusters() {
            prop_assert_eq!(cluster.ancestors.len(), cluster.level as usize);
            prop_assert_eq!(cluster.is_leaf(), cluster.children.is_empty());
            prop_assert_eq!(cluster.is_root(), cluster.parent.is_none());
        }
        prop_assert_eq!(
            model.number_of_clusters(),
            model.leaf_clusters().count()
        );
    }

    #[test]
    fn prop_render_is_idempotent(seed in any::<u64>()) {
        let model = sample::demo_model("km_prop", seed).unwrap();
        let report = Report::new();
        prop_assert_eq!(report.render(&model), report.render(&model));
    }
}
