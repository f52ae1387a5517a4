//! Deterministic sample model and scoring rows.
//!
//! Stands in for an engine-side demo schema: a customer data set with two
//! numerical attributes (AGE, YRS_RESIDENCE, already normalized to [0, 1]
//! by the engine's preparation step) and four categorical ones
//! (CUST_GENDER, OCCUPATION, HOUSEHOLD_SIZE, AFFINITY_CARD).
//!
//! [`demo_model`] grows a k-Means style split tree: starting from one root
//! holding every case, it repeatedly splits the widest unsplit cluster on
//! an alternating numerical attribute until there are ten leaves (nineteen
//! clusters). Each leaf carries a rule whose antecedent is its split path
//! and whose consequent names the leaf; every cluster carries binned
//! statistics. All counts, thresholds and frequencies come from one seeded
//! generator, so a seed fixes the model exactly.

use std::cmp::Reverse;

use rand::prelude::*;

use crate::error::Result;
use crate::model::{
    AttributeStatisticsSet, ClusterId, ClusterSeed, ClusteringModel, CompoundPredicate, Interval,
    IntervalClosure, ModelBuilder, ModelSignature, Operator, Rule, RuleId, SimplePredicate,
    UnivariateStatistics,
};

const LEAVES: usize = 10;
const ROOT_CASES: u64 = 1500;

const NUMERICAL: [&str; 2] = ["AGE", "YRS_RESIDENCE"];
const GENDERS: [&str; 2] = ["F", "M"];
const OCCUPATIONS: [&str; 5] = ["Cleric.", "Crafts", "Exec.", "Prof.", "Sales"];
const HOUSEHOLD_SIZES: [&str; 6] = ["1", "2", "3", "4-5", "6-8", "9+"];
const AFFINITY_CARD: [&str; 2] = ["0", "1"];

struct Node {
    id: ClusterId,
    parent: Option<ClusterId>,
    level: u32,
    cases: u64,
    path: Vec<SimplePredicate>,
    split: bool,
}

/// The demo signature: attribute names and kinds of the sample schema.
pub fn demo_signature() -> ModelSignature {
    ModelSignature::new()
        .with_numerical("AGE")
        .with_numerical("YRS_RESIDENCE")
        .with_categorical("CUST_GENDER")
        .with_categorical("OCCUPATION")
        .with_categorical("HOUSEHOLD_SIZE")
        .with_categorical("AFFINITY_CARD")
}

/// A seeded ten-leaf clustering model named `name`.
pub fn demo_model(name: &str, seed: u64) -> Result<ClusteringModel> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut nodes = vec![Node {
        id: ClusterId(1),
        parent: None,
        level: 0,
        cases: ROOT_CASES,
        path: Vec::new(),
        split: false,
    }];
    let mut next_id = 2u32;
    let mut leaves = 1usize;

    while leaves < LEAVES {
        // Split the widest unsplit cluster; earliest wins ties.
        let target = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.split)
            .max_by_key(|(i, node)| (node.cases, Reverse(*i)))
            .map(|(i, _)| i);
        let target = match target {
            Some(target) => target,
            None => break,
        };

        let attribute = NUMERICAL[nodes[target].level as usize % NUMERICAL.len()];
        let threshold = round2(rng.random_range(0.25..0.75));
        let fraction = rng.random_range(0.35..0.65);
        let left_cases = (nodes[target].cases as f64 * fraction) as u64;
        let right_cases = nodes[target].cases - left_cases;

        let parent = nodes[target].id;
        let level = nodes[target].level + 1;
        let path = nodes[target].path.clone();
        nodes[target].split = true;

        let mut left_path = path.clone();
        left_path.push(SimplePredicate::numerical(
            attribute,
            Operator::LessOrEq,
            threshold,
        ));
        nodes.push(Node {
            id: ClusterId(next_id),
            parent: Some(parent),
            level,
            cases: left_cases,
            path: left_path,
            split: false,
        });

        let mut right_path = path;
        right_path.push(SimplePredicate::numerical(
            attribute,
            Operator::GreaterThan,
            threshold,
        ));
        nodes.push(Node {
            id: ClusterId(next_id + 1),
            parent: Some(parent),
            level,
            cases: right_cases,
            path: right_path,
            split: false,
        });

        next_id += 2;
        leaves += 1;
    }

    let mut builder = ModelBuilder::new(name).with_signature(demo_signature());

    for node in nodes.iter().filter(|node| !node.split) {
        let mut antecedent = CompoundPredicate::from(node.path.clone());
        antecedent.push(SimplePredicate::categorical(
            "OCCUPATION",
            Operator::In,
            pick_occupations(&mut rng),
        ));
        let consequent = CompoundPredicate::new().with(SimplePredicate::numerical(
            "CLUSTER_ID",
            Operator::Eq,
            f64::from(node.id.0),
        ));
        builder = builder.with_rule(Rule::new(
            RuleId(node.id.0),
            round4(node.cases as f64 / ROOT_CASES as f64),
            round4(rng.random_range(0.55..0.95)),
            antecedent,
            consequent,
        ));
    }

    for node in &nodes {
        let mut seed = ClusterSeed::new(node.id)
            .with_case_count(node.cases)
            .with_dispersion(round4(rng.random_range(0.05..0.45)))
            .with_statistics(demo_statistics(&mut rng, node.cases));
        if let Some(parent) = node.parent {
            seed = seed.with_parent(parent);
        }
        if !node.split {
            seed = seed.with_rule(RuleId(node.id.0));
        }
        builder = builder.with_cluster(seed);
    }

    builder.build()
}

/// Seeded apply output for `model`: `(case id, best cluster, probability)`
/// rows over the model's leaves.
pub fn apply_rows(seed: u64, cases: usize, model: &ClusteringModel) -> Vec<(u64, ClusterId, f64)> {
    let leaves: Vec<ClusterId> = model.leaf_clusters().map(|cluster| cluster.id).collect();
    if leaves.is_empty() {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..cases)
        .map(|i| {
            let case_id = 100_001 + i as u64;
            let cluster = leaves[rng.random_range(0..leaves.len())];
            let probability = round4(rng.random_range(0.5..1.0));
            (case_id, cluster, probability)
        })
        .collect()
}

fn demo_statistics(rng: &mut StdRng, cases: u64) -> AttributeStatisticsSet {
    let mut set = AttributeStatisticsSet::new();
    for attribute in NUMERICAL {
        // Five equal bins over the normalized range, last one closed.
        let intervals: Vec<Interval> = (0..5)
            .map(|i| {
                let start = round2(i as f64 * 0.2);
                let end = round2(start + 0.2);
                let closure = if i == 4 {
                    IntervalClosure::ClosedClosed
                } else {
                    IntervalClosure::ClosedOpen
                };
                Interval::new(start, end, closure)
            })
            .collect();
        let frequencies = partition(rng, cases, intervals.len());
        set.push(UnivariateStatistics::numerical(
            attribute, intervals, frequencies,
        ));
    }
    set.push(UnivariateStatistics::categorical(
        "CUST_GENDER",
        GENDERS.to_vec(),
        partition(rng, cases, GENDERS.len()),
    ));
    set.push(UnivariateStatistics::categorical(
        "OCCUPATION",
        OCCUPATIONS.to_vec(),
        partition(rng, cases, OCCUPATIONS.len()),
    ));
    set.push(UnivariateStatistics::categorical(
        "HOUSEHOLD_SIZE",
        HOUSEHOLD_SIZES.to_vec(),
        partition(rng, cases, HOUSEHOLD_SIZES.len()),
    ));
    set.push(UnivariateStatistics::categorical(
        "AFFINITY_CARD",
        AFFINITY_CARD.to_vec(),
        partition(rng, cases, AFFINITY_CARD.len()),
    ));
    set
}

/// Split `total` cases over `parts` bins with jittered weights. The parts
/// keep fractional remainders, as engine frequencies do.
fn partition(rng: &mut StdRng, total: u64, parts: usize) -> Vec<f64> {
    let weights: Vec<f64> = (0..parts).map(|_| rng.random_range(0.5..1.5)).collect();
    let sum: f64 = weights.iter().sum();
    weights
        .iter()
        .map(|weight| round2(total as f64 * weight / sum))
        .collect()
}

fn pick_occupations(rng: &mut StdRng) -> Vec<&'static str> {
    let start = rng.random_range(0..OCCUPATIONS.len() - 1);
    vec![OCCUPATIONS[start], OCCUPATIONS[start + 1]]
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
