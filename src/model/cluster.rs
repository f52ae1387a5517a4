//! The cluster arena: an owned snapshot of one clustering model.
//!
//! Clusters live in a flat, insertion-ordered arena and refer to each other
//! by [`ClusterId`] only. Parent, ancestor and child links are lookups into
//! the arena, never owning references, so the whole model is a plain value:
//! clone it, send it, drop it, no graph-ownership knots.
//!
//! Two construction paths with different guarantees:
//!
//! - [`ModelBuilder`] derives levels, ancestor chains and child lists from
//!   parent declarations and rejects structural defects, so builder output
//!   always passes [`ClusteringModel::validate`].
//! - [`ClusteringModel::from_parts`] accepts engine-shaped data unchecked.
//!   Snapshots pulled from a live engine are not guaranteed well formed, and
//!   the report renderer is required to tolerate dangling links and
//!   mismatched statistics rather than refuse the whole model.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::rule::{Rule, RuleId};
use crate::model::signature::ModelSignature;
use crate::model::stats::AttributeStatisticsSet;

/// Identifier of a cluster within one model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate so width and alignment flags reach the number.
        self.0.fmt(f)
    }
}

/// One node of the cluster tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Identifier, unique within the model.
    pub id: ClusterId,
    /// Number of training cases assigned to this cluster.
    pub case_count: u64,
    /// Depth in the tree; the root sits at level 0.
    pub level: u32,
    /// Within-cluster dispersion reported by the engine.
    pub dispersion: f64,
    /// Parent cluster, absent for a root. May dangle in raw snapshots.
    pub parent: Option<ClusterId>,
    /// Ancestor chain in root-to-parent order.
    pub ancestors: Vec<ClusterId>,
    /// Child clusters in split order.
    pub children: Vec<ClusterId>,
    /// Decision rule, present for leaves. May dangle in raw snapshots.
    pub rule: Option<RuleId>,
    /// Per-attribute centroid statistics, when the engine exported them.
    pub statistics: Option<AttributeStatisticsSet>,
}

impl Cluster {
    /// True when this cluster has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True when this cluster has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An owned clustering-model snapshot: cluster arena, rule table, signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringModel {
    name: String,
    clusters: Vec<Cluster>,
    cluster_index: HashMap<ClusterId, usize>,
    rules: Vec<Rule>,
    rule_index: HashMap<RuleId, usize>,
    signature: ModelSignature,
}

impl ClusteringModel {
    /// Assemble a model from raw parts, without structural checks.
    ///
    /// Lookup keeps the first occurrence of a duplicated id;
    /// [`validate`](Self::validate) reports such defects when asked.
    pub fn from_parts(
        name: impl Into<String>,
        clusters: Vec<Cluster>,
        rules: Vec<Rule>,
        signature: ModelSignature,
    ) -> Self {
        let mut cluster_index = HashMap::with_capacity(clusters.len());
        for (i, cluster) in clusters.iter().enumerate() {
            cluster_index.entry(cluster.id).or_insert(i);
        }
        let mut rule_index = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            rule_index.entry(rule.id).or_insert(i);
        }
        Self {
            name: name.into(),
            clusters,
            cluster_index,
            rules,
            rule_index,
            signature,
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate all clusters in arena (insertion) order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    /// Look up a cluster by id.
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.cluster_index.get(&id).map(|&i| &self.clusters[i])
    }

    /// Iterate parentless clusters in arena order.
    pub fn root_clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| c.is_root())
    }

    /// The first parentless cluster, if any.
    pub fn root(&self) -> Option<&Cluster> {
        self.root_clusters().next()
    }

    /// Iterate childless clusters in arena order.
    pub fn leaf_clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| c.is_leaf())
    }

    /// Iterate rules in table order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rule_index.get(&id).map(|&i| &self.rules[i])
    }

    /// The model signature.
    pub fn signature(&self) -> &ModelSignature {
        &self.signature
    }

    /// True when the arena holds no clusters at all.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of clusters in the engine's sense: the leaf count.
    ///
    /// Interior nodes are split bookkeeping; `k` is the number of leaves.
    pub fn number_of_clusters(&self) -> usize {
        self.leaf_clusters().count()
    }

    /// Number of tree levels: deepest level + 1, or 0 for an empty model.
    pub fn number_of_levels(&self) -> u32 {
        self.clusters
            .iter()
            .map(|c| c.level + 1)
            .max()
            .unwrap_or(0)
    }

    /// True when the model spans more than one level.
    pub fn is_hierarchical(&self) -> bool {
        self.number_of_levels() > 1
    }

    /// Check structural invariants, returning the first violation.
    ///
    /// Checks ids for uniqueness, parent/child links for existence and
    /// two-way agreement, ancestor chains against levels and parent chains,
    /// root count in hierarchical models, rule references, and statistics
    /// bin/frequency parallelism.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.clusters.len());
        for cluster in &self.clusters {
            if !seen.insert(cluster.id) {
                return Err(Error::DuplicateCluster { id: cluster.id });
            }
        }

        let mut seen_rules = HashSet::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !seen_rules.insert(rule.id) {
                return Err(Error::DuplicateRule { id: rule.id });
            }
        }

        for cluster in &self.clusters {
            self.validate_links(cluster)?;

            if cluster.ancestors.len() != cluster.level as usize {
                return Err(Error::AncestryMismatch {
                    id: cluster.id,
                    found: cluster.ancestors.len(),
                    level: cluster.level,
                });
            }

            if let Some(rule_id) = cluster.rule {
                if self.rule(rule_id).is_none() {
                    return Err(Error::UnknownRule {
                        id: cluster.id,
                        rule: rule_id,
                    });
                }
            }

            if let Some(stats) = &cluster.statistics {
                for entry in stats.iter() {
                    if entry.bins.len() != entry.frequencies.len() {
                        return Err(Error::BinFrequencyMismatch {
                            id: cluster.id,
                            attribute: entry.attribute.clone(),
                            bins: entry.bins.len(),
                            frequencies: entry.frequencies.len(),
                        });
                    }
                }
            }
        }

        if self.is_hierarchical() {
            let roots = self.root_clusters().count();
            if roots != 1 {
                return Err(Error::RootCount { found: roots });
            }
        }

        Ok(())
    }

    fn validate_links(&self, cluster: &Cluster) -> Result<()> {
        match cluster.parent {
            None => {
                if !cluster.ancestors.is_empty() {
                    return Err(Error::InvalidLink {
                        id: cluster.id,
                        message: "parentless cluster carries an ancestor chain",
                    });
                }
            }
            Some(parent_id) => {
                let parent = self.cluster(parent_id).ok_or(Error::UnknownParent {
                    id: cluster.id,
                    parent: parent_id,
                })?;
                if cluster.level != parent.level + 1 {
                    return Err(Error::InvalidLink {
                        id: cluster.id,
                        message: "level is not one below its parent",
                    });
                }
                if cluster.ancestors.last() != Some(&parent_id) {
                    return Err(Error::InvalidLink {
                        id: cluster.id,
                        message: "ancestor chain does not end at the parent",
                    });
                }
                let chain_head = &cluster.ancestors[..cluster.ancestors.len() - 1];
                if chain_head != parent.ancestors.as_slice() {
                    return Err(Error::InvalidLink {
                        id: cluster.id,
                        message: "ancestor chain disagrees with the parent's",
                    });
                }
                if !parent.children.contains(&cluster.id) {
                    return Err(Error::InvalidLink {
                        id: cluster.id,
                        message: "missing from its parent's child list",
                    });
                }
            }
        }

        for &child_id in &cluster.children {
            let child = self.cluster(child_id).ok_or(Error::InvalidLink {
                id: cluster.id,
                message: "child list names a cluster not in the model",
            })?;
            if child.parent != Some(cluster.id) {
                return Err(Error::InvalidLink {
                    id: cluster.id,
                    message: "child does not link back to this cluster",
                });
            }
        }

        Ok(())
    }
}

/// Declaration of one cluster for [`ModelBuilder`].
///
/// Level, ancestors and children are not declared; the builder derives them
/// from the parent link.
#[derive(Debug, Clone)]
pub struct ClusterSeed {
    id: ClusterId,
    case_count: u64,
    dispersion: f64,
    parent: Option<ClusterId>,
    rule: Option<RuleId>,
    statistics: Option<AttributeStatisticsSet>,
}

impl ClusterSeed {
    /// Declare a cluster with the given id.
    pub fn new(id: ClusterId) -> Self {
        Self {
            id,
            case_count: 0,
            dispersion: 0.0,
            parent: None,
            rule: None,
            statistics: None,
        }
    }

    /// Set the assigned-case count.
    pub fn with_case_count(mut self, case_count: u64) -> Self {
        self.case_count = case_count;
        self
    }

    /// Set the dispersion.
    pub fn with_dispersion(mut self, dispersion: f64) -> Self {
        self.dispersion = dispersion;
        self
    }

    /// Link to a parent declared earlier in the build sequence.
    pub fn with_parent(mut self, parent: ClusterId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Attach a rule by id.
    pub fn with_rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Attach per-attribute statistics.
    pub fn with_statistics(mut self, statistics: AttributeStatisticsSet) -> Self {
        self.statistics = Some(statistics);
        self
    }
}

/// Checked construction of a [`ClusteringModel`].
///
/// Clusters are declared top-down: a seed's parent must already have been
/// declared, which fixes levels and ancestor chains and makes parent cycles
/// unrepresentable. [`build`](Self::build) runs the full
/// [`validate`](ClusteringModel::validate) before handing the model out.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    seeds: Vec<ClusterSeed>,
    rules: Vec<Rule>,
    signature: ModelSignature,
}

impl ModelBuilder {
    /// Start a model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seeds: Vec::new(),
            rules: Vec::new(),
            signature: ModelSignature::new(),
        }
    }

    /// Set the model signature.
    pub fn with_signature(mut self, signature: ModelSignature) -> Self {
        self.signature = signature;
        self
    }

    /// Add a rule to the rule table.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Declare a cluster. Parents must be declared before their children.
    pub fn with_cluster(mut self, seed: ClusterSeed) -> Self {
        self.seeds.push(seed);
        self
    }

    /// Derive the tree and hand out a validated model.
    pub fn build(self) -> Result<ClusteringModel> {
        let mut clusters: Vec<Cluster> = Vec::with_capacity(self.seeds.len());
        let mut index: HashMap<ClusterId, usize> = HashMap::with_capacity(self.seeds.len());

        for seed in self.seeds {
            if index.contains_key(&seed.id) {
                return Err(Error::DuplicateCluster { id: seed.id });
            }

            let (level, ancestors) = match seed.parent {
                None => (0, Vec::new()),
                Some(parent_id) => {
                    let &parent_ix = index.get(&parent_id).ok_or(Error::UnknownParent {
                        id: seed.id,
                        parent: parent_id,
                    })?;
                    let parent = &mut clusters[parent_ix];
                    parent.children.push(seed.id);
                    let mut chain = parent.ancestors.clone();
                    chain.push(parent_id);
                    (parent.level + 1, chain)
                }
            };

            index.insert(seed.id, clusters.len());
            clusters.push(Cluster {
                id: seed.id,
                case_count: seed.case_count,
                level,
                dispersion: seed.dispersion,
                parent: seed.parent,
                ancestors,
                children: Vec::new(),
                rule: seed.rule,
                statistics: seed.statistics,
            });
        }

        let model = ClusteringModel::from_parts(self.name, clusters, self.rules, self.signature);
        model.validate()?;
        Ok(model)
    }
}
