//! The model report: header, leaf details, rule listing, hierarchy walk.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::model::{Cluster, ClusterId, ClusteringModel};
use crate::report::rules::{rule_details, rule_summary};
use crate::report::stats::cluster_statistics;
use crate::report::util::{ReportBuffer, TAB, UNDERLINE};

/// Renders a [`ClusteringModel`] as an indented text report.
///
/// The report has four sections: a header (name, cluster and level counts,
/// root id), a leaf-cluster listing (with statistics tables for the first
/// leaf), a rule summary listing, and the cluster hierarchy. Hierarchical
/// models are walked depth-first from the root with one indent unit per
/// tree level; single-level or rootless models fall back to a flat listing.
///
/// Rendering is a pure function of the model snapshot: repeated calls yield
/// identical output, and data defects (dangling links, malformed predicates
/// or statistics) degrade to placeholder lines and warnings rather than
/// errors.
///
/// ```rust
/// use thicket::model::{ClusterId, ClusterSeed, ModelBuilder};
/// use thicket::report::Report;
///
/// let model = ModelBuilder::new("demo")
///     .with_cluster(ClusterSeed::new(ClusterId(1)).with_case_count(10))
///     .build()
///     .unwrap();
/// let text = Report::new().render(&model);
/// assert!(text.starts_with("Model Name: demo"));
/// ```
#[derive(Debug, Clone)]
pub struct Report {
    indent: String,
    first_leaf_statistics: bool,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            indent: TAB.to_string(),
            first_leaf_statistics: true,
        }
    }
}

impl Report {
    /// Report with default settings: four-space indent, statistics on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the indent unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Enable or disable the statistics tables for the first leaf cluster.
    pub fn with_first_leaf_statistics(mut self, enabled: bool) -> Self {
        self.first_leaf_statistics = enabled;
        self
    }

    /// Render the full report as a string.
    pub fn render(&self, model: &ClusteringModel) -> String {
        let mut out = String::new();
        // fmt::Write on a String is infallible.
        let _ = self.render_to(model, &mut out);
        out
    }

    /// Render the full report into a caller-provided sink.
    pub fn render_to<W: fmt::Write>(&self, model: &ClusteringModel, out: &mut W) -> fmt::Result {
        let mut buf = ReportBuffer::new(out, &self.indent);
        self.emit(model, &mut buf)
    }

    fn emit(&self, model: &ClusteringModel, buf: &mut ReportBuffer<'_>) -> fmt::Result {
        debug!(model = %model.name(), "rendering model report");
        buf.line(0, format!("Model Name: {}", model.name()))?;
        buf.line(0, "Clustering model details:")?;
        buf.line(
            1,
            format!("Number of clusters: {}", model.number_of_clusters()),
        )?;
        buf.line(
            1,
            format!("Number of tree levels: {}", model.number_of_levels()),
        )?;
        if model.is_empty() {
            buf.line(0, "No clusters.")?;
            return Ok(());
        }
        if let Some(root) = model.root() {
            buf.line(1, format!("Root Cluster Id: {}", root.id))?;
        }

        let leaves: Vec<&Cluster> = model.leaf_clusters().collect();
        if !leaves.is_empty() {
            self.banner(buf, "Leaf clusters")?;
            for (i, leaf) in leaves.iter().enumerate() {
                buf.blank()?;
                self.detail_block(buf, model, leaf)?;
                if i == 0 && self.first_leaf_statistics {
                    cluster_statistics(buf, model, leaf, 1)?;
                }
            }
        }

        if model.rules().next().is_some() {
            self.banner(buf, "Rules")?;
            for rule in model.rules() {
                buf.blank()?;
                rule_summary(buf, rule, 0)?;
            }
        }

        self.banner(buf, "Cluster hierarchy")?;
        match model.root() {
            Some(root) if model.is_hierarchical() => {
                buf.blank()?;
                self.root_block(buf, root)?;
                let mut visited = HashSet::new();
                visited.insert(root.id);
                for &child in &root.children {
                    self.walk(buf, model, child, 1, &mut visited)?;
                }
            }
            _ => {
                for cluster in model.clusters() {
                    buf.blank()?;
                    self.detail_block(buf, model, cluster)?;
                }
            }
        }
        Ok(())
    }

    fn banner(&self, buf: &mut ReportBuffer<'_>, title: &str) -> fmt::Result {
        buf.blank()?;
        buf.line(0, UNDERLINE)?;
        buf.line(
            0,
            format!("*{:^width$}*", title, width = UNDERLINE.len() - 2),
        )?;
        buf.line(0, UNDERLINE)
    }

    /// Standalone cluster block, hanging style: id flush left, fields one
    /// indent in. Used by the leaf listing and the flat fallback.
    fn detail_block(
        &self,
        buf: &mut ReportBuffer<'_>,
        model: &ClusteringModel,
        cluster: &Cluster,
    ) -> fmt::Result {
        buf.line(0, format!("Cluster Id: {}", cluster.id))?;
        buf.line(1, format!("Case Count: {}", cluster.case_count))?;
        buf.line(1, format!("Tree Level: {}", cluster.level))?;
        buf.line(1, format!("Dispersion: {}", cluster.dispersion))?;
        buf.line(1, format!("Parent's id: {}", parent_label(model, cluster)))?;
        buf.line(1, format!("Is root Cluster: {}", cluster.is_root()))?;
        buf.line(1, format!("Is leaf Cluster: {}", cluster.is_leaf()))?;
        buf.line(1, format!("Ancestors: {}", ancestor_chain(cluster)))?;
        buf.line(1, "Children:")?;
        if cluster.is_leaf() {
            buf.line(2, "None")?;
        } else {
            for child in &cluster.children {
                buf.line(2, format!("Child: {}", child))?;
            }
        }
        Ok(())
    }

    fn root_block(&self, buf: &mut ReportBuffer<'_>, root: &Cluster) -> fmt::Result {
        buf.line(0, format!("Root Cluster Id: {}", root.id))?;
        buf.line(1, format!("Case Count: {}", root.case_count))?;
        buf.line(1, format!("Tree Level: {}", root.level))?;
        buf.line(1, format!("Dispersion: {}", root.dispersion))?;
        buf.line(1, "Children:")
    }

    /// Depth-first visit. Depth is passed by value, so each branch returns
    /// to its caller's indentation; `visited` guards raw snapshots whose
    /// child links loop.
    fn walk(
        &self,
        buf: &mut ReportBuffer<'_>,
        model: &ClusteringModel,
        id: ClusterId,
        depth: usize,
        visited: &mut HashSet<ClusterId>,
    ) -> fmt::Result {
        let cluster = match model.cluster(id) {
            Some(cluster) => cluster,
            None => {
                warn!(cluster = %id, "child link names a cluster not in the model");
                return Ok(());
            }
        };
        if !visited.insert(id) {
            warn!(cluster = %id, "cluster already visited, skipping repeated subtree");
            return Ok(());
        }

        buf.blank()?;
        buf.line(depth, format!("Cluster Id: {}", cluster.id))?;
        buf.line(depth, format!("Case Count: {}", cluster.case_count))?;
        buf.line(depth, format!("Tree Level: {}", cluster.level))?;
        buf.line(depth, format!("Dispersion: {}", cluster.dispersion))?;
        buf.line(depth, format!("Parent's id: {}", parent_label(model, cluster)))?;
        buf.line(depth, format!("Ancestors: {}", ancestor_chain(cluster)))?;
        if cluster.is_leaf() {
            buf.line(depth, "No child clusters")?;
            match cluster.rule.and_then(|rule_id| model.rule(rule_id)) {
                Some(rule) => {
                    buf.blank()?;
                    rule_details(buf, rule, depth)?;
                }
                None => {
                    warn!(cluster = %cluster.id, "leaf cluster has no resolvable rule");
                    buf.line(depth, "No rule available")?;
                }
            }
        } else {
            buf.line(depth, "Children:")?;
            for &child in &cluster.children {
                self.walk(buf, model, child, depth + 1, visited)?;
            }
        }
        Ok(())
    }
}

/// Parent id resolved through the arena; absent or dangling renders empty.
fn parent_label(model: &ClusteringModel, cluster: &Cluster) -> String {
    cluster
        .parent
        .and_then(|id| model.cluster(id))
        .map(|parent| parent.id.to_string())
        .unwrap_or_default()
}

/// Root-to-parent ancestor ids joined by `:`, each exactly once.
fn ancestor_chain(cluster: &Cluster) -> String {
    if cluster.ancestors.is_empty() {
        return "None".to_string();
    }
    cluster
        .ancestors
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(":")
}
