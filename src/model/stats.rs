//! Per-cluster attribute statistics: binned value distributions.
//!
//! A cluster's centroid is described to callers as a set of per-attribute
//! distributions. Numerical attributes carry interval bins (ranges over the
//! attribute's prepared domain), categorical attributes carry one bin per
//! category value. Either way a parallel frequency vector gives the case
//! count that fell into each bin.
//!
//! The `bins.len() == frequencies.len()` invariant is *checked* by
//! [`crate::model::ClusteringModel::validate`] and *tolerated* by the report
//! renderer (a mismatched entry is skipped with a diagnostic), because
//! engine-shaped snapshots are not guaranteed to be well formed.

/// Boundary closure of a numerical interval bin.
///
/// Determines which bracket pair the interval renders with:
/// `(`/`[` for an open/closed start, `)`/`]` for an open/closed end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalClosure {
    /// Both boundaries excluded: `( start - end )`.
    OpenOpen,
    /// Start excluded, end included: `( start - end ]`.
    OpenClosed,
    /// Start included, end excluded: `[ start - end )`.
    ClosedOpen,
    /// Both boundaries included: `[ start - end ]`.
    ClosedClosed,
}

impl IntervalClosure {
    /// The bracket pair for this closure kind, as rendered in reports.
    pub fn brackets(self) -> (&'static str, &'static str) {
        let open = match self {
            IntervalClosure::OpenOpen | IntervalClosure::OpenClosed => "( ",
            IntervalClosure::ClosedOpen | IntervalClosure::ClosedClosed => "[ ",
        };
        let close = match self {
            IntervalClosure::OpenOpen | IntervalClosure::ClosedOpen => " )",
            IntervalClosure::OpenClosed | IntervalClosure::ClosedClosed => " ]",
        };
        (open, close)
    }
}

/// A numerical bin: a range of attribute values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Start point of the range.
    pub start: f64,
    /// End point of the range.
    pub end: f64,
    /// Which boundaries are included.
    pub closure: IntervalClosure,
}

impl Interval {
    /// Create an interval bin.
    pub fn new(start: f64, end: f64, closure: IntervalClosure) -> Self {
        Self {
            start,
            end,
            closure,
        }
    }
}

/// Bin labels of one attribute's distribution, tagged by attribute type.
#[derive(Debug, Clone, PartialEq)]
pub enum Bins {
    /// Interval bins of a numerical attribute.
    Numerical(Vec<Interval>),
    /// Category-value bins of a categorical attribute.
    Categorical(Vec<String>),
}

impl Bins {
    /// Number of bins.
    pub fn len(&self) -> usize {
        match self {
            Bins::Numerical(intervals) => intervals.len(),
            Bins::Categorical(values) => values.len(),
        }
    }

    /// True when there are no bins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One attribute's binned distribution within a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct UnivariateStatistics {
    /// Attribute name, as it appears in the model signature.
    pub attribute: String,
    /// Ordered bins.
    pub bins: Bins,
    /// Per-bin frequencies, parallel to `bins`.
    pub frequencies: Vec<f64>,
}

impl UnivariateStatistics {
    /// Statistics for a numerical attribute.
    pub fn numerical(
        attribute: impl Into<String>,
        intervals: Vec<Interval>,
        frequencies: Vec<f64>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            bins: Bins::Numerical(intervals),
            frequencies,
        }
    }

    /// Statistics for a categorical attribute.
    pub fn categorical<V: Into<String>>(
        attribute: impl Into<String>,
        values: Vec<V>,
        frequencies: Vec<f64>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            bins: Bins::Categorical(values.into_iter().map(Into::into).collect()),
            frequencies,
        }
    }
}

/// Ordered attribute-name → statistics mapping for one cluster.
///
/// Entry order is the snapshot's insertion order. Nothing sorts it: engines
/// expose an unordered map here, so callers (and tests) must not depend on
/// a particular attribute order, only on membership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStatisticsSet {
    entries: Vec<UnivariateStatistics>,
}

impl AttributeStatisticsSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one attribute's statistics, keeping insertion order.
    pub fn push(&mut self, stats: UnivariateStatistics) {
        self.entries.push(stats);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, stats: UnivariateStatistics) -> Self {
        self.push(stats);
        self
    }

    /// Look up one attribute's statistics by name.
    pub fn get(&self, attribute: &str) -> Option<&UnivariateStatistics> {
        self.entries.iter().find(|s| s.attribute == attribute)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &UnivariateStatistics> {
        self.entries.iter()
    }

    /// Number of attributes with statistics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no attribute has statistics.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<UnivariateStatistics> for AttributeStatisticsSet {
    fn from_iter<I: IntoIterator<Item = UnivariateStatistics>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_table_matches_closure_kinds() {
        assert_eq!(IntervalClosure::OpenOpen.brackets(), ("( ", " )"));
        assert_eq!(IntervalClosure::OpenClosed.brackets(), ("( ", " ]"));
        assert_eq!(IntervalClosure::ClosedOpen.brackets(), ("[ ", " )"));
        assert_eq!(IntervalClosure::ClosedClosed.brackets(), ("[ ", " ]"));
    }

    #[test]
    fn set_preserves_insertion_order() {
        let set = AttributeStatisticsSet::new()
            .with(UnivariateStatistics::categorical("B", vec!["x"], vec![1.0]))
            .with(UnivariateStatistics::categorical("A", vec!["y"], vec![2.0]));

        let names: Vec<&str> = set.iter().map(|s| s.attribute.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(set.get("A").is_some());
        assert!(set.get("C").is_none());
    }
}
