//! Per-cluster statistics formatting.
//!
//! One table per attribute, in the snapshot's entry order. The model
//! signature decides the table shape: interval rows for numerical
//! attributes, category rows for categorical ones. Frequencies print
//! truncated toward zero.
//!
//! Defects degrade instead of aborting: a cluster without statistics gets a
//! single error line, and an individual attribute whose entry is malformed
//! (unknown to the signature, bins of the wrong kind, or bin/frequency
//! counts that disagree) is skipped with a warning naming the cluster.

use std::fmt;

use tracing::warn;

use crate::model::{AttributeKind, Bins, Cluster, ClusteringModel, UnivariateStatistics};
use crate::report::util::{truncate_frequency, ReportBuffer, UNDERLINE};

/// Render every attribute table for `cluster` at the given depth.
pub(crate) fn cluster_statistics(
    buf: &mut ReportBuffer<'_>,
    model: &ClusteringModel,
    cluster: &Cluster,
    depth: usize,
) -> fmt::Result {
    let stats = match &cluster.statistics {
        Some(stats) if !stats.is_empty() => stats,
        _ => {
            buf.line(
                depth,
                format!("Error: cluster {} does not contain statistics", cluster.id),
            )?;
            return Ok(());
        }
    };

    for entry in stats.iter() {
        if !entry_is_well_formed(model, cluster, entry) {
            continue;
        }
        buf.blank()?;
        buf.line(
            depth,
            format!("Statistics for attribute: {}", entry.attribute),
        )?;
        buf.line(depth, UNDERLINE)?;
        match &entry.bins {
            Bins::Numerical(intervals) => {
                buf.line(depth, table_row("Bin Id", "Range", "Frequency"))?;
                for (i, interval) in intervals.iter().enumerate() {
                    let (open, close) = interval.closure.brackets();
                    let range =
                        format!("{}{} - {}{}", open, interval.start, interval.end, close);
                    buf.line(
                        depth,
                        table_row(
                            (i + 1).to_string(),
                            range,
                            truncate_frequency(entry.frequencies[i]).to_string(),
                        ),
                    )?;
                }
            }
            Bins::Categorical(values) => {
                buf.line(depth, table_row("Bin Id", "Category", "Frequency"))?;
                for (i, value) in values.iter().enumerate() {
                    buf.line(
                        depth,
                        table_row(
                            (i + 1).to_string(),
                            value,
                            truncate_frequency(entry.frequencies[i]).to_string(),
                        ),
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn table_row(id: impl fmt::Display, bin: impl fmt::Display, frequency: impl fmt::Display) -> String {
    format!("{:<8}{:<22}{}", id, bin, frequency)
}

/// Check one entry against the signature and its own parallel vectors,
/// warning and rejecting on any defect.
fn entry_is_well_formed(
    model: &ClusteringModel,
    cluster: &Cluster,
    entry: &UnivariateStatistics,
) -> bool {
    let kind = match model.signature().kind_of(&entry.attribute) {
        Some(kind) => kind,
        None => {
            warn!(
                cluster = %cluster.id,
                attribute = %entry.attribute,
                "skipping statistics for an attribute missing from the signature"
            );
            return false;
        }
    };

    let kind_matches = matches!(
        (kind, &entry.bins),
        (AttributeKind::Numerical, Bins::Numerical(_))
            | (AttributeKind::Categorical, Bins::Categorical(_))
    );
    if !kind_matches {
        warn!(
            cluster = %cluster.id,
            attribute = %entry.attribute,
            "skipping statistics whose bins disagree with the signature kind"
        );
        return false;
    }

    if entry.bins.len() != entry.frequencies.len() {
        warn!(
            cluster = %cluster.id,
            attribute = %entry.attribute,
            bins = entry.bins.len(),
            frequencies = entry.frequencies.len(),
            "skipping statistics with mismatched bin and frequency counts"
        );
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AttributeStatisticsSet, ClusterId, Interval, IntervalClosure, ModelSignature,
    };

    // Raw construction on purpose: several cases below carry defects that
    // the checked builder would refuse.
    fn render_for(statistics: Option<AttributeStatisticsSet>) -> String {
        let signature = ModelSignature::new()
            .with_numerical("AGE")
            .with_categorical("GENDER");
        let cluster = Cluster {
            id: ClusterId(1),
            case_count: 10,
            level: 0,
            dispersion: 0.0,
            parent: None,
            ancestors: vec![],
            children: vec![],
            rule: None,
            statistics,
        };
        let model = ClusteringModel::from_parts("m", vec![cluster], vec![], signature);

        let mut out = String::new();
        let mut buf = ReportBuffer::new(&mut out, "    ");
        let cluster = model.cluster(ClusterId(1)).unwrap();
        cluster_statistics(&mut buf, &model, cluster, 0).unwrap();
        out
    }

    #[test]
    fn missing_statistics_render_an_error_line() {
        let out = render_for(None);
        assert_eq!(out, "Error: cluster 1 does not contain statistics\n");
    }

    #[test]
    fn numerical_bins_render_bracketed_ranges() {
        let stats = AttributeStatisticsSet::new().with(UnivariateStatistics::numerical(
            "AGE",
            vec![
                Interval::new(0.0, 0.5, IntervalClosure::ClosedOpen),
                Interval::new(0.5, 1.0, IntervalClosure::OpenClosed),
            ],
            vec![12.7, 4.0],
        ));
        let out = render_for(Some(stats));
        assert!(out.contains("Statistics for attribute: AGE"));
        assert!(out.contains("[ 0 - 0.5 )"));
        assert!(out.contains("( 0.5 - 1 ]"));
        // 12.7 truncates to 12.
        assert!(out.contains("12\n"));
        // Blank, title, underline, header, one row per bin.
        assert_eq!(out.lines().count(), 6);
    }

    #[test]
    fn categorical_bins_render_values_and_truncated_frequencies() {
        let stats = AttributeStatisticsSet::new().with(UnivariateStatistics::categorical(
            "GENDER",
            vec!["F", "M"],
            vec![7.9, 3.2],
        ));
        let out = render_for(Some(stats));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.contains(&format!("{:<8}{:<22}{}", 1, "F", 7).as_str()));
        assert!(lines.contains(&format!("{:<8}{:<22}{}", 2, "M", 3).as_str()));
    }

    #[test]
    fn malformed_entry_is_skipped_and_the_rest_render() {
        let stats = AttributeStatisticsSet::new()
            .with(UnivariateStatistics::categorical(
                "UNKNOWN",
                vec!["?"],
                vec![1.0],
            ))
            .with(UnivariateStatistics::categorical(
                "GENDER",
                vec!["F"],
                vec![2.0],
            ));
        let out = render_for(Some(stats));
        assert!(!out.contains("UNKNOWN"));
        assert!(out.contains("Statistics for attribute: GENDER"));
    }

    #[test]
    fn mismatched_lengths_are_skipped() {
        let stats = AttributeStatisticsSet::new().with(UnivariateStatistics::categorical(
            "GENDER",
            vec!["F", "M"],
            vec![1.0],
        ));
        let out = render_for(Some(stats));
        assert!(!out.contains("Statistics for attribute: GENDER"));
    }
}
