//! Tables for apply (scoring) output.
//!
//! After a model is applied to a data set, two summaries are worth
//! printing: how many cases landed in each segment, and the strongest
//! cases of one chosen segment. Both renderers are pure formatting over
//! caller-supplied rows; ordering is the caller's (engines typically sort
//! by count or probability before handing rows over).

use crate::model::ClusterId;

/// How many scored cases fell into one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCount {
    /// The cluster cases were assigned to.
    pub cluster: ClusterId,
    /// Number of cases assigned to it.
    pub count: u64,
}

/// One scored case of a chosen cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCase {
    /// Case identifier from the apply input.
    pub case_id: u64,
    /// Assignment probability reported by the engine.
    pub probability: f64,
}

/// Two-column "Cluster Id / Count" table, one row per entry.
pub fn render_segment_counts(rows: &[SegmentCount]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12}{}\n", "Cluster Id", "Count"));
    out.push_str("----------------------------\n");
    for row in rows {
        out.push_str(&format!("{:<12}{}\n", row.cluster, row.count));
    }
    out
}

/// Two-column "Case Id / Probability" table, one row per entry.
pub fn render_top_cases(rows: &[ScoredCase]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12}{}\n", "Case Id", "Probability"));
    out.push_str("----------------------------\n");
    for row in rows {
        out.push_str(&format!("{:<12}{}\n", row.case_id, row.probability));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_counts_render_in_given_order() {
        let rows = vec![
            SegmentCount {
                cluster: ClusterId(5),
                count: 320,
            },
            SegmentCount {
                cluster: ClusterId(2),
                count: 41,
            },
        ];
        let table = render_segment_counts(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Cluster Id  Count");
        assert_eq!(lines[1], "----------------------------");
        assert_eq!(lines[2], "5           320");
        assert_eq!(lines[3], "2           41");
    }

    #[test]
    fn top_cases_render_case_and_probability() {
        let rows = vec![ScoredCase {
            case_id: 100_042,
            probability: 0.875,
        }];
        let table = render_top_cases(&rows);
        assert!(table.contains("Case Id     Probability"));
        assert!(table.contains("100042      0.875"));
    }
}
