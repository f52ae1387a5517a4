//! Rule and predicate formatting.
//!
//! Two forms: the full form (support, confidence, antecedent, consequent)
//! used for leaf clusters during the hierarchy walk, and the summary form
//! (no predicates) used for the flat rule listing.
//!
//! Antecedent clauses are grouped by attribute: several predicates over one
//! attribute collapse onto a single line joined with `" AND "`, one line per
//! distinct attribute, in first-appearance order. Consequent clauses keep
//! their sequence order, one per line, with `" AND "` appended to every
//! rendered line but the last.
//!
//! A malformed predicate (no category values, or a non-finite threshold) is
//! dropped with a warning naming the rule; its siblings still render, and
//! the enclosing walk is never aborted.

use std::fmt;

use tracing::warn;

use crate::model::{Rule, RuleId, SimplePredicate};
use crate::report::util::ReportBuffer;

/// Full rule block: identifier, support, confidence, then predicates.
pub(crate) fn rule_details(buf: &mut ReportBuffer<'_>, rule: &Rule, depth: usize) -> fmt::Result {
    rule_summary(buf, rule, depth)?;
    buf.line(depth + 1, "Antecedent:")?;
    for clause in antecedent_clauses(rule) {
        buf.line(depth + 2, clause)?;
    }
    buf.line(depth + 1, "Consequent:")?;
    for clause in consequent_clauses(rule) {
        buf.line(depth + 2, clause)?;
    }
    Ok(())
}

/// Summary rule block: identifier, support and confidence only.
pub(crate) fn rule_summary(buf: &mut ReportBuffer<'_>, rule: &Rule, depth: usize) -> fmt::Result {
    buf.line(depth, format!("Rule number: {}", rule.id))?;
    buf.line(depth + 1, format!("Support: {}", rule.support))?;
    buf.line(depth + 1, format!("Confidence: {}", rule.confidence))
}

/// Antecedent lines, grouped by attribute in first-appearance order.
pub(crate) fn antecedent_clauses(rule: &Rule) -> Vec<String> {
    let mut grouped: Vec<(&str, String)> = Vec::new();
    for predicate in rule.antecedent.iter() {
        let clause = match simple_clause(rule.id, predicate) {
            Some(clause) => clause,
            None => continue,
        };
        match grouped
            .iter_mut()
            .find(|(attribute, _)| *attribute == predicate.attribute())
        {
            Some((_, joined)) => {
                joined.push_str(" AND ");
                joined.push_str(&clause);
            }
            None => grouped.push((predicate.attribute(), clause)),
        }
    }
    grouped.into_iter().map(|(_, joined)| joined).collect()
}

/// Consequent lines in sequence order, `" AND "` on all but the last.
pub(crate) fn consequent_clauses(rule: &Rule) -> Vec<String> {
    let rendered: Vec<String> = rule
        .consequent
        .iter()
        .filter_map(|predicate| simple_clause(rule.id, predicate))
        .collect();
    let last = rendered.len().saturating_sub(1);
    rendered
        .into_iter()
        .enumerate()
        .map(|(i, mut clause)| {
            if i < last {
                clause.push_str(" AND ");
            }
            clause
        })
        .collect()
}

/// Render one predicate, or drop it with a diagnostic when malformed.
fn simple_clause(rule: RuleId, predicate: &SimplePredicate) -> Option<String> {
    match predicate {
        SimplePredicate::Numerical {
            attribute,
            op,
            value,
        } => {
            if !value.is_finite() {
                warn!(
                    rule = %rule,
                    attribute = %attribute,
                    "skipping predicate with a non-finite threshold"
                );
                return None;
            }
            Some(format!("{} {} {}", attribute, op.symbol(), value))
        }
        SimplePredicate::Categorical {
            attribute,
            op,
            values,
        } => {
            if values.is_empty() {
                warn!(
                    rule = %rule,
                    attribute = %attribute,
                    "skipping predicate with no category values"
                );
                return None;
            }
            Some(format!("{} {} {}", attribute, op.symbol(), values.join(",")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompoundPredicate, Operator};

    fn rule_with(antecedent: Vec<SimplePredicate>, consequent: Vec<SimplePredicate>) -> Rule {
        Rule::new(
            RuleId(3),
            0.25,
            0.8,
            CompoundPredicate::from(antecedent),
            CompoundPredicate::from(consequent),
        )
    }

    #[test]
    fn same_attribute_antecedents_collapse_onto_one_line() {
        let rule = rule_with(
            vec![
                SimplePredicate::categorical("REGION", Operator::Eq, vec!["X"]),
                SimplePredicate::numerical("AGE", Operator::LessThan, 0.5),
                SimplePredicate::categorical("REGION", Operator::Eq, vec!["Y"]),
            ],
            vec![],
        );
        let clauses = antecedent_clauses(&rule);
        assert_eq!(
            clauses,
            vec!["REGION = X AND REGION = Y".to_string(), "AGE < 0.5".to_string()]
        );
    }

    #[test]
    fn malformed_predicate_does_not_suppress_siblings() {
        let rule = rule_with(
            vec![
                SimplePredicate::categorical("REGION", Operator::Eq, vec!["X"]),
                SimplePredicate::categorical("BROKEN", Operator::In, Vec::<String>::new()),
                SimplePredicate::numerical("BAD", Operator::LessThan, f64::NAN),
                SimplePredicate::categorical("REGION", Operator::Eq, vec!["Y"]),
            ],
            vec![],
        );
        let clauses = antecedent_clauses(&rule);
        assert_eq!(clauses, vec!["REGION = X AND REGION = Y".to_string()]);
    }

    #[test]
    fn consequent_joins_all_but_the_last_line() {
        let rule = rule_with(
            vec![],
            vec![
                SimplePredicate::numerical("AGE", Operator::LessThan, 30.0),
                SimplePredicate::categorical("INCOME", Operator::In, vec!["H"]),
            ],
        );
        let clauses = consequent_clauses(&rule);
        assert_eq!(
            clauses,
            vec!["AGE < 30 AND ".to_string(), "INCOME IN H".to_string()]
        );
    }

    #[test]
    fn categorical_values_join_with_commas() {
        let rule = rule_with(
            vec![SimplePredicate::categorical(
                "OCCUPATION",
                Operator::In,
                vec!["Prof.", "Exec."],
            )],
            vec![],
        );
        assert_eq!(antecedent_clauses(&rule), vec!["OCCUPATION IN Prof.,Exec."]);
    }
}
