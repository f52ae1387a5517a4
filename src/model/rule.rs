//! Cluster rules: the predicate description of how cases reach a leaf.
//!
//! Each leaf cluster carries one rule. The antecedent collects the split
//! predicates on the path from the root; the consequent states the cluster
//! assignment. Predicates are a closed tagged type rather than an open
//! class hierarchy: the engine vocabulary only ever produces numerical
//! threshold clauses and categorical membership clauses.

use std::fmt;

/// Identifier of a rule within one model's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Comparison operator vocabulary of the mining engine.
///
/// Closed set; `symbol` gives the fixed report spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEq,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEq,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
}

impl Operator {
    /// The operator's report spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::LessThan => "<",
            Operator::LessOrEq => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEq => ">=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
        }
    }
}

/// One comparison clause over a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum SimplePredicate {
    /// Threshold clause over a numerical attribute, e.g. `AGE <= 0.41`.
    Numerical {
        /// Attribute name.
        attribute: String,
        /// Comparison operator.
        op: Operator,
        /// Threshold value (prepared-domain units).
        value: f64,
    },
    /// Membership clause over a categorical attribute,
    /// e.g. `OCCUPATION IN Prof.,Exec.`.
    Categorical {
        /// Attribute name.
        attribute: String,
        /// Comparison operator.
        op: Operator,
        /// Category values tested against.
        values: Vec<String>,
    },
}

impl SimplePredicate {
    /// Numerical threshold clause.
    pub fn numerical(attribute: impl Into<String>, op: Operator, value: f64) -> Self {
        SimplePredicate::Numerical {
            attribute: attribute.into(),
            op,
            value,
        }
    }

    /// Categorical membership clause.
    pub fn categorical<V: Into<String>>(
        attribute: impl Into<String>,
        op: Operator,
        values: Vec<V>,
    ) -> Self {
        SimplePredicate::Categorical {
            attribute: attribute.into(),
            op,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The attribute this clause tests.
    pub fn attribute(&self) -> &str {
        match self {
            SimplePredicate::Numerical { attribute, .. } => attribute,
            SimplePredicate::Categorical { attribute, .. } => attribute,
        }
    }

    /// The clause's operator.
    pub fn operator(&self) -> Operator {
        match self {
            SimplePredicate::Numerical { op, .. } => *op,
            SimplePredicate::Categorical { op, .. } => *op,
        }
    }
}

/// Ordered conjunction of simple predicates.
///
/// Order is meaningful to the report renderer (consequent lines keep it;
/// antecedent grouping keys off first appearance), so nothing here sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundPredicate {
    predicates: Vec<SimplePredicate>,
}

impl CompoundPredicate {
    /// Empty conjunction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause, keeping order.
    pub fn push(&mut self, predicate: SimplePredicate) {
        self.predicates.push(predicate);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, predicate: SimplePredicate) -> Self {
        self.push(predicate);
        self
    }

    /// Iterate clauses in order.
    pub fn iter(&self) -> impl Iterator<Item = &SimplePredicate> {
        self.predicates.iter()
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True when there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl From<Vec<SimplePredicate>> for CompoundPredicate {
    fn from(predicates: Vec<SimplePredicate>) -> Self {
        Self { predicates }
    }
}

impl FromIterator<SimplePredicate> for CompoundPredicate {
    fn from_iter<I: IntoIterator<Item = SimplePredicate>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

/// A leaf cluster's decision rule: `IF antecedent THEN consequent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Rule identifier, unique within the model.
    pub id: RuleId,
    /// Fraction of cases the rule covers.
    pub support: f64,
    /// Fraction of covered cases for which the consequent holds.
    pub confidence: f64,
    /// Path predicates leading to the leaf.
    pub antecedent: CompoundPredicate,
    /// Cluster-assignment predicates.
    pub consequent: CompoundPredicate,
}

impl Rule {
    /// Assemble a rule.
    pub fn new(
        id: RuleId,
        support: f64,
        confidence: f64,
        antecedent: CompoundPredicate,
        consequent: CompoundPredicate,
    ) -> Self {
        Self {
            id,
            support,
            confidence,
            antecedent,
            consequent,
        }
    }
}
