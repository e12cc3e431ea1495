use crate::{traits::Entity, value::Value};
use derive_more::Display;
use std::{cmp::Ordering, fmt};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CompareOp {
    #[display("=")]
    Eq,
    #[display("<>")]
    Ne,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
}

impl CompareOp {
    /// Evaluate this operator against an already computed ordering.
    /// Incomparable operands (`None`) never satisfy any operator.
    #[must_use]
    pub const fn holds(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };

        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ne => !matches!(ordering, Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Lte => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Gte => !matches!(ordering, Ordering::Less),
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

///
/// Predicate
///
/// Boolean filter tree attached to a [`Query`](super::Query).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    IsNull { field: String },
}

impl Predicate {
    #[must_use]
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self::Compare(ComparePredicate {
            field: field.into(),
            op,
            value,
        })
    }

    /// Conjoin two predicates, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, p) | (p, Self::True) => p,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), p) => {
                left.push(p);
                Self::And(left)
            }
            (p, Self::And(mut right)) => {
                right.insert(0, p);
                Self::And(right)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Disjoin two predicates, flattening nested `Or`s.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), p) => {
                left.push(p);
                Self::Or(left)
            }
            (a, b) => Self::Or(vec![a, b]),
        }
    }

    #[must_use]
    #[expect(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluate against a materialized row.
    pub fn matches<E: Entity>(&self, row: &E) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::And(children) => children.iter().all(|p| p.matches(row)),
            Self::Or(children) => children.iter().any(|p| p.matches(row)),
            Self::Not(inner) => !inner.matches(row),
            Self::Compare(cmp) => row
                .field_value(&cmp.field)
                .is_some_and(|actual| cmp.op.holds(actual.compare(&cmp.value))),
            Self::IsNull { field } => row.field_value(field).is_none_or(|v| v.is_null()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, children: &[Predicate], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {sep} ")?;
                }
                write!(f, "{child}")?;
            }
            write!(f, ")")
        }

        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::And(children) => join(f, children, "AND"),
            Self::Or(children) => join(f, children, "OR"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
            Self::Compare(cmp) => write!(f, "{} {} {}", cmp.field, cmp.op, cmp.value),
            Self::IsNull { field } => write!(f, "{field} IS NULL"),
        }
    }
}
