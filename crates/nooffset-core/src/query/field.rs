use crate::{
    direction::Direction,
    query::{
        OrderTerm,
        predicate::{CompareOp, Predicate},
    },
    traits::FieldValue,
};
use derive_more::Deref;

///
/// FieldRef
///
/// Zero-cost wrapper around a static field name used in predicates.
/// Enables method-based predicate builders without allocating.
///

#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct FieldRef(&'static str);

impl FieldRef {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    // ------------------------------------------------------------------
    // Comparison predicates
    // ------------------------------------------------------------------

    #[must_use]
    pub fn eq(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.0, CompareOp::Eq, value.to_value())
    }

    #[must_use]
    pub fn ne(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.0, CompareOp::Ne, value.to_value())
    }

    #[must_use]
    pub fn lt(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.0, CompareOp::Lt, value.to_value())
    }

    #[must_use]
    pub fn lte(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.0, CompareOp::Lte, value.to_value())
    }

    #[must_use]
    pub fn gt(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.0, CompareOp::Gt, value.to_value())
    }

    #[must_use]
    pub fn gte(self, value: impl FieldValue) -> Predicate {
        Predicate::compare(self.0, CompareOp::Gte, value.to_value())
    }

    /// Inclusive range `lower <= field <= upper`.
    #[must_use]
    pub fn between(self, lower: impl FieldValue, upper: impl FieldValue) -> Predicate {
        self.gte(lower).and(self.lte(upper))
    }

    #[must_use]
    pub fn is_null(self) -> Predicate {
        Predicate::IsNull {
            field: self.0.to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    #[must_use]
    pub fn asc(self) -> OrderTerm {
        OrderTerm::new(self.0, Direction::Asc)
    }

    #[must_use]
    pub fn desc(self) -> OrderTerm {
        OrderTerm::new(self.0, Direction::Desc)
    }
}
