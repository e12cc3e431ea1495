//! Ordering strategy for keyset paging.
//!
//! The first page compares inclusively because the bootstrap cursor is a
//! real key that must be returned. Every later page compares strictly
//! because the cursor is the last key already emitted.

use crate::{
    query::{CompareOp, OrderTerm, Predicate},
    value::Value,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Traversal direction over the key field. Selected once when options are
/// built; each variant supplies its own boundary predicate, order term and
/// bootstrap extremum.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    #[display("asc")]
    Asc,
    #[display("desc")]
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn is_asc(self) -> bool {
        matches!(self, Self::Asc)
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Comparison operator used against the cursor on page `page`.
    #[must_use]
    pub const fn boundary_op(self, page: u32) -> CompareOp {
        match (self, page) {
            (Self::Asc, 0) => CompareOp::Gte,
            (Self::Asc, _) => CompareOp::Gt,
            (Self::Desc, 0) => CompareOp::Lte,
            (Self::Desc, _) => CompareOp::Lt,
        }
    }

    /// Keyset predicate for `field` on page `page` given the current cursor.
    #[must_use]
    pub fn boundary(self, field: &str, page: u32, cursor: Value) -> Predicate {
        Predicate::compare(field, self.boundary_op(page), cursor)
    }

    #[must_use]
    pub fn order(self, field: &str) -> OrderTerm {
        OrderTerm::new(field, self)
    }

    /// Aggregate that seeds the cursor: the first key in traversal order.
    #[must_use]
    pub const fn extremum(self) -> Extremum {
        match self {
            Self::Asc => Extremum::Min,
            Self::Desc => Extremum::Max,
        }
    }
}

///
/// Extremum
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Extremum {
    #[display("min")]
    Min,
    #[display("max")]
    Max,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_is_inclusive() {
        assert_eq!(Direction::Asc.boundary_op(0), CompareOp::Gte);
        assert_eq!(Direction::Desc.boundary_op(0), CompareOp::Lte);
    }

    #[test]
    fn later_pages_are_strict() {
        for page in [1, 2, 57, u32::MAX] {
            assert_eq!(Direction::Asc.boundary_op(page), CompareOp::Gt);
            assert_eq!(Direction::Desc.boundary_op(page), CompareOp::Lt);
        }
    }

    #[test]
    fn boundary_builds_compare_on_field() {
        let p = Direction::Desc.boundary("id", 3, Value::Int(10));

        assert_eq!(p, Predicate::compare("id", CompareOp::Lt, Value::Int(10)));
    }

    #[test]
    fn extremum_follows_direction() {
        assert_eq!(Direction::Asc.extremum(), Extremum::Min);
        assert_eq!(Direction::Desc.extremum(), Extremum::Max);
        assert_eq!(Direction::Asc.reverse(), Direction::Desc);
    }

    #[test]
    fn order_term_carries_direction() {
        let term = Direction::Desc.order("price");

        assert_eq!(term.field, "price");
        assert_eq!(term.direction, Direction::Desc);
    }
}
