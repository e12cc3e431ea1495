//! Module: query
//! Responsibility: the query shape handed to stores.
//! Does not own: evaluation strategy or storage access (see `store`).
//! Boundary: readers build and augment `Query` values; stores execute them.

mod field;
mod predicate;


pub use field::FieldRef;
pub use predicate::{CompareOp, ComparePredicate, Predicate};

use crate::direction::Direction;
use std::{fmt, marker::PhantomData};

///
/// OrderTerm
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderTerm {
    pub field: String,
    pub direction: Direction,
}

impl OrderTerm {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

///
/// Query
///
/// Filtered, optionally grouped, ordered and limited query over entity `E`.
/// Every builder method consumes and returns the query so callers can keep
/// a base query around and clone it per page.
///

pub struct Query<E> {
    predicate: Option<Predicate>,
    group_by: Vec<String>,
    order: Vec<OrderTerm>,
    limit: Option<u32>,
    offset: u32,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Query<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicate: None,
            group_by: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
            _marker: PhantomData,
        }
    }

    /// AND a predicate into the existing filter.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Alias for [`Query::filter`] that reads better in chains.
    #[must_use]
    pub fn and(self, predicate: Predicate) -> Self {
        self.filter(predicate)
    }

    #[must_use]
    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by.push(field.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, term: OrderTerm) -> Self {
        self.order.push(term);
        self
    }

    /// Make `term` the primary sort key, ahead of any existing terms.
    #[must_use]
    pub fn order_by_first(mut self, term: OrderTerm) -> Self {
        self.order.insert(0, term);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Same filter with grouping, ordering and paging removed.
    #[must_use]
    pub fn ungrouped(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            ..Self::new()
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    #[must_use]
    pub fn group_fields(&self) -> &[String] {
        &self.group_by
    }

    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }

    #[must_use]
    pub fn order_terms(&self) -> &[OrderTerm] {
        &self.order
    }

    #[must_use]
    pub const fn row_limit(&self) -> Option<u32> {
        self.limit
    }

    #[must_use]
    pub const fn row_offset(&self) -> u32 {
        self.offset
    }
}

impl<E> Default for Query<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Query<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            group_by: self.group_by.clone(),
            order: self.order.clone(),
            limit: self.limit,
            offset: self.offset,
            _marker: PhantomData,
        }
    }
}

impl<E> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("predicate", &self.predicate)
            .field("group_by", &self.group_by)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<E> fmt::Display for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            Some(p) => write!(f, "WHERE {p}")?,
            None => write!(f, "WHERE true")?,
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY {}", self.group_by.join(", "))?;
        }
        if !self.order.is_empty() {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|t| format!("{} {}", t.field, t.direction))
                .collect();
            write!(f, " ORDER BY {}", terms.join(", "))?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if self.offset > 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }

        Ok(())
    }
}
