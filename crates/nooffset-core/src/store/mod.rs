//! Module: store
//! Responsibility: the boundary between paging readers and a relational store.
//! Does not own: paging state or cursor semantics.
//! Boundary: readers drive `DataSource`/`Session`; stores implement them.

pub mod memory;

pub use memory::{MemorySession, MemoryStore, StoreStats};

use crate::{
    direction::Extremum, error::StoreError, query::Query, traits::Entity, value::Value,
};

///
/// DataSource
///
/// Hands out sessions. A reader opens exactly one session in `open()` and
/// keeps it until `close()`.
///

pub trait DataSource<E: Entity> {
    type Session: Session<E>;

    fn open_session(&self) -> Result<Self::Session, StoreError>;
}

///
/// Session
///
/// Query execution plus the unit-of-work operations readers need.
///
/// `fetch` materializes every row of the query before returning. Rows a
/// session returns stay attached to it (tracked for change detection or
/// caching) until detached or the session is cleared.
///

pub trait Session<E: Entity> {
    /// Execute `query` and return its rows in order.
    fn fetch(&mut self, query: &Query<E>) -> Result<Vec<E>, StoreError>;

    /// `SELECT min(field)` / `max(field)` over the query's filter.
    /// Grouping, ordering and paging of `query` are ignored.
    fn select_extreme(
        &mut self,
        query: &Query<E>,
        field: &str,
        extremum: Extremum,
    ) -> Result<Option<Value>, StoreError>;

    /// `SELECT min(field), max(field)` over the query's filter.
    fn select_bounds(
        &mut self,
        query: &Query<E>,
        field: &str,
    ) -> Result<Option<(Value, Value)>, StoreError> {
        let lower = self.select_extreme(query, field, Extremum::Min)?;
        let upper = self.select_extreme(query, field, Extremum::Max)?;

        Ok(lower.zip(upper))
    }

    fn begin(&mut self) -> Result<(), StoreError>;

    /// Push pending writes to the store.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Detach every row attached to the session.
    fn clear(&mut self);

    fn commit(&mut self) -> Result<(), StoreError>;

    fn rollback(&mut self) -> Result<(), StoreError>;

    fn detach(&mut self, row: &E);

    fn close(&mut self) -> Result<(), StoreError>;
}
