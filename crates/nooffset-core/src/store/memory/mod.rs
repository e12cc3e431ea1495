//! In-memory relational store.
//!
//! Executes `Query` values over a single table of entities with the same
//! observable semantics a SQL backend would give the readers: WHERE before
//! GROUP BY, loose grouping (first row of each group wins), stable
//! ORDER BY, then OFFSET/LIMIT. Sessions queue writes until `flush` and
//! track which rows are attached so isolation policies can be observed.


use crate::{
    direction::{Direction, Extremum},
    error::StoreError,
    query::{Predicate, Query},
    store::{DataSource, Session},
    traits::Entity,
    value::Value,
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

///
/// StoreStats
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StoreStats {
    pub sessions_opened: u64,
    pub sessions_closed: u64,
    pub fetches: u64,
    pub aggregates: u64,
    pub flushes: u64,
    pub commits: u64,
    pub rollbacks: u64,
}

struct Table<E> {
    rows: Vec<E>,
    stats: StoreStats,
    failing_fetches: u32,
    failing_commits: u32,
    refuse_sessions: bool,
}

///
/// MemoryStore
///
/// Cheap to clone; clones share the same table.
///

pub struct MemoryStore<E> {
    table: Arc<Mutex<Table<E>>>,
}

impl<E: Entity> MemoryStore<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    #[must_use]
    pub fn with_rows(rows: Vec<E>) -> Self {
        Self {
            table: Arc::new(Mutex::new(Table {
                rows,
                stats: StoreStats::default(),
                failing_fetches: 0,
                failing_commits: 0,
                refuse_sessions: false,
            })),
        }
    }

    /// Insert outside any session (autocommit).
    pub fn insert(&self, row: E) {
        self.lock().rows.push(row);
    }

    /// Delete outside any session (autocommit). Returns the number removed.
    pub fn delete_where(&self, predicate: &Predicate) -> usize {
        let mut table = self.lock();
        let before = table.rows.len();
        table.rows.retain(|row| !predicate.matches(row));

        before - table.rows.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.lock().stats
    }

    /// Make the next `count` fetches fail with an execution error.
    pub fn fail_next_fetches(&self, count: u32) {
        self.lock().failing_fetches = count;
    }

    /// Make the next `count` commits fail with an execution error. The
    /// transaction stays open and its writes stay queued.
    pub fn fail_next_commits(&self, count: u32) {
        self.lock().failing_commits = count;
    }

    /// Refuse to open new sessions (simulates an unreachable store).
    pub fn refuse_sessions(&self, refuse: bool) {
        self.lock().refuse_sessions = refuse;
    }

    /// Run `query` directly, without paging or session bookkeeping.
    #[must_use]
    pub fn query(&self, query: &Query<E>) -> Vec<E> {
        execute(&self.lock().rows, query)
    }

    fn lock(&self) -> MutexGuard<'_, Table<E>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Entity> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<E: Entity> DataSource<E> for MemoryStore<E> {
    type Session = MemorySession<E>;

    fn open_session(&self) -> Result<Self::Session, StoreError> {
        let mut table = self.lock();
        if table.refuse_sessions {
            return Err(StoreError::connection("store refused a new session"));
        }
        table.stats.sessions_opened += 1;
        drop(table);

        Ok(MemorySession {
            store: self.clone(),
            pending: Vec::new(),
            managed: HashSet::new(),
            active: false,
            closed: false,
        })
    }
}

enum PendingWrite<E> {
    Insert(E),
    Delete(Predicate),
}

///
/// MemorySession
///

pub struct MemorySession<E> {
    store: MemoryStore<E>,
    pending: Vec<PendingWrite<E>>,
    managed: HashSet<Value>,
    active: bool,
    closed: bool,
}

impl<E: Entity> MemorySession<E> {
    /// Queue an insert; visible to queries after `flush`.
    pub fn insert(&mut self, row: E) {
        self.pending.push(PendingWrite::Insert(row));
    }

    /// Queue a delete; visible to queries after `flush`.
    pub fn delete_where(&mut self, predicate: Predicate) {
        self.pending.push(PendingWrite::Delete(predicate));
    }

    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Number of rows currently attached to the session.
    #[must_use]
    pub fn managed_count(&self) -> usize {
        self.managed.len()
    }

    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::closed());
        }

        Ok(())
    }

    fn identity(row: &E) -> Value {
        row.field_value(E::MODEL.primary_key).unwrap_or_default()
    }
}

impl<E: Entity> Session<E> for MemorySession<E> {
    fn fetch(&mut self, query: &Query<E>) -> Result<Vec<E>, StoreError> {
        self.ensure_open()?;

        let mut table = self.store.lock();
        if table.failing_fetches > 0 {
            table.failing_fetches -= 1;
            return Err(StoreError::execution("injected fetch failure"));
        }
        table.stats.fetches += 1;
        let rows = execute(&table.rows, query);
        drop(table);

        self.managed.extend(rows.iter().map(Self::identity));

        Ok(rows)
    }

    fn select_extreme(
        &mut self,
        query: &Query<E>,
        field: &str,
        extremum: Extremum,
    ) -> Result<Option<Value>, StoreError> {
        self.ensure_open()?;

        let mut table = self.store.lock();
        table.stats.aggregates += 1;

        let values = filtered(&table.rows, query.predicate())
            .filter_map(|row| row.field_value(field))
            .filter(|v| !v.is_null());

        let extreme = match extremum {
            Extremum::Min => values.min_by(Value::sort_cmp),
            Extremum::Max => values.max_by(Value::sort_cmp),
        };

        Ok(extreme)
    }

    fn begin(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        if self.active {
            return Err(StoreError::transaction("transaction already active"));
        }
        self.active = true;

        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut table = self.store.lock();
        for write in self.pending.drain(..) {
            match write {
                PendingWrite::Insert(row) => table.rows.push(row),
                PendingWrite::Delete(predicate) => {
                    table.rows.retain(|row| !predicate.matches(row));
                }
            }
        }
        table.stats.flushes += 1;

        Ok(())
    }

    fn clear(&mut self) {
        self.managed.clear();
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        if !self.active {
            return Err(StoreError::transaction("no active transaction to commit"));
        }
        {
            let mut table = self.store.lock();
            if table.failing_commits > 0 {
                table.failing_commits -= 1;
                return Err(StoreError::execution("injected commit failure"));
            }
        }
        self.flush()?;
        self.active = false;
        self.store.lock().stats.commits += 1;

        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        if !self.active {
            return Err(StoreError::transaction("no active transaction to roll back"));
        }
        self.pending.clear();
        self.active = false;
        self.store.lock().stats.rollbacks += 1;

        Ok(())
    }

    fn detach(&mut self, row: &E) {
        self.managed.remove(&Self::identity(row));
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Ok(());
        }
        self.pending.clear();
        self.managed.clear();
        self.active = false;
        self.closed = true;
        self.store.lock().stats.sessions_closed += 1;

        Ok(())
    }
}

// WHERE
fn filtered<'a, E: Entity>(
    rows: &'a [E],
    predicate: Option<&'a Predicate>,
) -> impl Iterator<Item = &'a E> {
    rows.iter()
        .filter(move |row| predicate.is_none_or(|p| p.matches(*row)))
}

// WHERE -> GROUP BY -> ORDER BY -> OFFSET/LIMIT
fn execute<E: Entity>(rows: &[E], query: &Query<E>) -> Vec<E> {
    let mut selected: Vec<E> = if query.is_grouped() {
        let mut seen = HashSet::new();
        filtered(rows, query.predicate())
            .filter(|row| {
                let key: Vec<Value> = query
                    .group_fields()
                    .iter()
                    .map(|f| row.field_value(f).unwrap_or_default())
                    .collect();
                seen.insert(key)
            })
            .cloned()
            .collect()
    } else {
        filtered(rows, query.predicate()).cloned().collect()
    };

    if !query.order_terms().is_empty() {
        selected.sort_by(|a, b| {
            for term in query.order_terms() {
                let left = a.field_value(&term.field).unwrap_or_default();
                let right = b.field_value(&term.field).unwrap_or_default();
                let ord = match term.direction {
                    Direction::Asc => left.sort_cmp(&right),
                    Direction::Desc => right.sort_cmp(&left),
                };
                if ord.is_ne() {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    let offset = usize::try_from(query.row_offset()).unwrap_or(usize::MAX);
    let limit = query
        .row_limit()
        .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

    selected.into_iter().skip(offset).take(limit).collect()
}
