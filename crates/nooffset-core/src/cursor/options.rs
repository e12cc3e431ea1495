use crate::{
    cursor::KeyField,
    direction::Direction,
    error::{ConfigError, ReadError},
    obs::{ReaderEvent, SinkHandle, default_sink},
    query::{CompareOp, Predicate, Query},
    reader::PageQuery,
    store::Session,
    traits::{CursorKey, Entity, FieldValue, NumericKey},
    value::Value,
};
use std::fmt;

///
/// CursorState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorState {
    /// Page 0 has not been prepared yet.
    Uninitialized,
    /// Bootstrap ran; the cursor holds the first key (or nothing if the
    /// filtered set is empty).
    Bootstrapped,
    /// At least one page advanced the cursor.
    Advanced,
    /// Reading ended; the cursor is frozen.
    Exhausted,
}

///
/// KeyBounds
///
/// Key range of the filtered, ungrouped rows, captured once for grouped
/// queries. Every grouped page is clamped to it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyBounds<K> {
    pub lower: K,
    pub upper: K,
}

///
/// NoOffsetOptions
///
/// Keyset cursor over key field `K` of entity `E`. One generic type covers
/// numeric and text keys; see [`NumberOptions`] and [`StringOptions`].
///

pub struct NoOffsetOptions<E, K> {
    key: KeyField<E, K>,
    direction: Direction,
    current: Option<K>,
    bounds: Option<KeyBounds<K>>,
    state: CursorState,
    sink: SinkHandle,
}

/// Options keyed on a numeric field.
///
/// Type aliases cannot carry bounds; [`NoOffsetOptions::number`] is what
/// requires a [`NumericKey`].
pub type NumberOptions<E, N> = NoOffsetOptions<E, N>;

/// Options keyed on a text field.
pub type StringOptions<E> = NoOffsetOptions<E, String>;

impl<E: Entity, K: CursorKey> NoOffsetOptions<E, K> {
    /// Bind options to `key`. Fails if the key field does not exist on the
    /// entity (or a base entity) or has the wrong kind.
    pub fn new(key: KeyField<E, K>, direction: Direction) -> Result<Self, ConfigError> {
        key.resolve()?;

        Ok(Self {
            key,
            direction,
            current: None,
            bounds: None,
            state: CursorState::Uninitialized,
            sink: default_sink(),
        })
    }

    #[must_use]
    pub fn with_sink(mut self, sink: SinkHandle) -> Self {
        self.sink = sink;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        self.key.name()
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn current_key(&self) -> Option<&K> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn bounds(&self) -> Option<&KeyBounds<K>> {
        self.bounds.as_ref()
    }

    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    // ------------------------------------------------------------------
    // Cursor lifecycle
    // ------------------------------------------------------------------

    /// Seed the cursor on page 0; no-op on every other page.
    ///
    /// Plain queries take the extreme key of the base filter. Grouped
    /// queries take it from the ungrouped filter and also capture the
    /// `(min, max)` bound pair. State is only written once every query has
    /// succeeded.
    pub fn init_cursor<S: Session<E>>(
        &mut self,
        session: &mut S,
        base: &Query<E>,
        page: u32,
    ) -> Result<(), ReadError> {
        if page != 0 {
            return Ok(());
        }

        let field = self.key.name();
        let extremum = self.direction.extremum();

        let (first, bounds) = if base.is_grouped() {
            let ungrouped = base.ungrouped();
            let first = session.select_extreme(&ungrouped, field, extremum)?;
            let bounds = match session.select_bounds(&ungrouped, field)? {
                Some((lower, upper)) => Some(KeyBounds {
                    lower: decode_key::<K>(field, &lower)?,
                    upper: decode_key::<K>(field, &upper)?,
                }),
                None => None,
            };
            (first, bounds)
        } else {
            (session.select_extreme(base, field, extremum)?, None)
        };

        let current = first.as_ref().map(|v| decode_key::<K>(field, v)).transpose()?;

        self.sink.record(ReaderEvent::CursorSeeded {
            field,
            key: first.as_ref(),
        });
        if let Some(b) = &bounds {
            self.sink.record(ReaderEvent::BoundsSeeded {
                field,
                lower: &b.lower.to_value(),
                upper: &b.upper.to_value(),
            });
        }

        self.current = current;
        self.bounds = bounds;
        self.state = CursorState::Bootstrapped;

        Ok(())
    }

    /// Augment `base` with the keyset predicate and key ordering for `page`.
    /// Without a cursor the base query is returned unchanged.
    #[must_use]
    pub fn build_query(&self, base: &Query<E>, page: u32) -> Query<E> {
        let Some(current) = &self.current else {
            return base.clone();
        };

        let field = self.key.name();
        let mut query = base
            .clone()
            .filter(self.direction.boundary(field, page, current.to_value()));

        if let Some(bounds) = &self.bounds {
            query = query.filter(
                Predicate::compare(field, CompareOp::Gte, bounds.lower.to_value()).and(
                    Predicate::compare(field, CompareOp::Lte, bounds.upper.to_value()),
                ),
            );
        }

        query.order_by_first(self.direction.order(field))
    }

    /// Move the cursor to the key of the last row of a non-empty page.
    pub fn advance_cursor(&mut self, last: &E) {
        let key = self.key.extract(last);

        self.sink.record(ReaderEvent::CursorAdvanced {
            field: self.key.name(),
            key: &key.to_value(),
        });

        self.current = Some(key);
        self.state = CursorState::Advanced;
    }

    /// Freeze the cursor once reading has ended.
    pub const fn mark_exhausted(&mut self) {
        self.state = CursorState::Exhausted;
    }

    /// Forget all cursor state; used when a reader is reopened.
    pub fn reset(&mut self) {
        self.current = None;
        self.bounds = None;
        self.state = CursorState::Uninitialized;
    }
}

impl<E: Entity, N: NumericKey> NoOffsetOptions<E, N> {
    /// Numeric-key options.
    pub fn number(key: KeyField<E, N>, direction: Direction) -> Result<Self, ConfigError> {
        Self::new(key, direction)
    }
}

impl<E: Entity> NoOffsetOptions<E, String> {
    /// Text-key options; keys compare lexicographically.
    pub fn string(key: KeyField<E, String>, direction: Direction) -> Result<Self, ConfigError> {
        Self::new(key, direction)
    }
}

impl<E: Entity, K: CursorKey> PageQuery<E> for NoOffsetOptions<E, K> {
    fn reset(&mut self) {
        Self::reset(self);
    }

    fn prepare<S: Session<E>>(
        &mut self,
        session: &mut S,
        base: &Query<E>,
        page: u32,
    ) -> Result<(), ReadError> {
        self.init_cursor(session, base, page)
    }

    fn build(&self, base: &Query<E>, page: u32) -> Query<E> {
        self.build_query(base, page)
    }

    fn advance(&mut self, last: &E) {
        self.advance_cursor(last);
    }

    fn finish(&mut self) {
        self.mark_exhausted();
    }
}

impl<E, K: fmt::Debug> fmt::Debug for NoOffsetOptions<E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoOffsetOptions")
            .field("key", &self.key)
            .field("direction", &self.direction)
            .field("current", &self.current)
            .field("bounds", &self.bounds)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn decode_key<K: CursorKey>(field: &str, value: &Value) -> Result<K, ReadError> {
    K::from_value(value).ok_or_else(|| ReadError::KeyDecode {
        field: field.to_string(),
        value: value.clone(),
    })
}
