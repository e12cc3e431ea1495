use crate::{
    config::ReaderConfig,
    cursor::NoOffsetOptions,
    error::{ConfigError, ReadError},
    obs::{ReaderEvent, SinkHandle, default_sink},
    query::Query,
    reader::{ItemReader, PageQuery, isolation::Isolation, zero::ZeroOffsetQuery},
    store::{DataSource, Session},
    traits::{CursorKey, Entity},
};
use std::collections::VecDeque;

/// Name readers get unless configured otherwise.
pub(crate) const DEFAULT_READER_NAME: &str = "nooffset_paging_reader";

///
/// PagingReader
///
/// Page-at-a-time reader over `base`. Holds one materialized page and hands
/// rows out one by one; when the page runs dry it asks `P` for the next
/// page's query and fetches it through the session opened in `open()`.
///
/// Not shareable between workers: every lifecycle call takes `&mut self`.
///

pub struct PagingReader<E: Entity, D: DataSource<E>, P> {
    name: String,
    source: D,
    session: Option<D::Session>,
    base: Query<E>,
    page_query: P,
    page_size: u32,
    isolation: Isolation,
    max_item_count: Option<u64>,
    sink: SinkHandle,

    // page state
    buffer: VecDeque<E>,
    page: u32,
    exhausted: bool,
    read_count: u64,
}

impl<E, D, K> PagingReader<E, D, NoOffsetOptions<E, K>>
where
    E: Entity,
    D: DataSource<E>,
    K: CursorKey,
{
    /// Keyset reader: pages are selected by the key cursor in `options`.
    pub fn no_offset(
        source: D,
        page_size: u32,
        options: NoOffsetOptions<E, K>,
        base: Query<E>,
    ) -> Result<Self, ConfigError> {
        Self::new(source, page_size, options, base)
    }

    /// Cursor options, for inspecting the current key and bounds.
    #[must_use]
    pub const fn options(&self) -> &NoOffsetOptions<E, K> {
        &self.page_query
    }
}

impl<E, D> PagingReader<E, D, ZeroOffsetQuery>
where
    E: Entity,
    D: DataSource<E>,
{
    /// Reader that always re-reads the first page of `base`.
    pub fn zero_offset(source: D, page_size: u32, base: Query<E>) -> Result<Self, ConfigError> {
        Self::new(source, page_size, ZeroOffsetQuery, base)
    }
}

impl<E, D, P> PagingReader<E, D, P>
where
    E: Entity,
    D: DataSource<E>,
    P: PageQuery<E>,
{
    pub fn new(
        source: D,
        page_size: u32,
        page_query: P,
        base: Query<E>,
    ) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        Ok(Self {
            name: DEFAULT_READER_NAME.to_string(),
            source,
            session: None,
            base,
            page_query,
            page_size,
            isolation: Isolation::default(),
            max_item_count: None,
            sink: default_sink(),
            buffer: VecDeque::new(),
            page: 0,
            exhausted: false,
            read_count: 0,
        })
    }

    /// Assemble from a validated [`ReaderConfig`].
    pub fn from_config(
        source: D,
        config: &ReaderConfig,
        page_query: P,
        base: Query<E>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut reader = Self::new(source, config.page_size, page_query, base)?;
        reader.name.clone_from(&config.name);
        reader.isolation = config.isolation;
        reader.max_item_count = config.max_item_count;

        Ok(reader)
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub const fn isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Stop after `max` items even if more rows match.
    #[must_use]
    pub const fn max_item_count(mut self, max: u64) -> Self {
        self.max_item_count = Some(max);
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: SinkHandle) -> Self {
        self.sink = sink;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index of the next page to fetch.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items handed out since the last `open()`.
    #[must_use]
    pub const fn read_count(&self) -> u64 {
        self.read_count
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Isolation actually applied to fetches.
    #[must_use]
    pub fn effective_isolation(&self) -> Isolation {
        self.page_query
            .required_isolation()
            .unwrap_or(self.isolation)
    }

    #[must_use]
    pub const fn page_query(&self) -> &P {
        &self.page_query
    }

    /// The reader's session, for pipelines that write through it.
    pub const fn session_mut(&mut self) -> Option<&mut D::Session> {
        self.session.as_mut()
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    fn not_open(&self) -> ReadError {
        ReadError::NotOpen {
            name: self.name.clone(),
        }
    }

    const fn limit_reached(&self) -> bool {
        match self.max_item_count {
            Some(max) => self.read_count >= max,
            None => false,
        }
    }

    /// Fetch the next page into the buffer.
    ///
    /// Nothing is modified when the fetch fails, so a retried step resumes
    /// from the last cursor that was advanced successfully.
    fn fetch_next_page(&mut self) -> Result<(), ReadError> {
        let isolation = self.effective_isolation();
        let page = self.page;
        let page_size = self.page_size;

        let Some(session) = self.session.as_mut() else {
            return Err(ReadError::NotOpen {
                name: self.name.clone(),
            });
        };
        let base = &self.base;
        let page_query = &mut self.page_query;

        let rows = isolation.execute(session, |session| {
            page_query.prepare(session, base, page)?;
            let query = page_query.build(base, page).limit(page_size);

            Ok(session.fetch(&query)?)
        })?;

        self.sink.record(ReaderEvent::PageFetched {
            reader: &self.name,
            page,
            rows: rows.len(),
            isolated: isolation.is_isolated(),
        });
        self.page += 1;

        if rows.first().is_none_or(Entity::is_empty_marker) {
            self.buffer.clear();
            self.page_query.finish();
            self.mark_exhausted();
            return Ok(());
        }

        if let Some(last) = rows.last() {
            self.page_query.advance(last);
        }
        if rows.len() < usize::try_from(page_size).unwrap_or(usize::MAX) {
            self.page_query.finish();
            self.mark_exhausted();
        }
        self.buffer = rows.into();

        Ok(())
    }

    fn mark_exhausted(&mut self) {
        self.exhausted = true;
        self.sink.record(ReaderEvent::Exhausted {
            reader: &self.name,
            page: self.page,
            items: self.read_count,
        });
    }

    fn take_buffered(&mut self) -> Option<E> {
        let row = self.buffer.pop_front()?;
        self.read_count += 1;

        Some(row)
    }
}

impl<E, D, P> ItemReader<E> for PagingReader<E, D, P>
where
    E: Entity,
    D: DataSource<E>,
    P: PageQuery<E>,
{
    fn open(&mut self) -> Result<(), ReadError> {
        if self.session.is_some() {
            return Err(ReadError::AlreadyOpen {
                name: self.name.clone(),
            });
        }

        let session = self.source.open_session()?;
        self.session = Some(session);
        self.buffer.clear();
        self.page = 0;
        self.exhausted = false;
        self.read_count = 0;
        self.page_query.reset();

        self.sink.record(ReaderEvent::Opened {
            reader: &self.name,
        });

        Ok(())
    }

    fn read(&mut self) -> Result<Option<E>, ReadError> {
        if self.session.is_none() {
            return Err(self.not_open());
        }
        if self.limit_reached() {
            return Ok(None);
        }
        if let Some(row) = self.take_buffered() {
            return Ok(Some(row));
        }
        if self.exhausted {
            return Ok(None);
        }

        self.fetch_next_page()?;

        Ok(self.take_buffered())
    }

    fn close(&mut self) -> Result<(), ReadError> {
        self.buffer.clear();

        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        session.close()?;

        self.sink.record(ReaderEvent::Closed {
            reader: &self.name,
            items: self.read_count,
        });

        Ok(())
    }
}
