//! Module: reader
//! Responsibility: page buffering and the open/read/close lifecycle.
//! Does not own: cursor semantics (see `cursor`) or query execution (see `store`).
//! Boundary: the batch pipeline drives `ItemReader`; readers drive `PageQuery`.

mod isolation;
mod paging;
mod zero;


pub use isolation::Isolation;
pub use paging::PagingReader;
pub use zero::ZeroOffsetQuery;

pub(crate) use paging::DEFAULT_READER_NAME;

use crate::{error::ReadError, query::Query, store::Session, traits::Entity};

///
/// ItemReader
///
/// Pipeline-facing lifecycle. Callers `open`, call `read` until it returns
/// `Ok(None)`, then `close`.
///

pub trait ItemReader<T> {
    fn open(&mut self) -> Result<(), ReadError>;

    /// Next item, or `None` once the data is exhausted.
    fn read(&mut self) -> Result<Option<T>, ReadError>;

    fn close(&mut self) -> Result<(), ReadError>;

    /// Read up to `size` items; a short chunk means end-of-data was reached.
    fn read_chunk(&mut self, size: usize) -> Result<Vec<T>, ReadError> {
        let mut chunk = Vec::with_capacity(size);
        while chunk.len() < size {
            match self.read()? {
                Some(item) => chunk.push(item),
                None => break,
            }
        }

        Ok(chunk)
    }
}

///
/// PageQuery
///
/// Per-page query planning used by [`PagingReader`]. `prepare` runs inside
/// the page's unit of work before `build`; `advance` sees the last row of
/// every non-empty page.
///

pub trait PageQuery<E: Entity> {
    /// Drop all state; called when the reader is (re)opened.
    fn reset(&mut self);

    fn prepare<S: Session<E>>(
        &mut self,
        session: &mut S,
        base: &Query<E>,
        page: u32,
    ) -> Result<(), ReadError>;

    /// Query for `page`, before the reader applies the page-size limit.
    fn build(&self, base: &Query<E>, page: u32) -> Query<E>;

    fn advance(&mut self, last: &E);

    /// Called once when the reader reaches end-of-data.
    fn finish(&mut self) {}

    /// Isolation this strategy cannot work without, if any.
    fn required_isolation(&self) -> Option<Isolation> {
        None
    }
}
