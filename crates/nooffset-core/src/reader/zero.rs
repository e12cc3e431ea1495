use crate::{
    error::ReadError,
    query::Query,
    reader::{Isolation, PageQuery},
    store::Session,
    traits::Entity,
};

///
/// ZeroOffsetQuery
///
/// Always fetches the first page of the base query. For jobs whose
/// processing moves every read row out of the filter (deletes, status
/// flips), the first page is always the next unprocessed one. If rows stay
/// in the filter the reader never ends.
///
/// Requires isolated fetches so each page sees the previous chunk's writes.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroOffsetQuery;

impl<E: Entity> PageQuery<E> for ZeroOffsetQuery {
    fn reset(&mut self) {}

    fn prepare<S: Session<E>>(
        &mut self,
        _session: &mut S,
        _base: &Query<E>,
        _page: u32,
    ) -> Result<(), ReadError> {
        Ok(())
    }

    fn build(&self, base: &Query<E>, _page: u32) -> Query<E> {
        base.clone().offset(0)
    }

    fn advance(&mut self, _last: &E) {}

    fn required_isolation(&self) -> Option<Isolation> {
        Some(Isolation::Isolated)
    }
}
