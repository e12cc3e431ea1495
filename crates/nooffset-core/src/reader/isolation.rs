use crate::{error::ReadError, store::Session, traits::Entity};
use serde::{Deserialize, Serialize};
use tracing::warn;

///
/// Isolation
///
/// How a page fetch relates to the caller's unit of work.
///
/// `Isolated` gives every page its own transaction and flushes and clears
/// the session first, so the fetch sees earlier writes and deletes made
/// through it. Use it when the job deletes or rewrites rows it has already
/// read. `Shared` runs inside whatever transaction the caller holds and
/// detaches each fetched row so memory does not grow with the page count.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Isolation {
    #[default]
    Isolated,
    Shared,
}

impl Isolation {
    #[must_use]
    pub const fn is_isolated(self) -> bool {
        matches!(self, Self::Isolated)
    }

    /// Run one page fetch under this policy.
    ///
    /// In isolated mode a failure anywhere after `begin` (flush, `op` or
    /// commit) rolls the page transaction back before the page error is
    /// returned, so the session can start the next attempt cleanly.
    pub(crate) fn execute<E, S, F>(self, session: &mut S, op: F) -> Result<Vec<E>, ReadError>
    where
        E: Entity,
        S: Session<E>,
        F: FnOnce(&mut S) -> Result<Vec<E>, ReadError>,
    {
        match self {
            Self::Isolated => {
                session.begin()?;

                let result = run_isolated(session, op);
                if result.is_err()
                    && let Err(err) = session.rollback()
                {
                    warn!(error = %err, "page rollback failed");
                }

                result
            }
            Self::Shared => {
                let rows = op(session)?;
                for row in &rows {
                    session.detach(row);
                }

                Ok(rows)
            }
        }
    }
}

// flush -> clear -> op -> commit, inside a transaction the caller began
fn run_isolated<E, S, F>(session: &mut S, op: F) -> Result<Vec<E>, ReadError>
where
    E: Entity,
    S: Session<E>,
    F: FnOnce(&mut S) -> Result<Vec<E>, ReadError>,
{
    session.flush()?;
    session.clear();

    let rows = op(session)?;
    session.commit()?;

    Ok(rows)
}
