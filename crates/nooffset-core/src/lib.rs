//! Core runtime for NoOffset: values, entity models, the query model handed
//! to stores, keyset cursor options, and the paging readers built on them.
#![warn(unreachable_pub)]

pub mod config;
pub mod cursor;
pub mod direction;
pub mod error;
pub mod model;
pub mod obs;
pub mod query;
pub mod reader;
pub mod store;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Page size used when a reader is assembled without an explicit one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

///
/// Prelude
///
/// Domain vocabulary only; stores, errors and sinks are imported explicitly.
///

pub mod prelude {
    pub use crate::{
        cursor::{KeyField, NoOffsetOptions, NumberOptions, StringOptions},
        direction::Direction,
        model::{EntityModel, FieldKind, FieldModel},
        query::{FieldRef, Query},
        reader::{ItemReader, Isolation, PagingReader},
        traits::{CursorKey, Entity, FieldValue},
        value::Value,
    };
}
