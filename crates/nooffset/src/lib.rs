//! ## Crate layout
//! - `core`: values, entity models, the query model, keyset cursor options,
//!   paging readers, the in-memory store, and observability sinks.
//!
//! The `prelude` module carries what a batch job needs to assemble and drive
//! a reader; stores, sinks and error types stay behind their module paths.

pub use nooffset_core as core;

pub use core::{
    config::ReaderConfig,
    error::{ConfigError, ReadError, StoreError},
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Job Prelude
///

pub mod prelude {
    pub use crate::core::{
        cursor::{KeyField, NoOffsetOptions, NumberOptions, StringOptions},
        direction::Direction,
        model::{EntityModel, FieldKind, FieldModel},
        query::{FieldRef, Query},
        reader::{ItemReader, Isolation, PagingReader, ZeroOffsetQuery},
        traits::{CursorKey as _, Entity, FieldValue as _},
        value::Value,
    };
}
