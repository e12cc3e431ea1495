//! Module: cursor
//! Responsibility: keyset cursor state and the query augmentation it drives.
//! Does not own: page buffering or isolation (see `reader`).
//! Boundary: readers call options through the `PageQuery` seam.

mod accessor;
mod options;

#[cfg(test)]
mod tests;

pub use accessor::KeyField;
pub use options::{CursorState, KeyBounds, NoOffsetOptions, NumberOptions, StringOptions};
