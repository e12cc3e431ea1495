//! Static entity metadata consulted when a reader is assembled.
//!
//! The model is never read per row: it only lets key fields be validated
//! up front, including fields an entity inherits from a base entity.

#[cfg(test)]
mod tests;

use derive_more::Display;

///
/// FieldKind
///
/// Minimal type surface needed to validate cursor key fields.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum FieldKind {
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("uint")]
    Uint,
    #[display("text")]
    Text,
    /// Marker for fields that are not filterable or orderable.
    #[display("unsupported")]
    Unsupported,
}

impl FieldKind {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint)
    }

    #[must_use]
    pub const fn is_orderable(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

///
/// FieldModel
///

#[derive(Debug)]
pub struct FieldModel {
    /// Field name as used in predicates and ordering.
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldModel {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

///
/// EntityModel
///
/// Runtime model for one entity. `base` points at the model of the entity
/// this one extends; its fields are visible through [`EntityModel::field`].
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified path (for diagnostics).
    pub path: &'static str,
    /// Identity field; may be declared on a base entity.
    pub primary_key: &'static str,
    /// Fields declared directly on this entity.
    pub fields: &'static [FieldModel],
    pub base: Option<&'static Self>,
}

impl EntityModel {
    /// Look a field up on this entity, then walk the base chain.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldModel> {
        let mut model = Some(self);

        while let Some(current) = model {
            if let Some(field) = current.fields.iter().find(|f| f.name == name) {
                return Some(field);
            }
            model = current.base;
        }

        None
    }

    /// Path of the entity (or ancestor) that declares `name`.
    #[must_use]
    pub fn declaring_path(&self, name: &str) -> Option<&'static str> {
        let mut model = Some(self);

        while let Some(current) = model {
            if current.fields.iter().any(|f| f.name == name) {
                return Some(current.path);
            }
            model = current.base;
        }

        None
    }
}
