use crate::{
    error::ConfigError,
    model::FieldModel,
    traits::{CursorKey, Entity},
};
use std::{fmt, marker::PhantomData};

///
/// KeyField
///
/// Typed accessor for the cursor key of entity `E`.
///
/// The name is what stores filter and order on; `extract` is what the
/// reader calls on the last row of every page. [`KeyField::resolve`]
/// checks the name against the entity model (base entities included) once,
/// so a misnamed key fails when the reader is assembled.
///

pub struct KeyField<E, K> {
    name: &'static str,
    extract: fn(&E) -> K,
    _marker: PhantomData<fn() -> K>,
}

impl<E: Entity, K: CursorKey> KeyField<E, K> {
    #[must_use]
    pub const fn new(name: &'static str, extract: fn(&E) -> K) -> Self {
        Self {
            name,
            extract,
            _marker: PhantomData,
        }
    }

    /// Build from a dotted path such as `"manufacture.id"`; the last
    /// segment names the field.
    pub fn from_path(path: &'static str, extract: fn(&E) -> K) -> Result<Self, ConfigError> {
        let name = path.rsplit('.').next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidFieldPath {
                path: path.to_string(),
            });
        }

        Ok(Self::new(name, extract))
    }

    /// Validate the field against `E::MODEL` and its base entities.
    pub fn resolve(&self) -> Result<&'static FieldModel, ConfigError> {
        let model = E::MODEL;
        let Some(field) = model.field(self.name) else {
            return Err(ConfigError::FieldNotFound {
                entity: model.path,
                field: self.name.to_string(),
            });
        };

        if !field.kind.is_orderable() || !K::KIND.accepts(field.kind) {
            return Err(ConfigError::FieldKindMismatch {
                entity: model.declaring_path(self.name).unwrap_or(model.path),
                field: self.name.to_string(),
                found: field.kind,
                expected: K::KIND,
            });
        }

        Ok(field)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn extract(&self, row: &E) -> K {
        (self.extract)(row)
    }
}

impl<E, K> Clone for KeyField<E, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, K> Copy for KeyField<E, K> {}

impl<E, K> fmt::Debug for KeyField<E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyField").field("name", &self.name).finish()
    }
}
