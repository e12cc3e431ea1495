
use crate::{
    model::{EntityModel, FieldKind},
    value::Value,
};
use derive_more::Display;
use std::fmt::Debug;

///
/// Entity
///
/// A materialized row produced by a store.
///
/// `field_value` exists for the store side of the boundary (predicate
/// evaluation, grouping, sorting). The paging engine extracts cursor keys
/// through typed accessors and never calls it.
///

pub trait Entity: Clone + Debug {
    const MODEL: &'static EntityModel;

    fn field_value(&self, field: &str) -> Option<Value>;

    /// True for the placeholder row some stores emit when an aggregate
    /// query matched no groups. A page whose first row is a marker is
    /// treated as empty.
    fn is_empty_marker(&self) -> bool {
        false
    }
}

///
/// FieldValue
///
/// Conversion boundary for values used in predicates and cursors.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}

impl FieldValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }

    fn from_value(_value: &Value) -> Option<Self> {
        None
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

///
/// KeyKind
///
/// Which family of ordered scalars a cursor key belongs to.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum KeyKind {
    #[display("numeric")]
    Numeric,
    #[display("text")]
    Text,
}

impl KeyKind {
    /// Whether a model field of `kind` can carry a key of this family.
    #[must_use]
    pub const fn accepts(self, kind: FieldKind) -> bool {
        match self {
            Self::Numeric => kind.is_numeric(),
            Self::Text => matches!(kind, FieldKind::Text),
        }
    }
}

///
/// CursorKey
///
/// Ordered scalar usable as a keyset cursor.
///

pub trait CursorKey: FieldValue + Clone + Debug + Ord {
    const KIND: KeyKind;
}

///
/// NumericKey
///
/// Marker for numeric cursor keys; used to constrain `NumberOptions`.
///

pub trait NumericKey: CursorKey {}

impl CursorKey for String {
    const KIND: KeyKind = KeyKind::Text;
}

macro_rules! impl_signed_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => Self::try_from(*v).ok(),
                        Value::Uint(v) => Self::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }

            impl CursorKey for $ty {
                const KIND: KeyKind = KeyKind::Numeric;
            }

            impl NumericKey for $ty {}
        )*
    };
}

macro_rules! impl_unsigned_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Uint(u64::from(*self))
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Uint(v) => Self::try_from(*v).ok(),
                        Value::Int(v) => Self::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }

            impl CursorKey for $ty {
                const KIND: KeyKind = KeyKind::Numeric;
            }

            impl NumericKey for $ty {}
        )*
    };
}

impl_signed_key!(i8, i16, i32, i64);
impl_unsigned_key!(u8, u16, u32, u64);
