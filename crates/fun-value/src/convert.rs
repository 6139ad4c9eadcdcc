//! Bridges between statically typed Rust values and [`Value`].

use fun_types::Type;

use crate::{Sequence, Value};

/// A Rust type with a fixed runtime [`Type`].
pub trait Typed {
    fn ty() -> Type;
}

/// Extract a Rust value from a [`Value`] of the matching type.
pub trait FromValue: Typed + Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

/// Wrap a Rust value as a [`Value`] of type [`Typed::ty`].
pub trait IntoValue: Typed {
    fn into_value(self) -> Value;
}

macro_rules! scalar {
    ($rust:ty, $ty:expr, $variant:ident) => {
        impl Typed for $rust {
            fn ty() -> Type {
                $ty
            }
        }

        impl FromValue for $rust {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }

        impl IntoValue for $rust {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

scalar!(i64, Type::Int, Int);
scalar!(f64, Type::Float, Float);
scalar!(bool, Type::Bool, Bool);
scalar!(String, Type::String, Str);

impl Typed for () {
    fn ty() -> Type {
        Type::Unit
    }
}

impl FromValue for () {
    fn from_value(value: &Value) -> Option<Self> {
        matches!(value, Value::Unit).then_some(())
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Unit
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn ty() -> Type {
        Type::list(T::ty())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        let seq = value.as_list()?;
        if *seq.element() != T::ty() {
            return None;
        }
        seq.iter().map(T::from_value).collect()
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(Sequence::of(self))
    }
}
