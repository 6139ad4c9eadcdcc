//! Opaque runtime values.
//!
//! A [`Value`] is a caller-supplied function, sequence, mapping or scalar
//! together with its runtime [`Type`]. Algorithms on the dynamic surface
//! receive only `Value`s; the solver checks their types against a call
//! pattern, and the [invoker](crate::invoke) calls the function values.
//!
//! Every `Value` has a ground type. Containers record their element type
//! explicitly so that an empty sequence still knows what it holds.

pub mod convert;
pub mod function;
pub mod invoke;

use std::collections::HashMap;
use std::fmt;

use fun_types::Type;

pub use convert::{FromValue, IntoValue, Typed};
pub use function::Function;
pub use invoke::{CallError, invoke, invoke_void, invoke1, invoke2};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A value could not be placed into a container of the given type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("element #{index} is {found}, sequence holds {expected}")]
    ElementType {
        index: usize,
        expected: Type,
        found: Type,
    },
    #[error("{key} cannot be used as a mapping key")]
    UnhashableKey { key: Type },
    #[error("mapping key is {found}, expected {expected}")]
    KeyType { expected: Type, found: Type },
    #[error("mapping value is {found}, expected {expected}")]
    ValueType { expected: Type, found: Type },
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A runtime-typed handle to a caller-supplied value.
#[derive(Clone)]
pub enum Value {
    Unit,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Sequence),
    Map(Mapping),
    Func(Function),
}

impl Value {
    /// The runtime type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Unit => Type::Unit,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Bool(_) => Type::Bool,
            Value::Str(_) => Type::String,
            Value::List(seq) => seq.ty(),
            Value::Map(map) => map.ty(),
            Value::Func(func) => Type::Function(func.ty().clone()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Sequence> {
        match self {
            Value::List(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Function> {
        match self {
            Value::Func(func) => Some(func),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Sequence> {
        match self {
            Value::List(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(seq) => f.debug_list().entries(seq.iter()).finish(),
            Value::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Func(func) => write!(f, "<{}>", func.ty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence handle
// ---------------------------------------------------------------------------

/// An ordered, indexable, length-known container of values sharing one
/// element type.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    element: Type,
    items: Vec<Value>,
}

impl Sequence {
    pub fn new(element: Type) -> Self {
        Self::with_capacity(element, 0)
    }

    pub fn with_capacity(element: Type, capacity: usize) -> Self {
        Self {
            element,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Build a sequence from typed Rust values.
    pub fn of<T: IntoValue>(items: Vec<T>) -> Self {
        Self {
            element: T::ty(),
            items: items.into_iter().map(IntoValue::into_value).collect(),
        }
    }

    /// Build a sequence from already-opaque values, checking each one.
    pub fn try_from_values(element: Type, items: Vec<Value>) -> Result<Self, ValueError> {
        for (index, item) in items.iter().enumerate() {
            let found = item.ty();
            if found != element {
                return Err(ValueError::ElementType {
                    index,
                    expected: element,
                    found,
                });
            }
        }
        Ok(Self { element, items })
    }

    pub fn element(&self) -> &Type {
        &self.element
    }

    pub fn ty(&self) -> Type {
        Type::list(self.element.clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// Append a value of this sequence's element type.
    pub fn push(&mut self, value: Value) -> Result<(), ValueError> {
        let found = value.ty();
        if found != self.element {
            return Err(ValueError::ElementType {
                index: self.items.len(),
                expected: self.element.clone(),
                found,
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Overwrite a slot in place. Used by callers that need to mutate a
    /// sequence they own after copying it.
    pub fn set(&mut self, index: usize, value: Value) -> Result<Option<Value>, ValueError> {
        let found = value.ty();
        if found != self.element {
            return Err(ValueError::ElementType {
                index,
                expected: self.element.clone(),
                found,
            });
        }
        Ok(self
            .items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value)))
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Hashable projection of a scalar value.
///
/// Floats hash and compare by bit pattern, so `0.0` and `-0.0` are distinct
/// keys and a NaN key matches only the identical NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Unit,
    Int(i64),
    Float(u64),
    Bool(bool),
    Str(String),
}

impl Key {
    fn of(value: &Value) -> Option<Key> {
        match value {
            Value::Unit => Some(Key::Unit),
            Value::Int(n) => Some(Key::Int(*n)),
            Value::Float(x) => Some(Key::Float(x.to_bits())),
            Value::Bool(b) => Some(Key::Bool(*b)),
            Value::Str(s) => Some(Key::Str(s.clone())),
            Value::List(_) | Value::Map(_) | Value::Func(_) => None,
        }
    }
}

/// A mapping from scalar keys to values, iterated in first-insertion order.
#[derive(Debug, Clone)]
pub struct Mapping {
    key: Type,
    value: Type,
    entries: Vec<(Value, Value)>,
    index: HashMap<Key, usize>,
}

impl Mapping {
    pub fn new(key: Type, value: Type) -> Result<Self, ValueError> {
        if !key.is_hashable() {
            return Err(ValueError::UnhashableKey { key });
        }
        Ok(Self {
            key,
            value,
            entries: Vec::new(),
            index: HashMap::new(),
        })
    }

    pub fn key_type(&self) -> &Type {
        &self.key
    }

    pub fn value_type(&self) -> &Type {
        &self.value
    }

    pub fn ty(&self) -> Type {
        Type::map(self.key.clone(), self.value.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let slot = *self.index.get(&Key::of(key)?)?;
        self.entries.get(slot).map(|(_, v)| v)
    }

    /// Insert or replace; returns the previous value for `key`.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<Option<Value>, ValueError> {
        let hashed = self.check_key(&key)?;
        let found = value.ty();
        if found != self.value {
            return Err(ValueError::ValueType {
                expected: self.value.clone(),
                found,
            });
        }
        match self.index.get(&hashed) {
            Some(&slot) => Ok(Some(std::mem::replace(&mut self.entries[slot].1, value))),
            None => {
                self.index.insert(hashed, self.entries.len());
                self.entries.push((key, value));
                Ok(None)
            }
        }
    }

    /// Append `item` to the list stored at `key`, starting an empty list if
    /// the key is absent. The mapping's value type must be `List(T)` with
    /// `item: T`; nothing is inserted when the item is rejected.
    pub fn push_to(&mut self, key: Value, item: Value) -> Result<(), ValueError> {
        let hashed = self.check_key(&key)?;
        let element = match &self.value {
            Type::List(element) if **element == item.ty() => (**element).clone(),
            _ => {
                return Err(ValueError::ValueType {
                    expected: self.value.clone(),
                    found: Type::list(item.ty()),
                });
            }
        };
        let slot = match self.index.get(&hashed) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(hashed, slot);
                self.entries.push((key, Value::List(Sequence::new(element))));
                slot
            }
        };
        match &mut self.entries[slot].1 {
            Value::List(members) => members.push(item),
            other => Err(ValueError::ValueType {
                expected: self.value.clone(),
                found: other.ty(),
            }),
        }
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn check_key(&self, key: &Value) -> Result<Key, ValueError> {
        let found = key.ty();
        if found != self.key {
            return Err(ValueError::KeyType {
                expected: self.key.clone(),
                found,
            });
        }
        Key::of(key).ok_or(ValueError::UnhashableKey { key: found })
    }
}

/// Mappings compare as unordered sets of entries.
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.value == other.value
            && self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}
