//! The dynamic value model compared by the recursive comparison engine.
//!
//! A [`Value`] is either a built-in value (scalars, containers and atomic
//! wrappers), an enum constant, or a composite [`Object`] described by a
//! [`TypeInfo`](crate::TypeInfo). Heap-backed values carry a reference
//! identity, which is what cycle detection keys on.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, Ordering as MemoryOrdering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::object::Object;
use crate::representation::{Representation, StandardRepresentation};

// ---------------------------------------------------------------------------
// EnumValue
// ---------------------------------------------------------------------------

/// A constant of an enumerated type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumValue {
    type_name: Arc<str>,
    name: Arc<str>,
}

impl EnumValue {
    pub fn new(type_name: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The declared constant name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Collections and maps
// ---------------------------------------------------------------------------

/// The flavour of a [`Collection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Ordered, duplicates allowed.
    List,
    /// Sets kept in natural order.
    SortedSet,
    /// Sets kept in insertion order.
    LinkedSet,
    /// Sets with no meaningful order.
    HashSet,
    /// Any other sequence of elements, compared by identity under `equals`.
    Iterable,
}

impl CollectionKind {
    /// The collection kinds whose iteration order is meaningful.
    pub const ORDERED: [CollectionKind; 3] = [
        CollectionKind::List,
        CollectionKind::SortedSet,
        CollectionKind::LinkedSet,
    ];

    pub fn is_ordered(self) -> bool {
        Self::ORDERED.contains(&self)
    }

    pub fn is_set(self) -> bool {
        matches!(
            self,
            CollectionKind::SortedSet | CollectionKind::LinkedSet | CollectionKind::HashSet
        )
    }

    pub fn type_name(self) -> &'static str {
        match self {
            CollectionKind::List => "List",
            CollectionKind::SortedSet => "SortedSet",
            CollectionKind::LinkedSet => "LinkedSet",
            CollectionKind::HashSet => "HashSet",
            CollectionKind::Iterable => "Iterable",
        }
    }
}

/// A sequence of values of some [`CollectionKind`].
#[derive(Debug)]
pub struct Collection {
    kind: CollectionKind,
    items: Vec<Value>,
}

impl Collection {
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item.equals(value))
    }

    fn equals(&self, other: &Collection) -> bool {
        match (self.kind, other.kind) {
            (CollectionKind::List, CollectionKind::List) => elementwise_equals(&self.items, &other.items),
            (a, b) if a.is_set() && b.is_set() => {
                self.len() == other.len() && self.items.iter().all(|item| other.contains(item))
            }
            _ => false,
        }
    }
}

/// Whether a [`MapValue`] keeps its keys sorted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    Hash,
    Sorted,
}

/// Key/value entries with unique keys.
#[derive(Debug)]
pub struct MapValue {
    kind: MapKind,
    entries: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn is_sorted(&self) -> bool {
        self.kind == MapKind::Sorted
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k.equals(key)).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    fn equals(&self, other: &MapValue) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| v.equals(o)))
    }
}

fn elementwise_equals(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
}

fn dedup_by_equals(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for item in items {
        if !unique.iter().any(|u| u.equals(&item)) {
            unique.push(item);
        }
    }
    unique
}

fn dedup_entries(entries: impl IntoIterator<Item = (Value, Value)>) -> Vec<(Value, Value)> {
    let mut unique: Vec<(Value, Value)> = Vec::new();
    for (key, value) in entries {
        match unique.iter_mut().find(|(k, _)| k.equals(&key)) {
            Some((_, slot)) => *slot = value,
            None => unique.push((key, value)),
        }
    }
    unique
}

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// Classification of a value's runtime type, used to pick a comparison routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Scalar,
    Enum,
    Array,
    OrderedCollection,
    UnorderedIterable,
    SortedMap,
    Map,
    Optional,
    AtomicBool,
    AtomicInt,
    AtomicLong,
    AtomicIntArray,
    AtomicLongArray,
    AtomicRef,
    AtomicRefArray,
    Composite,
}

impl ValueKind {
    /// Containers hold other values the engine compares one by one.
    pub fn is_container(self) -> bool {
        !matches!(
            self,
            ValueKind::Null | ValueKind::Scalar | ValueKind::Enum | ValueKind::Composite
        )
    }

    pub fn is_iterable(self) -> bool {
        matches!(self, ValueKind::OrderedCollection | ValueKind::UnorderedIterable)
    }

    pub fn is_map(self) -> bool {
        matches!(self, ValueKind::Map | ValueKind::SortedMap)
    }

    pub fn is_atomic(self) -> bool {
        matches!(
            self,
            ValueKind::AtomicBool
                | ValueKind::AtomicInt
                | ValueKind::AtomicLong
                | ValueKind::AtomicIntArray
                | ValueKind::AtomicLongArray
                | ValueKind::AtomicRef
                | ValueKind::AtomicRefArray
        )
    }

    /// Built-in types are compared with [`Value::equals`], never field by field.
    pub fn is_builtin(self) -> bool {
        !matches!(self, ValueKind::Null | ValueKind::Enum | ValueKind::Composite)
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A node of a compared object graph.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// A filesystem path. Paths are leaves even though they have components.
    Path(Arc<Path>),
    /// An opaque JSON node, compared as a whole.
    Json(Arc<serde_json::Value>),
    Enum(EnumValue),
    Array(Arc<Vec<Value>>),
    Collection(Arc<Collection>),
    Map(Arc<MapValue>),
    Optional(Option<Arc<Value>>),
    AtomicBool(Arc<AtomicBool>),
    AtomicInt(Arc<AtomicI32>),
    AtomicLong(Arc<AtomicI64>),
    AtomicIntArray(Arc<Vec<AtomicI32>>),
    AtomicLongArray(Arc<Vec<AtomicI64>>),
    AtomicRef(Arc<RwLock<Value>>),
    AtomicRefArray(Arc<Vec<RwLock<Value>>>),
    Object(Object),
}

fn address<T: ?Sized>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc) as *const () as usize
}

impl Value {
    // -- constructors --------------------------------------------------------

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Value::Path(Arc::from(path.into()))
    }

    /// Keep a JSON document as a single opaque leaf. Use `Value::from` to turn
    /// it into a traversable graph instead.
    pub fn json(json: serde_json::Value) -> Self {
        Value::Json(Arc::new(json))
    }

    pub fn enum_constant(type_name: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Value::Enum(EnumValue::new(type_name, name))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::collection(CollectionKind::List, items.into_iter().collect())
    }

    /// An iterable that is neither a list nor a set.
    pub fn iterable(items: impl IntoIterator<Item = Value>) -> Self {
        Self::collection(CollectionKind::Iterable, items.into_iter().collect())
    }

    pub fn hash_set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::collection(CollectionKind::HashSet, dedup_by_equals(items))
    }

    pub fn linked_set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::collection(CollectionKind::LinkedSet, dedup_by_equals(items))
    }

    pub fn sorted_set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique = dedup_by_equals(items);
        unique.sort_by(Value::natural_cmp);
        Self::collection(CollectionKind::SortedSet, unique)
    }

    fn collection(kind: CollectionKind, items: Vec<Value>) -> Self {
        Value::Collection(Arc::new(Collection { kind, items }))
    }

    /// A map iterating in insertion order. A repeated key keeps its first
    /// position and its last value.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(Arc::new(MapValue {
            kind: MapKind::Hash,
            entries: dedup_entries(entries),
        }))
    }

    /// A map iterating in natural key order.
    pub fn sorted_map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut entries = dedup_entries(entries);
        entries.sort_by(|(a, _), (b, _)| a.natural_cmp(b));
        Value::Map(Arc::new(MapValue {
            kind: MapKind::Sorted,
            entries,
        }))
    }

    pub fn optional(value: Option<Value>) -> Self {
        Value::Optional(value.map(Arc::new))
    }

    pub fn empty_optional() -> Self {
        Value::Optional(None)
    }

    pub fn atomic_bool(value: bool) -> Self {
        Value::AtomicBool(Arc::new(AtomicBool::new(value)))
    }

    pub fn atomic_int(value: i32) -> Self {
        Value::AtomicInt(Arc::new(AtomicI32::new(value)))
    }

    pub fn atomic_long(value: i64) -> Self {
        Value::AtomicLong(Arc::new(AtomicI64::new(value)))
    }

    pub fn atomic_int_array(values: impl IntoIterator<Item = i32>) -> Self {
        Value::AtomicIntArray(Arc::new(values.into_iter().map(AtomicI32::new).collect()))
    }

    pub fn atomic_long_array(values: impl IntoIterator<Item = i64>) -> Self {
        Value::AtomicLongArray(Arc::new(values.into_iter().map(AtomicI64::new).collect()))
    }

    pub fn atomic_ref(value: Value) -> Self {
        Value::AtomicRef(Arc::new(RwLock::new(value)))
    }

    pub fn atomic_ref_array(values: impl IntoIterator<Item = Value>) -> Self {
        Value::AtomicRefArray(Arc::new(values.into_iter().map(RwLock::new).collect()))
    }

    // -- classification ------------------------------------------------------

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_)
            | Value::Char(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Path(_)
            | Value::Json(_) => ValueKind::Scalar,
            Value::Enum(_) => ValueKind::Enum,
            Value::Array(_) => ValueKind::Array,
            Value::Collection(c) if c.kind.is_ordered() => ValueKind::OrderedCollection,
            Value::Collection(_) => ValueKind::UnorderedIterable,
            Value::Map(m) if m.is_sorted() => ValueKind::SortedMap,
            Value::Map(_) => ValueKind::Map,
            Value::Optional(_) => ValueKind::Optional,
            Value::AtomicBool(_) => ValueKind::AtomicBool,
            Value::AtomicInt(_) => ValueKind::AtomicInt,
            Value::AtomicLong(_) => ValueKind::AtomicLong,
            Value::AtomicIntArray(_) => ValueKind::AtomicIntArray,
            Value::AtomicLongArray(_) => ValueKind::AtomicLongArray,
            Value::AtomicRef(_) => ValueKind::AtomicRef,
            Value::AtomicRefArray(_) => ValueKind::AtomicRefArray,
            Value::Object(_) => ValueKind::Composite,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_empty_optional(&self) -> bool {
        matches!(self, Value::Optional(None))
    }

    /// The runtime type name, `None` for null.
    pub fn type_name(&self) -> Option<&str> {
        let name = match self {
            Value::Null => return None,
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "i64",
            Value::Float(_) => "f64",
            Value::Str(_) => "String",
            Value::Path(_) => "Path",
            Value::Json(_) => "Json",
            Value::Enum(e) => e.type_name(),
            Value::Array(_) => "Array",
            Value::Collection(c) => c.kind.type_name(),
            Value::Map(m) if m.is_sorted() => "SortedMap",
            Value::Map(_) => "HashMap",
            Value::Optional(_) => "Optional",
            Value::AtomicBool(_) => "AtomicBool",
            Value::AtomicInt(_) => "AtomicI32",
            Value::AtomicLong(_) => "AtomicI64",
            Value::AtomicIntArray(_) => "AtomicI32Array",
            Value::AtomicLongArray(_) => "AtomicI64Array",
            Value::AtomicRef(_) => "AtomicRef",
            Value::AtomicRefArray(_) => "AtomicRefArray",
            Value::Object(o) => o.type_name(),
        };
        Some(name)
    }

    /// Whether this value's type is `other`'s type or a subtype of it.
    /// Only composite types have supertypes; every other type is only
    /// compatible with itself. Null is compatible with nothing.
    pub fn is_same_or_subtype_of(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.type_info().is_same_or_subtype_of(b.type_info()),
            _ => match (self.type_name(), other.type_name()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    // -- identity ------------------------------------------------------------

    /// The reference identity of heap-backed values.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(address(a)),
            Value::Collection(c) => Some(address(c)),
            Value::Map(m) => Some(address(m)),
            Value::AtomicBool(a) => Some(address(a)),
            Value::AtomicInt(a) => Some(address(a)),
            Value::AtomicLong(a) => Some(address(a)),
            Value::AtomicIntArray(a) => Some(address(a)),
            Value::AtomicLongArray(a) => Some(address(a)),
            Value::AtomicRef(a) => Some(address(a)),
            Value::AtomicRefArray(a) => Some(address(a)),
            Value::Object(o) => Some(o.identity()),
            Value::Optional(Some(content)) => Some(address(content)),
            _ => None,
        }
    }

    /// Reference equality: both null, or both the same heap instance.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            _ => matches!((self.identity(), other.identity()), (Some(a), Some(b)) if a == b),
        }
    }

    // -- equality and hashing ------------------------------------------------

    /// The value's own notion of equality.
    ///
    /// Floats compare by bit pattern, sets and maps ignore order, atomics and
    /// plain iterables compare by identity, objects by identity unless their
    /// type overrides equality. Never recurses into object fields on its own.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b) || elementwise_equals(a, b),
            (Value::Collection(a), Value::Collection(b)) => Arc::ptr_eq(a, b) || a.equals(b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || a.equals(b),
            (Value::Optional(a), Value::Optional(b)) => match (a, b) {
                (None, None) => true,
                (Some(x), Some(y)) => x.equals(y),
                _ => false,
            },
            (Value::Object(a), Value::Object(b)) => a.equals(b),
            _ => self.identity().is_some() && self.same_instance(other),
        }
    }

    /// A hash consistent with [`Value::equals`].
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_into(&mut hasher);
        hasher.finish()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => (1u8, b).hash(state),
            Value::Char(c) => (2u8, c).hash(state),
            Value::Int(i) => (3u8, i).hash(state),
            Value::Float(f) => (4u8, f.to_bits()).hash(state),
            Value::Str(s) => (5u8, s).hash(state),
            Value::Path(p) => (6u8, p).hash(state),
            Value::Json(j) => (7u8, j.to_string()).hash(state),
            Value::Enum(e) => (8u8, e).hash(state),
            Value::Array(items) => {
                9u8.hash(state);
                items.iter().for_each(|item| item.hash_code().hash(state));
            }
            Value::Collection(c) => match c.kind {
                CollectionKind::List => {
                    10u8.hash(state);
                    c.items.iter().for_each(|item| item.hash_code().hash(state));
                }
                kind if kind.is_set() => {
                    let sum = c
                        .items
                        .iter()
                        .fold(0u64, |acc, item| acc.wrapping_add(item.hash_code()));
                    (11u8, sum).hash(state);
                }
                _ => (12u8, address(c)).hash(state),
            },
            Value::Map(m) => {
                let sum = m.entries.iter().fold(0u64, |acc, (k, v)| {
                    acc.wrapping_add(k.hash_code() ^ v.hash_code())
                });
                (13u8, sum).hash(state);
            }
            Value::Optional(inner) => {
                14u8.hash(state);
                if let Some(value) = inner {
                    value.hash_code().hash(state);
                }
            }
            // Instances with a custom equality may equal any other instance,
            // so they all share one bucket.
            Value::Object(o) if o.type_info().has_overridden_equals() => 15u8.hash(state),
            other => (16u8, other.identity()).hash(state),
        }
    }

    // -- ordering ------------------------------------------------------------

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Char(_) => 3,
            Value::Str(_) => 4,
            Value::Path(_) => 5,
            Value::Enum(_) => 6,
            _ => 7,
        }
    }

    /// A total order used to keep sorted sets and sorted maps sorted.
    ///
    /// Nulls first, then booleans, numbers, chars, strings, paths, enums, and
    /// everything else by its rendered form.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Path(a), Value::Path(b)) => a.cmp(b),
            (Value::Enum(a), Value::Enum(b)) => a
                .type_name()
                .cmp(b.type_name())
                .then_with(|| a.name().cmp(b.name())),
            _ => self
                .rank()
                .cmp(&other.rank())
                .then_with(|| self.to_string().cmp(&other.to_string())),
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The content of an atomic wrapper, read now.
    pub fn atomic_value(&self) -> Option<Value> {
        match self {
            Value::AtomicBool(a) => Some(Value::Bool(a.load(MemoryOrdering::SeqCst))),
            Value::AtomicInt(a) => Some(Value::Int(i64::from(a.load(MemoryOrdering::SeqCst)))),
            Value::AtomicLong(a) => Some(Value::Int(a.load(MemoryOrdering::SeqCst))),
            Value::AtomicRef(a) => Some(a.read().unwrap_or_else(PoisonError::into_inner).clone()),
            _ => None,
        }
    }

    /// The elements of an atomic array wrapper, read now.
    pub fn atomic_elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::AtomicIntArray(items) => Some(
                items
                    .iter()
                    .map(|a| Value::Int(i64::from(a.load(MemoryOrdering::SeqCst))))
                    .collect(),
            ),
            Value::AtomicLongArray(items) => Some(
                items
                    .iter()
                    .map(|a| Value::Int(a.load(MemoryOrdering::SeqCst)))
                    .collect(),
            ),
            Value::AtomicRefArray(items) => Some(
                items
                    .iter()
                    .map(|a| a.read().unwrap_or_else(PoisonError::into_inner).clone())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Replace the content of an atomic reference.
    pub fn set_atomic_ref(&self, value: Value) -> bool {
        match self {
            Value::AtomicRef(a) => {
                *a.write().unwrap_or_else(PoisonError::into_inner) = value;
                true
            }
            _ => false,
        }
    }

    /// Elements of arrays and collections, `None` for anything else.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            Value::Collection(c) => Some(c.items()),
            _ => None,
        }
    }
}

/// Strings print raw, everything else as the standard representation.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Char(c) => write!(f, "{c}"),
            other => f.write_str(&StandardRepresentation::default().to_string_of(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<&Object> for Value {
    fn from(v: &Object) -> Self {
        Value::Object(v.clone())
    }
}
