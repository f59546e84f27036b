//! Self-describing values that the conversion engine reads from and writes into
//!
//! Every [`Value`] knows its own [`Shape`], including the element, key and
//! pointee shapes of containers that are currently empty or absent. That is
//! what lets the engine build fresh destination slots and compare structural
//! types without any external type registry.
//!
//! Pointers hold their pointee behind an `Arc<RwLock<_>>`. Cloning a pointer
//! value clones the handle, not the pointee, so two pointer values may share
//! one target.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::shape::{FieldShape, Kind, RecordShape, Shape};
use hashbrown::HashTable;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};

/// Shared, lockable pointee of a [`Pointer`]
pub type SharedValue = Arc<RwLock<Value>>;

/// A value together with enough structure to describe its own shape
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    List(List),
    Map(Map),
    Record(Record),
    Pointer(Pointer),
    /// Wrapper that can hold a value of any shape, or nothing
    Dynamic(Option<Box<Value>>),
}

impl Value {
    /// Canonical zero value of a shape
    pub fn zero(shape: &Shape) -> Value {
        match shape {
            Shape::Bool => Value::Bool(false),
            Shape::I8 => Value::I8(0),
            Shape::I16 => Value::I16(0),
            Shape::I32 => Value::I32(0),
            Shape::I64 => Value::I64(0),
            Shape::U8 => Value::U8(0),
            Shape::U16 => Value::U16(0),
            Shape::U32 => Value::U32(0),
            Shape::U64 => Value::U64(0),
            Shape::F32 => Value::F32(0.0),
            Shape::F64 => Value::F64(0.0),
            Shape::String => Value::String(String::new()),
            Shape::List(elem) => Value::List(List::nil((**elem).clone())),
            Shape::Map(key, value) => {
                Value::Map(Map::nil((**key).clone(), (**value).clone()))
            }
            Shape::Record(record) => Value::Record(Record::new(record.clone())),
            Shape::Pointer(pointee) => Value::Pointer(Pointer::nil((**pointee).clone())),
            Shape::Dynamic => Value::Dynamic(None),
        }
    }

    /// Whether this is the canonical empty value of its shape
    ///
    /// Empty lists and maps count as zero alongside nil ones. A dynamic
    /// wrapper is zero only when it holds nothing.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(v) => !v,
            Value::I8(v) => *v == 0,
            Value::I16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U8(v) => *v == 0,
            Value::U16(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::String(s) => s.is_empty(),
            Value::List(list) => list.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Record(record) => record.values.iter().all(Value::is_zero),
            Value::Pointer(pointer) => pointer.is_nil(),
            Value::Dynamic(inner) => inner.is_none(),
        }
    }

    /// Absent pointer, list or map
    pub fn is_nil(&self) -> bool {
        match self {
            Value::List(list) => list.is_nil(),
            Value::Map(map) => map.is_nil(),
            Value::Pointer(pointer) => pointer.is_nil(),
            _ => false,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Record(_) => Kind::Record,
            Value::Pointer(_) => Kind::Pointer,
            Value::Dynamic(_) => Kind::Dynamic,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::List(list) => Shape::list(list.elem.clone()),
            Value::Map(map) => Shape::map(map.key.clone(), map.value.clone()),
            Value::Record(record) => Shape::Record(record.shape.clone()),
            Value::Pointer(pointer) => Shape::pointer(pointer.pointee.clone()),
            Value::Dynamic(_) => Shape::Dynamic,
            leaf => leaf_shape(leaf.kind()),
        }
    }

    /// Whether this value's structural type is exactly `shape`
    pub fn has_shape(&self, shape: &Shape) -> bool {
        match (self, shape) {
            (Value::List(list), Shape::List(elem)) => list.elem == **elem,
            (Value::Map(map), Shape::Map(key, value)) => map.key == **key && map.value == **value,
            (Value::Record(record), Shape::Record(other)) => {
                Arc::ptr_eq(&record.shape, other) || *record.shape == **other
            }
            (Value::Pointer(pointer), Shape::Pointer(pointee)) => pointer.pointee == **pointee,
            (Value::Dynamic(_), Shape::Dynamic) => true,
            (value, shape) => value.kind().is_leaf() && value.kind() == shape.kind(),
        }
    }

    /// Whether both values have the identical structural type
    pub fn same_shape(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a.elem == b.elem,
            (Value::Map(a), Value::Map(b)) => a.key == b.key && a.value == b.value,
            (Value::Record(a), Value::Record(b)) => {
                Arc::ptr_eq(&a.shape, &b.shape) || a.shape == b.shape
            }
            (Value::Pointer(a), Value::Pointer(b)) => a.pointee == b.pointee,
            (a, b) => a.kind() == b.kind(),
        }
    }

    pub fn list(elem: Shape, items: Vec<Value>) -> Value {
        Value::List(List::new(elem, items))
    }

    pub fn nil_list(elem: Shape) -> Value {
        Value::List(List::nil(elem))
    }

    pub fn map(key: Shape, value: Shape, entries: Vec<(Value, Value)>) -> Value {
        Value::Map(Map::new(key, value, entries))
    }

    pub fn nil_map(key: Shape, value: Shape) -> Value {
        Value::Map(Map::nil(key, value))
    }

    /// Pointer to a freshly allocated copy of `value`
    pub fn pointer_to(value: Value) -> Value {
        Value::Pointer(Pointer::to(value))
    }

    pub fn null_pointer(pointee: Shape) -> Value {
        Value::Pointer(Pointer::nil(pointee))
    }

    pub fn dynamic(value: impl Into<Value>) -> Value {
        Value::Dynamic(Some(Box::new(value.into())))
    }

    pub fn empty_dynamic() -> Value {
        Value::Dynamic(None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any signed integer, widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Any unsigned integer, widened to `u64`
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(v) => Some(u64::from(*v)),
            Value::U16(v) => Some(u64::from(*v)),
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Any float, widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&Pointer> {
        match self {
            Value::Pointer(pointer) => Some(pointer),
            _ => None,
        }
    }

    /// Value held by a dynamic wrapper
    pub fn as_dynamic(&self) -> Option<&Value> {
        match self {
            Value::Dynamic(inner) => inner.as_deref(),
            _ => None,
        }
    }
}

fn leaf_shape(kind: Kind) -> Shape {
    match kind {
        Kind::Bool => Shape::Bool,
        Kind::I8 => Shape::I8,
        Kind::I16 => Shape::I16,
        Kind::I32 => Shape::I32,
        Kind::I64 => Shape::I64,
        Kind::U8 => Shape::U8,
        Kind::U16 => Shape::U16,
        Kind::U32 => Shape::U32,
        Kind::U64 => Shape::U64,
        Kind::F32 => Shape::F32,
        Kind::F64 => Shape::F64,
        _ => Shape::String,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(s) => f.write_str(s),
            Value::List(list) => {
                if list.is_nil() {
                    return f.write_str("nil");
                }
                f.write_str("[")?;
                for (i, item) in list.items().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                if map.is_nil() {
                    return f.write_str("nil");
                }
                f.write_str("map[")?;
                for (i, (key, value)) in map.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                write!(f, "{}{{", record.shape.name)?;
                for (i, (field, value)) in record.fields().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", field.name, value)?;
                }
                f.write_str("}")
            }
            Value::Pointer(pointer) => match &pointer.target {
                // A pointee locked for writing is printed by address
                Some(target) => match try_read_shared(target) {
                    Some(guard) => write!(f, "&{}", *guard),
                    None => write!(f, "{:p}", Arc::as_ptr(target)),
                },
                None => f.write_str("nil"),
            },
            Value::Dynamic(Some(inner)) => write!(f, "{}", inner),
            Value::Dynamic(None) => f.write_str("nil"),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    List => List,
    Map => Map,
    Record => Record,
    Pointer => Pointer,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// Ordered sequence of values sharing one element shape
///
/// Items are expected to have the element shape; the engine only ever
/// appends values it built from that shape.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    elem: Shape,
    items: Option<Vec<Value>>,
}

impl List {
    pub fn new(elem: Shape, items: Vec<Value>) -> Self {
        Self {
            elem,
            items: Some(items),
        }
    }

    /// Absent list
    pub fn nil(elem: Shape) -> Self {
        Self { elem, items: None }
    }

    pub fn elem_shape(&self) -> &Shape {
        &self.elem
    }

    pub fn items(&self) -> &[Value] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn is_nil(&self) -> bool {
        self.items.is_none()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Item storage, allocated on first use
    pub(crate) fn storage(&mut self) -> &mut Vec<Value> {
        self.items.get_or_insert_with(Vec::new)
    }
}

/// Key/value container with structurally compared keys
///
/// Entries keep insertion order so traversal is deterministic. Equality is
/// order-insensitive. Lookups go through a hash index over the entry
/// positions, so building a map of `n` entries is linear in `n`.
#[derive(Clone)]
pub struct Map {
    key: Shape,
    value: Shape,
    entries: Option<Vec<(Value, Value)>>,
    index: HashTable<usize>,
}

impl Map {
    pub fn new(key: Shape, value: Shape, entries: Vec<(Value, Value)>) -> Self {
        let mut map = Self {
            key,
            value,
            entries: Some(Vec::with_capacity(entries.len())),
            index: HashTable::with_capacity(entries.len()),
        };
        for (k, v) in entries {
            map.insert(k, v);
        }
        map
    }

    /// Absent map
    pub fn nil(key: Shape, value: Shape) -> Self {
        Self {
            key,
            value,
            entries: None,
            index: HashTable::new(),
        }
    }

    pub fn key_shape(&self) -> &Shape {
        &self.key
    }

    pub fn value_shape(&self) -> &Shape {
        &self.value
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        self.entries.as_deref().unwrap_or(&[])
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let entries = self.entries();
        self.index
            .find(key_hash(key), |&i| entries[i].0 == *key)
            .map(|&i| &entries[i].1)
    }

    /// Look up the entry whose key is the string `name`, either directly or
    /// held by a dynamic key
    pub fn get_str(&self, name: &str) -> Option<&Value> {
        let entries = self.entries();
        self.index
            .find(str_hash(name), |&i| {
                let key = &entries[i].0;
                key.as_dynamic().unwrap_or(key).as_str() == Some(name)
            })
            .map(|&i| &entries[i].1)
    }

    /// Insert an entry, replacing and returning the value of an equal key
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let hash = key_hash(&key);
        let entries = self.entries.get_or_insert_with(Vec::new);
        if let Some(&i) = self.index.find(hash, |&i| entries[i].0 == key) {
            return Some(std::mem::replace(&mut entries[i].1, value));
        }
        entries.push((key, value));
        self.index
            .insert_unique(hash, entries.len() - 1, |&i| key_hash(&entries[i].0));
        None
    }

    pub fn is_nil(&self) -> bool {
        self.entries.is_none()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("entries", &self.entries)
            .finish()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        if self.key != other.key || self.value != other.value {
            return false;
        }
        match (&self.entries, &other.entries) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| other.get(k) == Some(v))
            }
            _ => false,
        }
    }
}

/// Hash of a map key, consistent with `Value` equality
///
/// Never takes a pointee lock: pointers hash by pointee shape only. A dynamic
/// wrapper hashes as the value it holds, so string keys and dynamic string
/// keys land in the same bucket for [`Map::get_str`].
fn key_hash(key: &Value) -> u64 {
    let mut state = DefaultHasher::new();
    hash_value(key, &mut state);
    state.finish()
}

fn str_hash(name: &str) -> u64 {
    let mut state = DefaultHasher::new();
    Kind::String.hash(&mut state);
    name.hash(&mut state);
    state.finish()
}

fn hash_value(value: &Value, state: &mut impl Hasher) {
    if let Value::Dynamic(Some(inner)) = value {
        return hash_value(inner, state);
    }
    value.kind().hash(state);
    match value {
        Value::Bool(v) => v.hash(state),
        Value::I8(v) => v.hash(state),
        Value::I16(v) => v.hash(state),
        Value::I32(v) => v.hash(state),
        Value::I64(v) => v.hash(state),
        Value::U8(v) => v.hash(state),
        Value::U16(v) => v.hash(state),
        Value::U32(v) => v.hash(state),
        Value::U64(v) => v.hash(state),
        // -0.0 == 0.0, so both hash as positive zero
        Value::F32(v) => (*v + 0.0).to_bits().hash(state),
        Value::F64(v) => (*v + 0.0).to_bits().hash(state),
        Value::String(s) => s.hash(state),
        Value::List(list) => {
            list.elem.hash(state);
            list.len().hash(state);
            for item in list.items() {
                hash_value(item, state);
            }
        }
        // Map equality ignores order, so only the shapes and size count
        Value::Map(map) => {
            map.key.hash(state);
            map.value.hash(state);
            map.len().hash(state);
        }
        Value::Record(record) => {
            record.shape.name.hash(state);
            for value in &record.values {
                hash_value(value, state);
            }
        }
        Value::Pointer(pointer) => pointer.pointee.hash(state),
        Value::Dynamic(_) => {}
    }
}

/// Instance of a [`RecordShape`], holding one value per declared field
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: Arc<RecordShape>,
    values: Vec<Value>,
}

impl Record {
    /// Record with every field at its zero value
    pub fn new(shape: Arc<RecordShape>) -> Self {
        let values = shape.fields().iter().map(|f| Value::zero(&f.shape)).collect();
        Self { shape, values }
    }

    /// Record from positional field values, checked against the shape
    pub fn from_values(shape: Arc<RecordShape>, values: Vec<Value>) -> Result<Self> {
        if values.len() != shape.len() {
            return Err(Error::InvalidRecord {
                record: shape.name.clone(),
                message: format!("expected {} field values, got {}", shape.len(), values.len()),
            });
        }
        for (field, value) in shape.fields().iter().zip(&values) {
            check_field(&shape, field, value)?;
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> &Arc<RecordShape> {
        &self.shape
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.position(name).map(|i| &self.values[i])
    }

    /// Replace a field's value; the value must have the field's shape
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let index = self.shape.position(name).ok_or_else(|| Error::InvalidRecord {
            record: self.shape.name.clone(),
            message: format!("no field named {}", name),
        })?;
        check_field(&self.shape, &self.shape.fields()[index], &value)?;
        self.values[index] = value;
        Ok(())
    }

    /// Chaining form of [`Record::set`]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Field declarations paired with their values, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&FieldShape, &Value)> {
        self.shape.fields().iter().zip(self.values.iter())
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = (&FieldShape, &mut Value)> {
        self.shape.fields().iter().zip(self.values.iter_mut())
    }
}

fn check_field(shape: &RecordShape, field: &FieldShape, value: &Value) -> Result<()> {
    if value.has_shape(&field.shape) {
        return Ok(());
    }
    Err(Error::TypeMismatch {
        expected: field.shape.to_string(),
        found: value.shape().to_string(),
        path: format!("{}.{}", shape.name, field.name),
        mode: crate::error::ConversionMode::Strict,
    })
}

/// Shared indirection over a value of one pointee shape
#[derive(Debug, Clone)]
pub struct Pointer {
    pointee: Shape,
    target: Option<SharedValue>,
}

impl Pointer {
    /// Pointer to a freshly allocated `value`
    pub fn to(value: Value) -> Self {
        Self {
            pointee: value.shape(),
            target: Some(Arc::new(RwLock::new(value))),
        }
    }

    /// Absent pointer
    pub fn nil(pointee: Shape) -> Self {
        Self {
            pointee,
            target: None,
        }
    }

    /// Pointer sharing an existing target
    pub fn shared(pointee: Shape, target: SharedValue) -> Self {
        Self {
            pointee,
            target: Some(target),
        }
    }

    pub fn pointee_shape(&self) -> &Shape {
        &self.pointee
    }

    pub fn target(&self) -> Option<&SharedValue> {
        self.target.as_ref()
    }

    pub fn is_nil(&self) -> bool {
        self.target.is_none()
    }

    /// Copy of the current pointee
    pub fn get(&self) -> Option<Value> {
        self.target.as_ref().map(|t| read_shared(t).clone())
    }

    /// Point at a freshly allocated `value`, dropping this handle's old target
    pub(crate) fn bind(&mut self, value: Value) {
        self.target = Some(Arc::new(RwLock::new(value)));
    }

    /// Whether both pointers share the same target
    pub fn ptr_eq(&self, other: &Pointer) -> bool {
        match (&self.target, &other.target) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        if self.pointee != other.pointee {
            return false;
        }
        match (&self.target, &other.target) {
            (None, None) => true,
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            // A pointee locked for writing only equals itself
            (Some(a), Some(b)) => match (try_read_shared(a), try_read_shared(b)) {
                (Some(a), Some(b)) => *a == *b,
                _ => false,
            },
            _ => false,
        }
    }
}

/// Read a shared pointee, tolerating a poisoned lock
pub(crate) fn read_shared(target: &SharedValue) -> RwLockReadGuard<'_, Value> {
    target.read().unwrap_or_else(PoisonError::into_inner)
}

/// Read a shared pointee without blocking; `None` while it is being written
pub(crate) fn try_read_shared(target: &SharedValue) -> Option<RwLockReadGuard<'_, Value>> {
    match target.try_read() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}

/// Take a shared pointee for writing without blocking
pub(crate) fn try_write_shared(target: &SharedValue) -> Option<RwLockWriteGuard<'_, Value>> {
    match target.try_write() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}
