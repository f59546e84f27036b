//! Structural type descriptions for mirrored values
//!
//! A [`Shape`] is the full structural type of a value and plays the role a
//! runtime type plays in reflective languages: two values have an identical
//! structural type exactly when their shapes compare equal. [`Kind`] is the
//! coarser classification used for dispatch, and [`Family`] groups kinds of
//! different widths for best-effort coercion.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

/// Structural kind of a value, used to pick a conversion handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    List,
    Map,
    Record,
    Pointer,
    Dynamic,
}

/// Width-agnostic grouping of kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Bool,
    Signed,
    Unsigned,
    Float,
    String,
    List,
    Map,
    Record,
    Pointer,
    Dynamic,
}

impl Kind {
    pub fn family(self) -> Family {
        match self {
            Kind::Bool => Family::Bool,
            Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 => Family::Signed,
            Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64 => Family::Unsigned,
            Kind::F32 | Kind::F64 => Family::Float,
            Kind::String => Family::String,
            Kind::List => Family::List,
            Kind::Map => Family::Map,
            Kind::Record => Family::Record,
            Kind::Pointer => Family::Pointer,
            Kind::Dynamic => Family::Dynamic,
        }
    }

    /// Whether values of this kind are scalars handled by the leaf handlers
    pub fn is_leaf(self) -> bool {
        matches!(
            self.family(),
            Family::Bool | Family::Signed | Family::Unsigned | Family::Float | Family::String
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(self.family(), Family::Signed | Family::Unsigned | Family::Float)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Record => "record",
            Kind::Pointer => "pointer",
            Kind::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}

/// Full structural type of a value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// Ordered sequence of elements of one shape
    List(Box<Shape>),
    /// Key/value container
    Map(Box<Shape>, Box<Shape>),
    /// Named record with ordered fields
    Record(Arc<RecordShape>),
    /// Shared indirection over a pointee
    Pointer(Box<Shape>),
    /// Holds a value of any shape
    Dynamic,
}

impl Shape {
    pub fn list(elem: Shape) -> Self {
        Shape::List(Box::new(elem))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::Map(Box::new(key), Box::new(value))
    }

    pub fn pointer(pointee: Shape) -> Self {
        Shape::Pointer(Box::new(pointee))
    }

    pub fn record(shape: Arc<RecordShape>) -> Self {
        Shape::Record(shape)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Shape::Bool => Kind::Bool,
            Shape::I8 => Kind::I8,
            Shape::I16 => Kind::I16,
            Shape::I32 => Kind::I32,
            Shape::I64 => Kind::I64,
            Shape::U8 => Kind::U8,
            Shape::U16 => Kind::U16,
            Shape::U32 => Kind::U32,
            Shape::U64 => Kind::U64,
            Shape::F32 => Kind::F32,
            Shape::F64 => Kind::F64,
            Shape::String => Kind::String,
            Shape::List(_) => Kind::List,
            Shape::Map(..) => Kind::Map,
            Shape::Record(_) => Kind::Record,
            Shape::Pointer(_) => Kind::Pointer,
            Shape::Dynamic => Kind::Dynamic,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::List(elem) => write!(f, "[{}]", elem),
            Shape::Map(key, value) => write!(f, "map[{}]{}", key, value),
            Shape::Record(record) => f.write_str(&record.name),
            Shape::Pointer(pointee) => write!(f, "*{}", pointee),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// One field of a record shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldShape {
    pub name: String,
    pub shape: Shape,
    /// Non-exported fields are never read from or written to by the engine
    pub exported: bool,
}

/// Nominal record type: a name plus ordered, uniquely named fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordShape {
    pub name: String,
    fields: Vec<FieldShape>,
}

impl RecordShape {
    pub fn builder(name: impl Into<String>) -> RecordShapeBuilder {
        RecordShapeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`RecordShape`]
///
/// Declaring a field name twice replaces the earlier declaration in place.
#[derive(Debug, Clone)]
pub struct RecordShapeBuilder {
    name: String,
    fields: Vec<FieldShape>,
}

impl RecordShapeBuilder {
    /// Add an exported field
    pub fn field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.push(name.into(), shape, true)
    }

    /// Add a field the engine will neither read nor write
    pub fn private_field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.push(name.into(), shape, false)
    }

    fn push(mut self, name: String, shape: Shape, exported: bool) -> Self {
        let field = FieldShape { name, shape, exported };
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn build(self) -> Arc<RecordShape> {
        Arc::new(RecordShape {
            name: self.name,
            fields: self.fields,
        })
    }
}
