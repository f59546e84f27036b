//! Entry layer and recursive dispatcher
//!
//! [`Mirror::convert`] unwraps one leading pointer on each side and hands the
//! pair to a `Walker`, which resolves one destination slot at a time and
//! dispatches on the destination's kind. Composite handlers live in
//! `composite.rs`, scalar coercion in `leaf.rs`.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::config::ConvertOptions;
use crate::error::{ConversionMode, Error, Result};
use crate::value::{read_shared, try_write_shared, Value};
use std::fmt;

/// Convert `source` into `destination` without any implicit coercion
///
/// Every structural mismatch is an error. See [`convert_best_effort`] for the
/// coercing variant.
pub fn convert(source: &Value, destination: &mut Value) -> Result<()> {
    Mirror::strict().convert(source, destination)
}

/// Convert `source` into `destination`, coercing scalars where possible
///
/// Unconvertible map entries and list elements are dropped. Errors on record
/// fields still abort the whole conversion.
pub fn convert_best_effort(source: &Value, destination: &mut Value) -> Result<()> {
    Mirror::best_effort().convert(source, destination)
}

/// Configured conversion engine
///
/// A `Mirror` holds no state between calls and can be shared freely across
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mirror {
    options: ConvertOptions,
}

impl Mirror {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn strict() -> Self {
        Self::new(ConvertOptions::strict())
    }

    pub fn best_effort() -> Self {
        Self::new(ConvertOptions::best_effort())
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn mode(&self) -> ConversionMode {
        self.options.mode
    }

    /// Mirror `source` into `destination`
    ///
    /// A leading pointer is removed from both sides, so callers may pass a
    /// pointer to the value they want filled. A nil source pointer leaves the
    /// destination untouched. A nil destination pointer, or one whose pointee
    /// is already borrowed (for example because it is also the source),
    /// fails with [`Error::NotSettable`].
    ///
    /// The conversion is not transactional: on error, slots written before
    /// the failure keep their new values. Options that fail
    /// [`ConvertOptions::validate`] are rejected before anything is written.
    pub fn convert(&self, source: &Value, destination: &mut Value) -> Result<()> {
        let span = tracing::trace_span!("mirror.convert", mode = %self.options.mode);
        let _enter = span.enter();

        self.options.validate()?;

        let source_guard;
        let source = match source {
            Value::Pointer(pointer) => match pointer.target() {
                Some(target) => {
                    source_guard = read_shared(target);
                    &*source_guard
                }
                None => {
                    tracing::trace!("source is a nil pointer, nothing to mirror");
                    return Ok(());
                }
            },
            other => other,
        };

        match destination {
            Value::Pointer(pointer) => {
                let target = pointer.target().cloned().ok_or_else(|| Error::NotSettable {
                    message: "destination is a nil pointer, are you passing an empty handle?"
                        .to_string(),
                })?;
                let mut guard = try_write_shared(&target).ok_or_else(|| Error::NotSettable {
                    message: "destination pointee is already borrowed".to_string(),
                })?;
                Walker::new(&self.options).resolve(source, Slot::new(&mut *guard))
            }
            other => Walker::new(&self.options).resolve(source, Slot::new(other)),
        }
    }
}

/// Destination handle handed to the dispatcher
pub(crate) struct Slot<'a> {
    value: &'a mut Value,
    settable: bool,
}

impl<'a> Slot<'a> {
    pub(crate) fn new(value: &'a mut Value) -> Self {
        Self { value, settable: true }
    }

    /// Slot that is only writable when `settable` holds, e.g. a record field
    /// that may not be exported
    pub(crate) fn guarded(value: &'a mut Value, settable: bool) -> Self {
        Self { value, settable }
    }
}

/// One step of the path from the conversion root to the current slot
///
/// Map keys are kept as values and only rendered when a path is needed.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Field(String),
    Index(usize),
    Key(Value),
    Deref,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{}", name),
            Segment::Index(i) => write!(f, "[{}]", i),
            Segment::Key(key) => match key.as_dynamic().unwrap_or(key) {
                Value::String(s) => write!(f, "[{:?}]", s),
                other => write!(f, "[{}]", other),
            },
            Segment::Deref => f.write_str(".*"),
        }
    }
}

/// State of one top-level conversion: the mode, the depth guard and the
/// path to the slot currently being resolved
pub(crate) struct Walker {
    pub(crate) mode: ConversionMode,
    max_depth: Option<usize>,
    trail: Vec<Segment>,
}

impl Walker {
    pub(crate) fn new(options: &ConvertOptions) -> Self {
        Self {
            mode: options.mode,
            max_depth: options.max_depth,
            trail: Vec::new(),
        }
    }

    /// Resolve `source` into one destination slot
    pub(crate) fn resolve(&mut self, source: &Value, slot: Slot<'_>) -> Result<()> {
        // Inaccessible slots are skipped silently
        if !slot.settable {
            return Ok(());
        }

        // Absent sources leave the destination as it was
        if source.is_nil() {
            return Ok(());
        }

        // Identical structural types copy directly; pointers end up sharing
        // their pointee
        if source.same_shape(slot.value) {
            *slot.value = source.clone();
            return Ok(());
        }

        if let Value::Dynamic(held) = source {
            return match held {
                Some(inner) => self.resolve(inner, slot),
                None => self.resolve_empty_dynamic(slot),
            };
        }

        self.dispatch(source, slot.value)
    }

    fn dispatch(&mut self, source: &Value, dest: &mut Value) -> Result<()> {
        match dest {
            Value::Record(record) => self.mirror_record(source, record),
            Value::Map(map) => self.mirror_map(source, map),
            Value::List(list) => self.mirror_list(source, list),
            Value::Pointer(pointer) => self.mirror_pointer(source, pointer),
            Value::Dynamic(held) => {
                *held = Some(Box::new(source.clone()));
                Ok(())
            }
            leaf => self.mirror_leaf(source, leaf),
        }
    }

    fn resolve_empty_dynamic(&self, slot: Slot<'_>) -> Result<()> {
        match self.mode {
            ConversionMode::BestEffort => Ok(()),
            ConversionMode::Strict => Err(self.mismatch(slot.value.shape(), "empty dynamic")),
        }
    }

    /// Run `f` one level deeper, under `segment`
    pub(crate) fn descend<T>(
        &mut self,
        segment: Segment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if let Some(limit) = self.max_depth {
            if self.trail.len() >= limit {
                return Err(Error::TooDeep {
                    limit,
                    path: format!("{}{}", self.path(), segment),
                });
            }
        }
        self.trail.push(segment);
        let result = f(self);
        self.trail.pop();
        result
    }

    /// Drop a failed map entry or list element in best-effort mode;
    /// everything else propagates
    pub(crate) fn absorb(&self, err: Error, what: &str) -> Result<()> {
        if self.mode.is_best_effort() && !err.is_too_deep() {
            tracing::debug!(path = %self.path(), error = %err, "dropping unconvertible {}", what);
            return Ok(());
        }
        Err(err)
    }

    pub(crate) fn path(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.trail {
            path.push_str(&segment.to_string());
        }
        path
    }

    pub(crate) fn mismatch(&self, expected: impl fmt::Display, found: impl fmt::Display) -> Error {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            path: self.path(),
            mode: self.mode,
        }
    }
}
