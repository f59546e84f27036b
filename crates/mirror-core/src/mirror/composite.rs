//! Handlers for composite destinations: records, maps, lists and pointers
//!
//! Each handler splits its destination into sub-slots and resolves the
//! matching part of the source into every one of them. Error handling
//! differs on purpose:
//!
//! - record fields: any error aborts the conversion, in both modes
//! - map entries and list elements: in best-effort mode a failing entry is
//!   dropped and traversal continues
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::engine::{Segment, Slot, Walker};
use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::value::{try_read_shared, List, Map, Pointer, Record, Value};

impl Walker {
    /// Fill a record destination field by field, matching names exactly
    pub(crate) fn mirror_record(&mut self, source: &Value, record: &mut Record) -> Result<()> {
        match source {
            Value::Record(src) => {
                for (field, slot) in record.fields_mut() {
                    let found = src
                        .fields()
                        .find(|(f, _)| f.exported && f.name == field.name)
                        .map(|(_, v)| v);
                    let Some(value) = found else {
                        continue;
                    };
                    if matches!(value, Value::Pointer(p) if p.is_nil()) {
                        continue;
                    }
                    // TODO: let best-effort mode skip failing fields the way it skips
                    // map entries, once callers no longer rely on the abort
                    self.descend(Segment::Field(field.name.clone()), |w| {
                        w.resolve(value, Slot::guarded(slot, field.exported))
                    })?;
                }
                Ok(())
            }
            Value::Map(src) => {
                if !matches!(src.key_shape(), Shape::String | Shape::Dynamic) {
                    let found = Shape::map(src.key_shape().clone(), src.value_shape().clone());
                    return Err(self.mismatch(&record.shape().name, found));
                }
                for (field, slot) in record.fields_mut() {
                    let Some(value) = src.get_str(&field.name) else {
                        continue;
                    };
                    self.descend(Segment::Field(field.name.clone()), |w| {
                        w.resolve(value, Slot::guarded(slot, field.exported))
                    })?;
                }
                Ok(())
            }
            other => Err(self.mismatch(&record.shape().name, other.shape())),
        }
    }

    /// Merge entries into a map destination
    pub(crate) fn mirror_map(&mut self, source: &Value, map: &mut Map) -> Result<()> {
        match source {
            Value::Map(src) => {
                for (key, value) in src.entries() {
                    self.mirror_entry(key, value, map)?;
                }
                Ok(())
            }
            Value::Record(src) => {
                for (field, value) in src.fields().filter(|(f, _)| f.exported) {
                    let key = Value::String(field.name.clone());
                    self.mirror_entry(&key, value, map)?;
                }
                Ok(())
            }
            other => Err(self.mismatch(
                Shape::map(map.key_shape().clone(), map.value_shape().clone()),
                other.shape(),
            )),
        }
    }

    /// Convert one entry into fresh key and value slots; zero keys and zero
    /// values are never inserted
    fn mirror_entry(&mut self, key: &Value, value: &Value, map: &mut Map) -> Result<()> {
        self.descend(Segment::Key(key.clone()), |w| {
            let mut new_key = Value::zero(map.key_shape());
            if let Err(err) = w.resolve(key, Slot::new(&mut new_key)) {
                return w.absorb(err, "map key");
            }
            if new_key.is_zero() {
                return Ok(());
            }

            let mut new_value = Value::zero(map.value_shape());
            if let Err(err) = w.resolve(value, Slot::new(&mut new_value)) {
                return w.absorb(err, "map value");
            }
            if new_value.is_zero() {
                return Ok(());
            }

            map.insert(new_key, new_value);
            Ok(())
        })
    }

    /// Append converted source elements to a list destination
    pub(crate) fn mirror_list(&mut self, source: &Value, list: &mut List) -> Result<()> {
        let Value::List(src) = source else {
            return Err(self.mismatch(Shape::list(list.elem_shape().clone()), source.shape()));
        };

        let elem = list.elem_shape().clone();
        let items = list.storage();
        for (index, item) in src.items().iter().enumerate() {
            let converted = self.descend(Segment::Index(index), |w| {
                let mut converted = Value::zero(&elem);
                match w.resolve(item, Slot::new(&mut converted)) {
                    Ok(()) => Ok(Some(converted)),
                    Err(err) => w.absorb(err, "list element").map(|()| None),
                }
            })?;
            if let Some(converted) = converted {
                items.push(converted);
            }
        }
        Ok(())
    }

    /// Point the destination at the source's pointee when the pointee shapes
    /// match, otherwise at a fresh pointee filled from the source
    pub(crate) fn mirror_pointer(&mut self, source: &Value, pointer: &mut Pointer) -> Result<()> {
        if let Value::Pointer(src) = source {
            if src.pointee_shape() == pointer.pointee_shape() {
                *pointer = src.clone();
                return Ok(());
            }
        }

        let mut pointee = Value::zero(pointer.pointee_shape());
        let result = match source {
            Value::Pointer(src) => match src.target() {
                Some(target) => {
                    // The only writer is the top-level destination pointee
                    let guard = try_read_shared(target).ok_or_else(|| Error::NotSettable {
                        message: format!("source pointee at {} is the destination", self.path()),
                    })?;
                    self.descend(Segment::Deref, |w| w.resolve(&*guard, Slot::new(&mut pointee)))
                }
                None => return Ok(()),
            },
            other => self.descend(Segment::Deref, |w| w.resolve(other, Slot::new(&mut pointee))),
        };
        pointer.bind(pointee);
        result
    }
}
