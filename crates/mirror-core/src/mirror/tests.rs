//! Tests for the conversion engine
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::{convert, convert_best_effort, Mirror};
use crate::config::ConvertOptions;
use crate::error::Error;
use crate::shape::{RecordShape, Shape};
use crate::value::{Pointer, Record, Value};
use std::sync::Arc;

fn person_shape(age: Shape) -> Arc<RecordShape> {
    RecordShape::builder("Person")
        .field("Name", Shape::String)
        .field("Age", age)
        .build()
}

fn person(age: Value) -> Value {
    let shape = person_shape(age.shape());
    let record = Record::new(shape)
        .with("Name", "Rendoru")
        .and_then(|r| r.with("Age", age))
        .unwrap();
    Value::Record(record)
}

fn parent_shape(child: Shape) -> Arc<RecordShape> {
    RecordShape::builder("Parent")
        .field("Name", Shape::String)
        .field("Child", child)
        .build()
}

fn string_map(entries: Vec<(&str, Value)>, value: Shape) -> Value {
    Value::map(
        Shape::String,
        value,
        entries.into_iter().map(|(k, v)| (Value::from(k), v)).collect(),
    )
}

#[test]
fn test_identical_shapes_copy() {
    let source = person(Value::I64(22));
    let mut dest = Value::zero(&source.shape());
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest, source);
}

#[test]
fn test_strict_rejects_width_change() {
    let source = person(Value::I64(22));
    let mut dest = Value::Record(Record::new(person_shape(Shape::U8)));
    let err = convert(&source, &mut dest).unwrap_err();
    match &err {
        Error::TypeMismatch { expected, found, path, .. } => {
            assert_eq!(expected, "u8");
            assert_eq!(found, "i64");
            assert_eq!(path, "$.Age");
        }
        other => panic!("unexpected error: {other}"),
    }
    // Fields before the failure keep their new values
    assert_eq!(dest.as_record().unwrap().get("Name"), Some(&Value::from("Rendoru")));
}

#[test]
fn test_best_effort_coerces_record_fields() {
    let source = person(Value::from("22"));
    let mut dest = Value::Record(Record::new(person_shape(Shape::U8)));
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(dest, person(Value::U8(22)));
}

#[test]
fn test_record_field_error_aborts_in_best_effort() {
    let source = person(Value::from("twenty-two"));
    let mut dest = Value::Record(Record::new(person_shape(Shape::I64)));
    let err = convert_best_effort(&source, &mut dest).unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.path(), Some("$.Age"));
}

#[test]
fn test_nested_record_path() {
    let child = person(Value::I64(5));
    let source_shape = parent_shape(child.shape());
    let source = Value::Record(
        Record::new(source_shape)
            .with("Name", "Parent")
            .and_then(|r| r.with("Child", child))
            .unwrap(),
    );

    let dest_shape = parent_shape(Shape::Record(person_shape(Shape::Bool)));
    let mut dest = Value::Record(Record::new(dest_shape));
    let err = convert(&source, &mut dest).unwrap_err();
    assert_eq!(err.path(), Some("$.Child.Age"));
}

#[test]
fn test_missing_and_private_fields() {
    let source_shape = RecordShape::builder("Source")
        .field("Name", Shape::String)
        .private_field("token", Shape::String)
        .build();
    let dest_shape = RecordShape::builder("Dest")
        .field("Name", Shape::String)
        .field("Extra", Shape::I64)
        .private_field("token", Shape::String)
        .build();

    let source = Value::Record(
        Record::new(source_shape)
            .with("Name", "Rendoru")
            .and_then(|r| r.with("token", "secret"))
            .unwrap(),
    );
    let mut dest = Value::Record(Record::new(dest_shape).with("Extra", 7i64).unwrap());
    convert(&source, &mut dest).unwrap();

    let dest = dest.as_record().unwrap();
    assert_eq!(dest.get("Name"), Some(&Value::from("Rendoru")));
    assert_eq!(dest.get("Extra"), Some(&Value::I64(7)));
    assert_eq!(dest.get("token"), Some(&Value::from("")));
}

#[test]
fn test_record_to_map_reads_exported_fields() {
    let shape = RecordShape::builder("Account")
        .field("Name", Shape::String)
        .field("Age", Shape::I64)
        .private_field("password", Shape::String)
        .build();
    let source = Value::Record(
        Record::new(shape)
            .with("Name", "Rendoru")
            .and_then(|r| r.with("Age", 22i64))
            .and_then(|r| r.with("password", "hunter2"))
            .unwrap(),
    );

    let mut dest = Value::nil_map(Shape::String, Shape::Dynamic);
    convert(&source, &mut dest).unwrap();

    let map = dest.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_str("Name"), Some(&Value::dynamic("Rendoru")));
    assert_eq!(map.get_str("Age"), Some(&Value::dynamic(22i64)));
    assert!(map.get_str("password").is_none());
}

#[test]
fn test_map_to_record() {
    let source = string_map(
        vec![("Name", Value::dynamic("Rendoru")), ("Age", Value::dynamic(22i64))],
        Shape::Dynamic,
    );

    let mut dest = Value::Record(Record::new(person_shape(Shape::U8)));
    let err = convert(&source, &mut dest).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.path(), Some("$.Age"));

    let mut dest = Value::Record(Record::new(person_shape(Shape::U8)));
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(dest, person(Value::U8(22)));
}

#[test]
fn test_map_to_record_skips_missing_keys() {
    let source = string_map(vec![("Name", Value::from("Rendoru"))], Shape::String);
    let mut dest = Value::Record(
        Record::new(person_shape(Shape::I64)).with("Age", 30i64).unwrap(),
    );
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest, person(Value::I64(30)));
}

#[test]
fn test_map_to_record_requires_string_keys() {
    let source = Value::map(Shape::I64, Shape::String, vec![(Value::I64(1), Value::from("a"))]);
    let mut dest = Value::Record(Record::new(person_shape(Shape::I64)));
    let err = convert_best_effort(&source, &mut dest).unwrap_err();
    match err {
        Error::TypeMismatch { expected, found, .. } => {
            assert_eq!(expected, "Person");
            assert_eq!(found, "map[i64]string");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_map_entries_dropped_in_best_effort() {
    let source = string_map(
        vec![("a", Value::from("1")), ("b", Value::from("x")), ("c", Value::from("3"))],
        Shape::String,
    );

    let mut dest = Value::nil_map(Shape::String, Shape::I64);
    convert_best_effort(&source, &mut dest).unwrap();
    let expected = string_map(vec![("a", Value::I64(1)), ("c", Value::I64(3))], Shape::I64);
    assert_eq!(dest, expected);

    let mut dest = Value::nil_map(Shape::String, Shape::I64);
    let err = convert(&source, &mut dest).unwrap_err();
    assert_eq!(err.path(), Some("$[\"a\"]"));
}

#[test]
fn test_map_zero_filter() {
    let source = string_map(
        vec![("zero", Value::I64(0)), ("", Value::I64(4)), ("two", Value::I64(2))],
        Shape::I64,
    );
    let mut dest = Value::nil_map(Shape::String, Shape::I32);
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(dest, string_map(vec![("two", Value::I32(2))], Shape::I32));
}

#[test]
fn test_map_merges_into_existing_entries() {
    let source = string_map(vec![("b", Value::I32(2))], Shape::I32);
    let mut dest = string_map(vec![("a", Value::I64(1)), ("b", Value::I64(9))], Shape::I64);
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(
        dest,
        string_map(vec![("a", Value::I64(1)), ("b", Value::I64(2))], Shape::I64)
    );
}

#[test]
fn test_map_key_errors() {
    let source = Value::map(
        Shape::Dynamic,
        Shape::String,
        vec![
            (Value::dynamic(1i64), Value::from("a")),
            (Value::dynamic("x"), Value::from("b")),
        ],
    );
    let expected = Value::map(Shape::I64, Shape::String, vec![(Value::I64(1), Value::from("a"))]);

    let mut dest = Value::nil_map(Shape::I64, Shape::String);
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(dest, expected);

    let mut dest = Value::nil_map(Shape::I64, Shape::String);
    let err = convert(&source, &mut dest).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.path(), Some("$[\"x\"]"));

    // String keys parse in best-effort mode and mismatch in strict mode
    let source = string_map(vec![("1", Value::from("a")), ("x", Value::from("b"))], Shape::String);
    let mut dest = Value::nil_map(Shape::I64, Shape::String);
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(dest, expected);

    let mut dest = Value::nil_map(Shape::I64, Shape::String);
    let err = convert(&source, &mut dest).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.path(), Some("$[\"1\"]"));
}

#[test]
fn test_large_map_conversion() {
    let entries = (1..=20_000i64)
        .map(|i| (Value::String(i.to_string()), Value::I64(i)))
        .collect();
    let source = Value::map(Shape::String, Shape::I64, entries);

    let mut dest = Value::nil_map(Shape::String, Shape::I32);
    convert_best_effort(&source, &mut dest).unwrap();

    let map = dest.as_map().unwrap();
    assert_eq!(map.len(), 20_000);
    assert_eq!(map.get_str("1"), Some(&Value::I32(1)));
    assert_eq!(map.get_str("20000"), Some(&Value::I32(20_000)));
    assert_eq!(map.entries()[9].0, Value::from("10"));
}

#[test]
fn test_dynamic_pointer_key_to_destination_pointee() {
    let dest_shape = Shape::map(Shape::Dynamic, Shape::I32);
    let mut dest = Value::pointer_to(Value::zero(&dest_shape));
    let target = dest.as_pointer().unwrap().target().unwrap().clone();
    let key = Value::dynamic(Pointer::shared(dest_shape, target));

    let source = Value::map(Shape::Dynamic, Shape::I64, vec![(key.clone(), Value::I64(7))]);
    convert_best_effort(&source, &mut dest).unwrap();
    let converted = dest.as_pointer().unwrap().get().unwrap();
    let map = converted.as_map().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&key), Some(&Value::I32(7)));

    // The failing key is rendered without reading the locked pointee
    let source = Value::map(Shape::Dynamic, Shape::String, vec![(key, Value::from("x"))]);
    let err = convert(&source, &mut dest).unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(err.path().unwrap().starts_with("$[0x"));
}

#[test]
fn test_list_elements_dropped_in_best_effort() {
    let source = Value::list(
        Shape::Dynamic,
        vec![Value::dynamic(1i64), Value::dynamic("x"), Value::dynamic(3i64)],
    );

    let mut dest = Value::nil_list(Shape::I64);
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(dest, Value::list(Shape::I64, vec![Value::I64(1), Value::I64(3)]));

    let mut dest = Value::nil_list(Shape::I64);
    let err = convert(&source, &mut dest).unwrap_err();
    assert_eq!(err.path(), Some("$[1]"));
}

#[test]
fn test_list_appends() {
    let source = Value::list(Shape::I32, vec![Value::I32(2), Value::I32(3)]);
    let mut dest = Value::list(Shape::I64, vec![Value::I64(1)]);
    convert_best_effort(&source, &mut dest).unwrap();
    assert_eq!(
        dest,
        Value::list(Shape::I64, vec![Value::I64(1), Value::I64(2), Value::I64(3)])
    );
}

#[test]
fn test_empty_source_list_materializes_destination() {
    let source = Value::list(Shape::I32, vec![]);
    let mut dest = Value::nil_list(Shape::I64);
    convert_best_effort(&source, &mut dest).unwrap();
    assert!(!dest.is_nil());
    assert_eq!(dest.as_list().unwrap().len(), 0);
}

#[test]
fn test_nil_sources_are_skipped() {
    let mut dest = Value::list(Shape::I64, vec![Value::I64(1)]);
    convert(&Value::nil_list(Shape::String), &mut dest).unwrap();
    assert_eq!(dest, Value::list(Shape::I64, vec![Value::I64(1)]));

    let mut dest = Value::I64(5);
    convert(&Value::null_pointer(Shape::String), &mut dest).unwrap();
    assert_eq!(dest, Value::I64(5));
}

#[test]
fn test_pointer_aliasing_on_identical_pointee() {
    let child = Value::pointer_to(person(Value::I64(5)));
    let shape = parent_shape(child.shape());
    let source = Value::Record(Record::new(shape.clone()).with("Child", child.clone()).unwrap());

    let mut dest = Value::Record(Record::new(shape));
    convert(&source, &mut dest).unwrap();

    let copied = dest.as_record().unwrap().get("Child").unwrap().as_pointer().unwrap();
    assert!(copied.ptr_eq(child.as_pointer().unwrap()));
}

#[test]
fn test_pointer_with_different_pointee_allocates() {
    let child = Value::pointer_to(person(Value::I64(5)));
    let source = Value::Record(
        Record::new(parent_shape(child.shape())).with("Child", child.clone()).unwrap(),
    );

    let dest_child = Shape::pointer(Shape::Record(person_shape(Shape::I32)));
    let mut dest = Value::Record(Record::new(parent_shape(dest_child)));
    convert_best_effort(&source, &mut dest).unwrap();

    let copied = dest.as_record().unwrap().get("Child").unwrap().as_pointer().unwrap();
    assert!(!copied.ptr_eq(child.as_pointer().unwrap()));
    assert_eq!(copied.get(), Some(person(Value::I32(5))));

    let dest_child = Shape::pointer(Shape::Record(person_shape(Shape::I32)));
    let mut dest = Value::Record(Record::new(parent_shape(dest_child)));
    let err = convert(&source, &mut dest).unwrap_err();
    assert_eq!(err.path(), Some("$.Child.*.Age"));
}

#[test]
fn test_value_into_pointer_destination() {
    let source = person(Value::I64(5));
    let mut slot = Value::nil_list(Shape::pointer(source.shape()));
    convert(&Value::list(source.shape(), vec![source.clone()]), &mut slot).unwrap();
    let item = &slot.as_list().unwrap().items()[0];
    assert_eq!(item.as_pointer().unwrap().get(), Some(source.clone()));

    // A top-level nil destination pointer has nothing to write through
    let mut dest = Value::null_pointer(source.shape());
    let err = convert(&source, &mut dest).unwrap_err();
    assert!(err.is_not_settable());
}

#[test]
fn test_entry_unwraps_pointers() {
    let source = Value::pointer_to(Value::I64(5));
    let mut dest = Value::pointer_to(Value::I64(0));
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest.as_pointer().unwrap().get(), Some(Value::I64(5)));
    assert!(!dest.as_pointer().unwrap().ptr_eq(source.as_pointer().unwrap()));
}

#[test]
fn test_aliased_source_and_destination_not_settable() {
    let shared = Value::pointer_to(Value::I64(1));
    let mut dest = shared.clone();
    let err = convert(&shared, &mut dest).unwrap_err();
    assert!(err.is_not_settable());
    assert_eq!(shared.as_pointer().unwrap().get(), Some(Value::I64(1)));
}

#[test]
fn test_nested_source_pointer_into_destination_not_settable() {
    let holder = RecordShape::builder("Holder")
        .field("X", Shape::pointer(Shape::I32))
        .build();
    let mut dest = Value::pointer_to(Value::Record(Record::new(holder.clone())));
    let target = dest.as_pointer().unwrap().target().unwrap().clone();

    let wrapper = RecordShape::builder("Wrapper")
        .field("X", Shape::pointer(Shape::Record(holder.clone())))
        .build();
    let back_ref = Pointer::shared(Shape::Record(holder), target);
    let source = Value::Record(Record::new(wrapper).with("X", back_ref).unwrap());

    let err = convert_best_effort(&source, &mut dest).unwrap_err();
    assert!(err.is_not_settable());
}

#[test]
fn test_dynamic_destination_wraps_source() {
    let mut dest = Value::empty_dynamic();
    convert(&Value::I64(5), &mut dest).unwrap();
    assert_eq!(dest, Value::dynamic(5i64));
}

#[test]
fn test_dynamic_source_unwraps() {
    let mut dest = Value::I64(0);
    convert(&Value::dynamic(5i64), &mut dest).unwrap();
    assert_eq!(dest, Value::I64(5));

    let mut dest = Value::I32(0);
    assert!(convert(&Value::dynamic(5i64), &mut dest).unwrap_err().is_type_mismatch());
    convert_best_effort(&Value::dynamic(5i64), &mut dest).unwrap();
    assert_eq!(dest, Value::I32(5));
}

#[test]
fn test_empty_dynamic_source() {
    let mut dest = Value::I64(3);
    let err = convert(&Value::empty_dynamic(), &mut dest).unwrap_err();
    assert!(err.is_type_mismatch());

    convert_best_effort(&Value::empty_dynamic(), &mut dest).unwrap();
    assert_eq!(dest, Value::I64(3));
}

fn nested_lists(depth: usize, leaf: Shape, value: Value) -> Value {
    let mut shape = leaf;
    let mut current = value;
    for _ in 0..depth {
        current = Value::list(shape.clone(), vec![current]);
        shape = Shape::list(shape);
    }
    current
}

fn nested_shape(depth: usize, leaf: Shape) -> Shape {
    (0..depth).fold(leaf, |shape, _| Shape::list(shape))
}

#[test]
fn test_depth_guard() {
    let source = nested_lists(3, Shape::I32, Value::I32(1));
    let mirror = Mirror::new(ConvertOptions::best_effort().with_max_depth(2));

    let mut dest = Value::zero(&nested_shape(3, Shape::I64));
    let err = mirror.convert(&source, &mut dest).unwrap_err();
    match err {
        Error::TooDeep { limit, path } => {
            assert_eq!(limit, 2);
            assert_eq!(path, "$[0][0][0]");
        }
        other => panic!("unexpected error: {other}"),
    }

    let mirror = Mirror::new(ConvertOptions::best_effort().with_max_depth(3));
    let mut dest = Value::zero(&nested_shape(3, Shape::I64));
    mirror.convert(&source, &mut dest).unwrap();
    assert_eq!(dest, nested_lists(3, Shape::I64, Value::I64(1)));
}

#[test]
fn test_unbounded_depth() {
    let source = nested_lists(200, Shape::I32, Value::I32(1));
    let mut dest = Value::zero(&nested_shape(200, Shape::I64));

    let err = convert_best_effort(&source, &mut dest).unwrap_err();
    assert!(err.is_too_deep());

    let mirror = Mirror::new(ConvertOptions::best_effort().unbounded());
    let mut dest = Value::zero(&nested_shape(200, Shape::I64));
    mirror.convert(&source, &mut dest).unwrap();
    assert_eq!(dest, nested_lists(200, Shape::I64, Value::I64(1)));
}

#[test]
fn test_mirror_reports_mode() {
    assert_eq!(Mirror::default(), Mirror::strict());
    assert!(Mirror::best_effort().mode().is_best_effort());
    assert_eq!(Mirror::strict().options().max_depth, Some(128));
}

#[test]
fn test_invalid_options_rejected_before_writing() {
    let mirror = Mirror::new(ConvertOptions::strict().with_max_depth(0));
    let mut dest = Value::I64(3);
    let err = mirror.convert(&Value::I64(5), &mut dest).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(dest, Value::I64(3));
}
