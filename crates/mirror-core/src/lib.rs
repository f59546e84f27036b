//! Mirror Core - generic value conversion engine
//!
//! This crate copies a source value into a destination value of a possibly
//! different structural type. It walks the destination field by field and
//! element by element and fills it from the matching parts of the source.
//!
//! # Main Components
//!
//! - **Shapes**: Structural types of values, including nominal records
//! - **Values**: Self-describing value trees with shared pointers
//! - **Conversion Engine**: Strict and best-effort mirroring between values
//! - **Error Handling**: Path-carrying error types using `thiserror`
//! - **JSON Bridge**: Dynamic value trees from and to `serde_json` documents
//!
//! # Example
//!
//! ```
//! use mirror_core::{convert_best_effort, Record, RecordShape, Result, Shape, Value};
//!
//! fn example() -> Result<()> {
//!     let person = RecordShape::builder("Person")
//!         .field("Name", Shape::String)
//!         .field("Age", Shape::U8)
//!         .build();
//!
//!     let source = Value::from_json_str(r#"{"Name": "Rendoru", "Age": "22"}"#)?;
//!     let mut dest = Value::Record(Record::new(person));
//!     convert_best_effort(&source, &mut dest)?;
//!
//!     assert_eq!(dest.to_string(), "Person{Name:Rendoru Age:22}");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod json;
pub mod mirror;
pub mod shape;
pub mod value;

// Re-export main types for convenience
pub use config::{ConvertOptions, DEFAULT_MAX_DEPTH};
pub use error::{ConversionMode, Error, Result};
pub use mirror::{convert, convert_best_effort, Mirror};
pub use shape::{Family, FieldShape, Kind, RecordShape, RecordShapeBuilder, Shape};
pub use value::{List, Map, Pointer, Record, SharedValue, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
