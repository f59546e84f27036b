//! Conversion engine for mirroring one value into another
//!
//! The engine walks the destination's structure and fills it from the
//! matching parts of the source:
//!
//! - `engine`: entry points, slot resolution and dispatch on the destination kind
//! - `composite`: record, map, list and pointer handlers
//! - `leaf`: scalar copy and coercion
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod composite;
mod engine;
mod leaf;

#[cfg(test)]
mod tests;

pub use engine::{convert, convert_best_effort, Mirror};
