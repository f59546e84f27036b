//! Scalar coercion rules
//!
//! In strict mode a scalar is copied only when source and destination have
//! the exact same kind, so `i32` into `i64` is a mismatch. Best-effort mode
//! coerces across whole families: any signed width, any unsigned width, any
//! float width, strings and booleans.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::engine::Walker;
use crate::error::{ConversionMode, Error, Result};
use crate::shape::{Family, Kind};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Numeric source widened to the widest member of its family
#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Number> {
        value
            .as_i64()
            .map(Number::Signed)
            .or_else(|| value.as_u64().map(Number::Unsigned))
            .or_else(|| value.as_f64().map(Number::Float))
    }

    /// Two's-complement reinterpretation for integers, truncation toward
    /// zero for floats
    fn to_i64(self) -> i64 {
        match self {
            Number::Signed(v) => v,
            Number::Unsigned(v) => v as i64,
            Number::Float(v) => v as i64,
        }
    }

    fn to_u64(self) -> u64 {
        match self {
            Number::Signed(v) => v as u64,
            Number::Unsigned(v) => v,
            Number::Float(v) => v as u64,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    fn to_f32(self) -> f32 {
        match self {
            Number::Signed(v) => v as f32,
            Number::Unsigned(v) => v as f32,
            Number::Float(v) => v as f32,
        }
    }

    fn is_positive(self) -> bool {
        match self {
            Number::Signed(v) => v > 0,
            Number::Unsigned(v) => v > 0,
            Number::Float(v) => v > 0.0,
        }
    }
}

impl Walker {
    /// Write a scalar destination from `source`
    pub(crate) fn mirror_leaf(&self, source: &Value, dest: &mut Value) -> Result<()> {
        let target = dest.kind();

        if self.mode == ConversionMode::Strict {
            if source.kind() != target {
                return Err(self.mismatch(target, source.shape()));
            }
            *dest = source.clone();
            return Ok(());
        }

        *dest = match target.family() {
            Family::Bool => self.coerce_bool(source)?,
            Family::Signed => self.coerce_signed(source, target)?,
            Family::Unsigned => self.coerce_unsigned(source, target)?,
            Family::Float => self.coerce_float(source, target)?,
            Family::String => self.coerce_string(source)?,
            _ => return Err(self.mismatch(target, source.shape())),
        };
        Ok(())
    }

    fn coerce_bool(&self, source: &Value) -> Result<Value> {
        match source {
            Value::Bool(v) => Ok(Value::Bool(*v)),
            Value::String(s) => parse_bool(s)
                .map(Value::Bool)
                .ok_or_else(|| self.parse_error(Kind::Bool, s, "invalid syntax")),
            other => match Number::of(other) {
                Some(number @ (Number::Signed(_) | Number::Unsigned(_))) => {
                    Ok(Value::Bool(number.is_positive()))
                }
                _ => Err(self.mismatch(Kind::Bool, other.shape())),
            },
        }
    }

    fn coerce_signed(&self, source: &Value, target: Kind) -> Result<Value> {
        if let Value::String(s) = source {
            return match target {
                Kind::I8 => self.parse(s, target, Value::I8),
                Kind::I16 => self.parse(s, target, Value::I16),
                Kind::I32 => self.parse(s, target, Value::I32),
                _ => self.parse(s, target, Value::I64),
            };
        }
        let wide = Number::of(source)
            .ok_or_else(|| self.mismatch(target, source.shape()))?
            .to_i64();
        Ok(match target {
            Kind::I8 => Value::I8(wide as i8),
            Kind::I16 => Value::I16(wide as i16),
            Kind::I32 => Value::I32(wide as i32),
            _ => Value::I64(wide),
        })
    }

    fn coerce_unsigned(&self, source: &Value, target: Kind) -> Result<Value> {
        if let Value::String(s) = source {
            return match target {
                Kind::U8 => self.parse(s, target, Value::U8),
                Kind::U16 => self.parse(s, target, Value::U16),
                Kind::U32 => self.parse(s, target, Value::U32),
                _ => self.parse(s, target, Value::U64),
            };
        }
        let wide = Number::of(source)
            .ok_or_else(|| self.mismatch(target, source.shape()))?
            .to_u64();
        Ok(match target {
            Kind::U8 => Value::U8(wide as u8),
            Kind::U16 => Value::U16(wide as u16),
            Kind::U32 => Value::U32(wide as u32),
            _ => Value::U64(wide),
        })
    }

    fn coerce_float(&self, source: &Value, target: Kind) -> Result<Value> {
        if let Value::String(s) = source {
            return match target {
                Kind::F32 => self.parse(s, target, Value::F32),
                _ => self.parse(s, target, Value::F64),
            };
        }
        let number = Number::of(source).ok_or_else(|| self.mismatch(target, source.shape()))?;
        Ok(match target {
            Kind::F32 => Value::F32(number.to_f32()),
            _ => Value::F64(number.to_f64()),
        })
    }

    fn coerce_string(&self, source: &Value) -> Result<Value> {
        match source {
            Value::String(s) => Ok(Value::String(s.clone())),
            other if other.kind().is_numeric() || other.kind() == Kind::Bool => {
                Ok(Value::String(other.to_string()))
            }
            other => Err(self.mismatch(Kind::String, other.shape())),
        }
    }

    fn parse<T>(&self, input: &str, target: Kind, wrap: fn(T) -> Value) -> Result<Value>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        input
            .parse::<T>()
            .map(wrap)
            .map_err(|e| self.parse_error(target, input, e))
    }

    fn parse_error(&self, target: Kind, input: &str, message: impl fmt::Display) -> Error {
        Error::Parse {
            target: target.to_string(),
            input: input.to_string(),
            message: message.to_string(),
            path: self.path(),
        }
    }
}

/// Boolean text in the spellings accepted by conventional boolean parsers
fn parse_bool(input: &str) -> Option<bool> {
    match input {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
