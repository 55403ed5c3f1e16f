//! State variables: a tagged union bound to live storage inside a component.
//!
//! This module implements the typed value half of spec.md's "state variable":
//! 1. **Storage:** a tagged union over the numeric widths plus `String`.
//! 2. **Textual form:** parsing and formatting matching spec.md §6 (quoted
//!    strings, decimal/`0x` integers, `true`/`false` booleans).
//! 3. **Checksumming:** each variant feeds its tag and bytes into a hasher
//!    so two variables of different type but equal-looking value never
//!    collide.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::component::ComponentError;

/// A single typed value bound to a named slot inside a `Component`.
///
/// Mirrors spec.md's tagged union over `{string, u8, u16, u32, u64, i8,
/// i16, i32, i64}`. There is no boolean variant in the data model proper,
/// but spec.md's textual grammar accepts `true`/`false` as aliases for the
/// numeric value `1`/`0` of whatever the destination variable's type is.
#[derive(Clone, Debug, PartialEq)]
pub enum Variable {
    /// A UTF-8 string value.
    Str(String),
    /// An unsigned 8-bit value.
    U8(u8),
    /// An unsigned 16-bit value.
    U16(u16),
    /// An unsigned 32-bit value.
    U32(u32),
    /// An unsigned 64-bit value.
    U64(u64),
    /// A signed 8-bit value.
    I8(i8),
    /// A signed 16-bit value.
    I16(i16),
    /// A signed 32-bit value.
    I32(i32),
    /// A signed 64-bit value.
    I64(i64),
}

impl Variable {
    /// Returns the type tag as used in the serialized form and in error
    /// messages (e.g. `"u32"`, `"str"`).
    pub fn type_tag(&self) -> &'static str {
        match self {
            Variable::Str(_) => "str",
            Variable::U8(_) => "u8",
            Variable::U16(_) => "u16",
            Variable::U32(_) => "u32",
            Variable::U64(_) => "u64",
            Variable::I8(_) => "i8",
            Variable::I16(_) => "i16",
            Variable::I32(_) => "i32",
            Variable::I64(_) => "i64",
        }
    }

    /// Formats the value using spec.md §6's textual grammar: double-quoted
    /// strings, `0x`-prefixed hex for unsigned integers, decimal for
    /// signed integers.
    pub fn to_text(&self) -> String {
        match self {
            Variable::Str(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Variable::U8(v) => format!("0x{v:x}"),
            Variable::U16(v) => format!("0x{v:x}"),
            Variable::U32(v) => format!("0x{v:x}"),
            Variable::U64(v) => format!("0x{v:x}"),
            Variable::I8(v) => format!("{v}"),
            Variable::I16(v) => format!("{v}"),
            Variable::I32(v) => format!("{v}"),
            Variable::I64(v) => format!("{v}"),
        }
    }

    /// Parses `text` into a value of the same variant as `self`, replacing
    /// `self`'s contents in place. This is `SetVariableValue`'s per-variable
    /// behavior: the existing binding's type determines how the text is
    /// interpreted, exactly as spec.md describes ("parses the textual form
    /// appropriate to the variable's type").
    pub fn set_from_text(&mut self, text: &str) -> Result<(), ComponentError> {
        let text = text.trim();
        *self = match self {
            Variable::Str(_) => Variable::Str(parse_quoted_string(text)?),
            Variable::U8(_) => Variable::U8(parse_unsigned(text)? as u8),
            Variable::U16(_) => Variable::U16(parse_unsigned(text)? as u16),
            Variable::U32(_) => Variable::U32(parse_unsigned(text)? as u32),
            Variable::U64(_) => Variable::U64(parse_unsigned(text)?),
            Variable::I8(_) => Variable::I8(parse_signed(text)? as i8),
            Variable::I16(_) => Variable::I16(parse_signed(text)? as i16),
            Variable::I32(_) => Variable::I32(parse_signed(text)? as i32),
            Variable::I64(_) => Variable::I64(parse_signed(text)?),
        };
        Ok(())
    }

    /// Folds this value's type tag and bytes into `hasher`, contributing to
    /// a component's checksum. The type tag is included so e.g. `U8(1)`
    /// and `I8(1)` never hash identically.
    pub fn feed_checksum<H: Hasher>(&self, hasher: &mut H) {
        self.type_tag().hash(hasher);
        match self {
            Variable::Str(s) => s.hash(hasher),
            Variable::U8(v) => v.hash(hasher),
            Variable::U16(v) => v.hash(hasher),
            Variable::U32(v) => v.hash(hasher),
            Variable::U64(v) => v.hash(hasher),
            Variable::I8(v) => v.hash(hasher),
            Variable::I16(v) => v.hash(hasher),
            Variable::I32(v) => v.hash(hasher),
            Variable::I64(v) => v.hash(hasher),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

fn parse_quoted_string(text: &str) -> Result<String, ComponentError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| ComponentError::BadVariableText(text.to_string()))?;
    Ok(inner.replace("\\\"", "\"").replace("\\\\", "\\"))
}

fn parse_unsigned(text: &str) -> Result<u64, ComponentError> {
    if text.eq_ignore_ascii_case("true") {
        return Ok(1);
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(0);
    }
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else {
        (text, 10)
    };
    u64::from_str_radix(digits, radix).map_err(|_| ComponentError::BadVariableText(text.to_string()))
}

fn parse_signed(text: &str) -> Result<i64, ComponentError> {
    if text.eq_ignore_ascii_case("true") {
        return Ok(1);
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(0);
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map_err(|_| ComponentError::BadVariableText(text.to_string()));
    }
    text.parse::<i64>().map_err(|_| ComponentError::BadVariableText(text.to_string()))
}
