//! Conversion of untyped form input into the value a field declares.
//!
//! HTML forms submit everything as text, so a checkbox arrives as `"on"` and an
//! identifier arrives as its string form. Each function here accepts either the
//! already-typed value, which passes through untouched, or a string it can
//! interpret. Anything else is a type mismatch.

use thiserror::Error;
use uuid::Uuid;

use crate::FieldValue;

/// Length of the hyphenated 8-4-4-4-12 identifier form.
const HYPHENATED_UUID_LENGTH: usize = 36;

/// Reasons a raw value could not be coerced into its declared field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Runtime type of the value cannot be converted to the target type.
    #[error("cannot convert type {actual} to {target}")]
    TypeMismatch {
        /// Runtime type name of the submitted value.
        actual: &'static str,
        /// Type the field declares.
        target: &'static str,
    },

    /// Text was not one of the accepted boolean spellings.
    #[error("field must be true or false")]
    InvalidBool,

    /// Text parsed as an identifier but not in the hyphenated 8-4-4-4-12 form.
    #[error("uuid must be in hyphenated form, found {length} characters")]
    NotHyphenated {
        /// Length of the submitted text.
        length: usize,
    },

    /// Identifier parser rejected the text.
    #[error(transparent)]
    InvalidUuid(#[from] uuid::Error),

    /// Field declares a type with no coercion rule.
    #[error("unknown field type {0}")]
    UnknownType(String),
}

fn trimmed(text: &str, trim_whitespace: bool) -> &str {
    if trim_whitespace { text.trim() } else { text }
}

/// Coerces `"true"`/`"on"` and `"false"`/`"off"` into a boolean.
///
/// Matching is case-sensitive.
pub fn coerce_bool(
    value: &FieldValue,
    trim_whitespace: bool,
) -> Result<FieldValue, CoercionError> {
    match value {
        FieldValue::Bool(_) => Ok(value.clone()),
        FieldValue::Text(text) => match trimmed(text, trim_whitespace) {
            "true" | "on" => Ok(FieldValue::Bool(true)),
            "false" | "off" => Ok(FieldValue::Bool(false)),
            _ => Err(CoercionError::InvalidBool),
        },
        other => Err(CoercionError::TypeMismatch {
            actual: other.type_name(),
            target: "bool",
        }),
    }
}

/// Requires a string value, optionally trimming surrounding whitespace.
pub fn coerce_string(
    value: &FieldValue,
    trim_whitespace: bool,
) -> Result<FieldValue, CoercionError> {
    match value {
        FieldValue::Text(text) => Ok(FieldValue::Text(
            trimmed(text, trim_whitespace).to_owned(),
        )),
        other => Err(CoercionError::TypeMismatch {
            actual: other.type_name(),
            target: "string",
        }),
    }
}

/// Parses a hyphenated identifier, or passes an already parsed one through.
///
/// Parser failures surface unchanged. Text the parser accepts in another
/// layout (simple, braced, URN) is rejected afterwards.
pub fn coerce_uuid(
    value: &FieldValue,
    trim_whitespace: bool,
) -> Result<FieldValue, CoercionError> {
    match value {
        FieldValue::Uuid(_) => Ok(value.clone()),
        FieldValue::Text(text) => {
            let text = trimmed(text, trim_whitespace);
            let parsed = Uuid::try_parse(text)?;
            if text.len() != HYPHENATED_UUID_LENGTH {
                return Err(CoercionError::NotHyphenated { length: text.len() });
            }

            Ok(FieldValue::Uuid(parsed))
        }
        other => Err(CoercionError::TypeMismatch {
            actual: other.type_name(),
            target: "uuid",
        }),
    }
}
