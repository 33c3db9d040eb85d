//! Form schema, untyped values, coercion rules and validators.

#![forbid(unsafe_code)]

pub mod coercion;
mod definition;
mod field;
mod value;
pub mod validator;

pub use coercion::CoercionError;
pub use definition::Definition;
pub use field::{FieldDefinition, FieldType};
pub use validator::{ValidationError, Validator};
pub use value::FieldValue;
