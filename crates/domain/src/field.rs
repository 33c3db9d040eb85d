use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use formwork_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::coercion::{CoercionError, coerce_bool, coerce_string, coerce_uuid};
use crate::{FieldValue, Validator};

/// Declared type of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// `true`/`false`, also accepting `on`/`off` text.
    Bool,
    /// Text.
    String,
    /// Hyphenated identifier.
    Uuid,
    /// Type name with no coercion rule, kept so the failure is reported per
    /// field when the definition is applied.
    Unsupported(String),
}

impl FieldType {
    /// Returns a stable storage value for the field type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Unsupported(name) => name.as_str(),
        }
    }

    /// Coerces a raw value into this type.
    pub fn coerce(
        &self,
        value: &FieldValue,
        trim_whitespace: bool,
    ) -> Result<FieldValue, CoercionError> {
        match self {
            Self::Bool => coerce_bool(value, trim_whitespace),
            Self::String => coerce_string(value, trim_whitespace),
            Self::Uuid => coerce_uuid(value, trim_whitespace),
            Self::Unsupported(name) => Err(CoercionError::UnknownType(name.clone())),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "bool" => Self::Bool,
            "string" => Self::String,
            "uuid" => Self::Uuid,
            other => Self::Unsupported(other.to_owned()),
        })
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(field_type) => field_type,
            Err(never) => match never {},
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_owned()
    }
}

/// Schema entry for a single form field.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    name: NonEmptyString,
    group: NonEmptyString,
    field_type: FieldType,
    validators: Vec<Validator>,
    disable_trim: bool,
}

impl FieldDefinition {
    /// Creates a field definition with no validators and trimming enabled.
    ///
    /// `group` names the downstream destination the coerced value belongs to,
    /// e.g. a table, when one form feeds several.
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        field_type: FieldType,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            group: NonEmptyString::new(group)?,
            field_type,
            validators: Vec::new(),
            disable_trim: false,
        })
    }

    /// Appends a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Appends validators in order.
    #[must_use]
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Keeps surrounding whitespace in submitted text.
    #[must_use]
    pub fn disable_trim(mut self) -> Self {
        self.disable_trim = true;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the group label.
    #[must_use]
    pub fn group(&self) -> &NonEmptyString {
        &self.group
    }

    /// Returns the declared type.
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Returns validators in declared order.
    #[must_use]
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Returns whether whitespace trimming is suppressed.
    #[must_use]
    pub fn is_trim_disabled(&self) -> bool {
        self.disable_trim
    }

    /// Coerces a raw value according to this field's type and trim policy.
    pub fn coerce(&self, value: &FieldValue) -> Result<FieldValue, CoercionError> {
        self.field_type.coerce(value, !self.disable_trim)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDefinition, FieldType};
    use crate::{CoercionError, FieldValue, validator};

    #[test]
    fn field_requires_name_and_group() {
        assert!(FieldDefinition::new("", "account", FieldType::String).is_err());
        assert!(FieldDefinition::new("email", " ", FieldType::String).is_err());
    }

    #[test]
    fn field_type_round_trips_known_names() {
        for name in ["bool", "string", "uuid"] {
            let parsed: FieldType = name.parse().unwrap_or_else(|never| match never {});
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn field_type_keeps_unknown_names() {
        let parsed: FieldType = serde_json::from_str("\"date\"").unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed, FieldType::Unsupported("date".to_owned()));

        let result = parsed.coerce(&FieldValue::from("2024-01-01"), true);
        assert_eq!(result, Err(CoercionError::UnknownType("date".to_owned())));
    }

    #[test]
    fn disable_trim_is_honoured_by_coerce() {
        let field = FieldDefinition::new("bio", "profile", FieldType::String)
            .unwrap_or_else(|_| unreachable!())
            .disable_trim();

        assert!(field.is_trim_disabled());
        assert_eq!(field.coerce(&FieldValue::from(" hi ")), Ok(FieldValue::from(" hi ")));
    }

    #[test]
    fn validators_keep_declared_order() {
        let field = FieldDefinition::new("username", "account", FieldType::String)
            .unwrap_or_else(|_| unreachable!())
            .with_validator(validator::fail("first"))
            .with_validators([validator::fail("second"), validator::fail("third")]);

        let messages: Vec<String> = field
            .validators()
            .iter()
            .filter_map(|validator| validator.validate(&FieldValue::from("x")).err())
            .map(|error| error.message().to_owned())
            .collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }
}
