use std::collections::BTreeMap;

use formwork_domain::{CoercionError, Definition, FieldValue, ValidationError};
use thiserror::Error;

/// Problem recorded against a single submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field is absent from the permitted list.
    #[error("Using field {field} not permitted")]
    NotPermitted {
        /// Submitted field name.
        field: String,
    },

    /// Field declares a type the engine cannot coerce.
    #[error("unknown field type {field_type} when converting field {field}")]
    UnknownType {
        /// Declared type name.
        field_type: String,
        /// Submitted field name.
        field: String,
    },

    /// Value could not be coerced into the declared type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// A validator rejected the coerced value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Outcome of applying a definition to one submission.
///
/// `values` holds only fields that coerced successfully, `errors` only fields
/// with at least one problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedForm {
    values: BTreeMap<String, FieldValue>,
    errors: BTreeMap<String, Vec<FieldError>>,
}

impl AppliedForm {
    pub(crate) fn insert_value(&mut self, field: String, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub(crate) fn remove_value(&mut self, field: &str) {
        self.values.remove(field);
    }

    pub(crate) fn push_error(&mut self, field: &str, error: FieldError) {
        self.errors.entry(field.to_owned()).or_default().push(error);
    }

    /// Returns coerced values keyed by field name.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Returns field errors keyed by field name.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, Vec<FieldError>> {
        &self.errors
    }

    /// Returns the coerced value of one field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Returns the errors recorded for one field, in the order they occurred.
    #[must_use]
    pub fn errors_for(&self, field: &str) -> &[FieldError] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns whether no field recorded an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Renders errors as messages, ready to show next to form inputs.
    #[must_use]
    pub fn error_messages(&self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .iter()
            .map(|(field, errors)| {
                (
                    field.clone(),
                    errors.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    /// Returns the coerced values belonging to `group`.
    #[must_use]
    pub fn group(&self, definition: &Definition, group: &str) -> BTreeMap<String, FieldValue> {
        get_group(definition, group, &self.values)
    }

    /// Splits the outcome into values and errors.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, FieldValue>,
        BTreeMap<String, Vec<FieldError>>,
    ) {
        (self.values, self.errors)
    }
}

/// Selects the entries of an already coerced map whose field belongs to `group`.
///
/// Entries without a field in `definition` are left out.
#[must_use]
pub fn get_group(
    definition: &Definition,
    group: &str,
    values: &BTreeMap<String, FieldValue>,
) -> BTreeMap<String, FieldValue> {
    definition
        .fields()
        .filter(|field| field.group().as_str() == group)
        .filter_map(|field| {
            let name = field.name().as_str();
            values
                .get(name)
                .map(|value| (name.to_owned(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use formwork_domain::{Definition, FieldDefinition, FieldType, FieldValue};

    use super::{AppliedForm, FieldError, get_group};

    fn definition() -> Definition {
        Definition::new([
            FieldDefinition::new("email", "user", FieldType::String)
                .unwrap_or_else(|_| unreachable!()),
            FieldDefinition::new("active", "user", FieldType::Bool)
                .unwrap_or_else(|_| unreachable!()),
            FieldDefinition::new("bio", "profile", FieldType::String)
                .unwrap_or_else(|_| unreachable!()),
        ])
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn get_group_selects_members_present_in_map() {
        let values = BTreeMap::from([
            ("email".to_owned(), FieldValue::from("a@b.c")),
            ("bio".to_owned(), FieldValue::from("hello")),
            ("stray".to_owned(), FieldValue::from("ignored")),
        ]);

        let user = get_group(&definition(), "user", &values);
        assert_eq!(
            user,
            BTreeMap::from([("email".to_owned(), FieldValue::from("a@b.c"))])
        );

        let profile = get_group(&definition(), "profile", &values);
        assert_eq!(profile.len(), 1);
        assert!(get_group(&definition(), "billing", &values).is_empty());
    }

    #[test]
    fn into_parts_hands_over_values_and_errors() {
        let mut form = AppliedForm::default();
        form.insert_value("active".to_owned(), FieldValue::Bool(true));
        form.insert_value("bio".to_owned(), FieldValue::from("hello"));
        form.remove_value("bio");
        form.push_error(
            "bio",
            FieldError::NotPermitted {
                field: "bio".to_owned(),
            },
        );

        let (values, errors) = form.into_parts();
        assert_eq!(
            values,
            BTreeMap::from([("active".to_owned(), FieldValue::Bool(true))])
        );
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["bio"]);
    }

    #[test]
    fn error_messages_render_each_error() {
        let mut form = AppliedForm::default();
        form.push_error(
            "field6",
            FieldError::NotPermitted {
                field: "field6".to_owned(),
            },
        );

        assert!(!form.is_valid());
        assert_eq!(form.errors_for("field6").len(), 1);
        assert!(form.errors_for("field7").is_empty());
        assert_eq!(
            form.error_messages(),
            BTreeMap::from([(
                "field6".to_owned(),
                vec!["Using field field6 not permitted".to_owned()]
            )])
        );
    }
}
