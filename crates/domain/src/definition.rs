use std::collections::{BTreeMap, BTreeSet};

use formwork_core::{AppError, AppResult};

use crate::FieldDefinition;

/// Form schema keyed by field name.
///
/// Built once per form type and shared across submissions. Cloning is cheap
/// because validators are reference counted.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    fields: BTreeMap<String, FieldDefinition>,
}

impl Definition {
    /// Creates a definition, rejecting duplicate field names.
    pub fn new(fields: impl IntoIterator<Item = FieldDefinition>) -> AppResult<Self> {
        let mut by_name = BTreeMap::new();
        for field in fields {
            let name = field.name().as_str().to_owned();
            if by_name.contains_key(&name) {
                return Err(AppError::Validation(format!(
                    "duplicate field name '{name}' in form definition"
                )));
            }
            by_name.insert(name, field);
        }

        Ok(Self { fields: by_name })
    }

    /// Returns the field declared under `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Returns every field in name order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Returns every field name in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the distinct group labels used by the fields.
    #[must_use]
    pub fn group_names(&self) -> BTreeSet<&str> {
        self.fields
            .values()
            .map(|field| field.group().as_str())
            .collect()
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Definition;
    use crate::{FieldDefinition, FieldType};

    fn field(name: &str, group: &str) -> FieldDefinition {
        FieldDefinition::new(name, group, FieldType::String).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn definition_rejects_duplicate_names() {
        let result = Definition::new([field("email", "user"), field("email", "profile")]);
        assert!(result.is_err());
    }

    #[test]
    fn definition_lists_fields_and_groups() {
        let definition = Definition::new([
            field("email", "user"),
            field("bio", "profile"),
            field("name", "user"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(definition.len(), 3);
        assert_eq!(
            definition.field_names().collect::<Vec<_>>(),
            ["bio", "email", "name"]
        );
        assert_eq!(
            definition.group_names().into_iter().collect::<Vec<_>>(),
            ["profile", "user"]
        );
        assert!(definition.field("missing").is_none());
    }
}
