use std::collections::BTreeSet;

use formwork_core::{AppError, AppResult};
use formwork_domain::{CoercionError, Definition, FieldValue};
use tracing::{debug, warn};

use crate::{AppliedForm, ApplyOptions, FieldError, PermissionMode};

/// Coerces and validates one submission against a form definition.
///
/// Every submitted field is handled independently:
/// - fields missing from `permitted_fields` are dropped, and reported
///   according to [`ApplyOptions::error_on_permission`];
/// - permitted fields without a schema entry are skipped silently;
/// - the remaining fields are coerced to their declared type and, when that
///   succeeds, checked by every validator in declared order.
///
/// A key repeated in `input` is processed once per occurrence. The last
/// occurrence decides the value; a failed coercion clears any earlier one.
///
/// Field problems are collected in the returned [`AppliedForm`]. The call only
/// fails when `permitted_fields` is empty.
pub fn apply_definition<S, I, K, V>(
    definition: &Definition,
    permitted_fields: &[S],
    input: I,
    options: &ApplyOptions,
) -> AppResult<AppliedForm>
where
    S: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    if permitted_fields.is_empty() {
        return Err(AppError::Validation(
            "must provide one or more permitted fields".to_owned(),
        ));
    }

    let permitted: BTreeSet<&str> = permitted_fields.iter().map(AsRef::as_ref).collect();
    let mut applied = AppliedForm::default();

    for (name, value) in input {
        let name: String = name.into();

        if !permitted.contains(name.as_str()) {
            match options.error_on_permission {
                PermissionMode::None => {}
                PermissionMode::Warn => {
                    warn!(field = %name, "dropping submitted field that is not permitted");
                }
                PermissionMode::Fail => {
                    let error = FieldError::NotPermitted {
                        field: name.clone(),
                    };
                    applied.push_error(&name, error);
                }
            }
            continue;
        }

        let Some(field) = definition.field(&name) else {
            continue;
        };

        let coerced = match field.coerce(&value.into()) {
            Ok(coerced) => coerced,
            Err(CoercionError::UnknownType(field_type)) => {
                let error = FieldError::UnknownType {
                    field_type,
                    field: name.clone(),
                };
                applied.remove_value(&name);
                applied.push_error(&name, error);
                continue;
            }
            Err(error) => {
                applied.remove_value(&name);
                applied.push_error(&name, error.into());
                continue;
            }
        };

        for validator in field.validators() {
            if let Err(error) = validator.validate(&coerced) {
                applied.push_error(&name, error.into());
            }
        }

        applied.insert_value(name, coerced);
    }

    debug!(
        values = applied.values().len(),
        fields_with_errors = applied.errors().len(),
        "applied form definition"
    );

    Ok(applied)
}
