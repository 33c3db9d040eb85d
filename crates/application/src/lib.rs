//! Applies form definitions to submitted input.

#![forbid(unsafe_code)]

mod applied_form;
mod apply_options;
mod form_application;

pub use applied_form::{AppliedForm, FieldError, get_group};
pub use apply_options::{ApplyOptions, ERROR_ON_PERMISSION_ENV, PermissionMode};
pub use form_application::apply_definition;
