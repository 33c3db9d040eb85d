//! Validators run against coerced field values.
//!
//! A [`Validator`] is a cheap-to-clone function value. The constructors in this
//! module capture their configuration (pattern, message, bounds) in a closure,
//! and [`or_chain`] composes several validators into one.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::FieldValue;

const MUST_BE_STRING: &str = "Field must be a string";
const MUST_BE_BOOL: &str = "Field must be a boolean";
const MUST_BE_INTEGER: &str = "Field must be an integer";

/// Message produced by a failing validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

type ValidateFn = dyn Fn(&FieldValue) -> Result<(), ValidationError> + Send + Sync;

/// Stateless check applied to a coerced field value.
#[derive(Clone)]
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    /// Wraps a validation function.
    pub fn new<F>(validate: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Self(Arc::new(validate))
    }

    /// Runs the check.
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        (self.0)(value)
    }
}

impl Debug for Validator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("Validator(..)")
    }
}

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in validator pattern must compile")
}

static NUMBER_RX: LazyLock<Regex> = LazyLock::new(|| compile(r"^-?[0-9]*$"));
static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| compile(r"^\S+@\S+$"));
static LETTERS_WITH_SPACES_RX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[- 'a-zA-ZÀ-ÖØ-öø-ÿ]+$"));
static LETTERS_WITH_NUMBERS_RX: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z0-9]+$"));
static USERNAME_RX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9]+(?:[_-][A-Za-z0-9]+)*$"));
static LETTERS_SPACES_AND_NUMBERS_RX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[- 'a-zA-ZÀ-ÖØ-öø-ÿ0-9]+$"));
static URL_RX: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^(http://www\.|https://www\.|http://|https://)?[a-z0-9]+([-.][a-z0-9]+)*\.[a-z]{2,5}(:[0-9]{1,5})?(/.*)?$",
    )
});

/// Succeeds when any delegate succeeds, stopping at the first success.
///
/// When every delegate fails, their messages are joined with `" or "`. An
/// empty chain always succeeds.
#[must_use]
pub fn or_chain(validators: impl IntoIterator<Item = Validator>) -> Validator {
    let validators: Vec<Validator> = validators.into_iter().collect();
    Validator::new(move |value| {
        let mut messages = Vec::with_capacity(validators.len());
        for validator in &validators {
            match validator.validate(value) {
                Ok(()) => return Ok(()),
                Err(error) => messages.push(error.message),
            }
        }

        if messages.is_empty() {
            return Ok(());
        }

        Err(ValidationError::new(messages.join(" or ")))
    })
}

/// Requires a string matching `pattern`, failing with `message` otherwise.
#[must_use]
pub fn regex(pattern: Regex, message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::new(move |value| {
        let text = value
            .as_str()
            .ok_or_else(|| ValidationError::new(MUST_BE_STRING))?;
        if !pattern.is_match(text) {
            return Err(ValidationError::new(message.as_str()));
        }

        Ok(())
    })
}

/// Always fails with `message`. Handy in tests.
#[must_use]
pub fn fail(message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::new(move |_| Err(ValidationError::new(message.as_str())))
}

/// Loose `something@something` email shape.
#[must_use]
pub fn email() -> Validator {
    regex(EMAIL_RX.clone(), "Email address is invalid")
}

/// Website address with an optional scheme, port and path.
#[must_use]
pub fn url() -> Validator {
    regex(URL_RX.clone(), "Website URL is invalid")
}

/// Letters and digits separated by single underscores or hyphens.
#[must_use]
pub fn username() -> Validator {
    regex(
        USERNAME_RX.clone(),
        "Usernames can only contain letters, numbers, underscores and hyphens, and must not begin or end with an underscore or hyphen",
    )
}

/// Letters (including Latin-1 accented letters), spaces, hyphens and apostrophes.
#[must_use]
pub fn letters_with_spaces() -> Validator {
    regex(
        LETTERS_WITH_SPACES_RX.clone(),
        "Must only contain letters and spaces",
    )
}

/// ASCII letters and digits only.
#[must_use]
pub fn letters_with_numbers() -> Validator {
    regex(
        LETTERS_WITH_NUMBERS_RX.clone(),
        "Must only contain letters and numbers",
    )
}

/// Same alphabet as [`letters_with_spaces`] plus digits.
#[must_use]
pub fn letters_spaces_and_numbers() -> Validator {
    regex(
        LETTERS_SPACES_AND_NUMBERS_RX.clone(),
        "Must only contain letters, spaces and numbers",
    )
}

/// Optional leading minus followed by digits. Empty text passes.
#[must_use]
pub fn numbers() -> Validator {
    regex(NUMBER_RX.clone(), "Must be numbers only")
}

/// Requires a string whose character count lies in `min..=max`.
#[must_use]
pub fn length(min: usize, max: usize) -> Validator {
    let message = if min == max {
        format!("Must be exactly {min} characters long")
    } else {
        format!("Must be between {min} and {max} characters long")
    };

    Validator::new(move |value| {
        let text = value
            .as_str()
            .ok_or_else(|| ValidationError::new(MUST_BE_STRING))?;
        let count = text.chars().count();
        if count < min || count > max {
            return Err(ValidationError::new(message.as_str()));
        }

        Ok(())
    })
}

/// Requires a string of at least `min` characters.
#[must_use]
pub fn minimum_length(min: usize) -> Validator {
    Validator::new(move |value| {
        let text = value
            .as_str()
            .ok_or_else(|| ValidationError::new(MUST_BE_STRING))?;
        if text.chars().count() < min {
            return Err(ValidationError::new(format!(
                "Must be at least {min} characters long"
            )));
        }

        Ok(())
    })
}

/// Requires a string that parses as an identifier.
///
/// Intended for string-typed fields that carry an identifier without being
/// coerced into one.
#[must_use]
pub fn uuid_string() -> Validator {
    Validator::new(|value| {
        let text = value
            .as_str()
            .ok_or_else(|| ValidationError::new(MUST_BE_STRING))?;
        Uuid::try_parse(text)
            .map(|_| ())
            .map_err(|_| ValidationError::new("Expected UUID for field"))
    })
}

/// Rejects negative integers. Zero passes.
#[must_use]
pub fn positive() -> Validator {
    Validator::new(|value| {
        let number = value
            .as_i64()
            .ok_or_else(|| ValidationError::new(MUST_BE_INTEGER))?;
        if number < 0 {
            return Err(ValidationError::new("Must be positive"));
        }

        Ok(())
    })
}

/// Requires a boolean that is `true`, failing with `message` when it is not.
#[must_use]
pub fn is_true(message: impl Into<String>) -> Validator {
    expect_bool(true, message.into())
}

/// Requires a boolean that is `false`, failing with `message` when it is not.
#[must_use]
pub fn is_false(message: impl Into<String>) -> Validator {
    expect_bool(false, message.into())
}

fn expect_bool(expected: bool, message: String) -> Validator {
    Validator::new(move |value| {
        let flag = value
            .as_bool()
            .ok_or_else(|| ValidationError::new(MUST_BE_BOOL))?;
        if flag != expected {
            return Err(ValidationError::new(message.as_str()));
        }

        Ok(())
    })
}
