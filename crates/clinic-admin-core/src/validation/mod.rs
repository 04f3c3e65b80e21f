//! Field-rule validation for incoming JSON documents.
//!
//! A [`Validator`] is an ordered list of `(field, rule, message)` checks. Every
//! field is evaluated, so a single call reports all violating fields at once;
//! within one field only the first failing check is reported.
//!
//! Absent values (missing, `null`, or a blank string) only ever fail
//! [`Rule::Required`]; every other rule is skipped for them, which is how
//! optional fields are expressed.

mod fields;

pub use fields::*;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// A single check applied to one field value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Present, non-null, and not a blank string.
    Required,
    /// A string.
    Text,
    /// A string of the form `local@domain.tld`.
    Email,
    /// A string matching the pattern as submitted, surrounding whitespace included.
    Pattern(&'static Regex),
    /// A string equal to one of the values.
    OneOf(&'static [&'static str]),
    /// A number, or numeric string, not below the bound.
    NumberAtLeast(f64),
    /// An integer, or integer-like string, not below the bound.
    IntegerAtLeast(i64),
    /// An array with at least this many elements.
    MinItems(usize),
    /// An array whose elements are all strings from the values.
    EachOneOf(&'static [&'static str]),
    /// A `YYYY-MM-DD` date or RFC 3339 timestamp.
    Date,
    /// Standard base64, optionally behind a `data:<mime>;base64,` prefix.
    Base64,
}

impl Rule {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Rule::Required => !is_absent(Some(value)),
            Rule::Text => value.is_string(),
            Rule::Email => value.as_str().is_some_and(|s| email_regex().is_match(s.trim())),
            Rule::Pattern(re) => value.as_str().is_some_and(|s| re.is_match(s)),
            Rule::OneOf(allowed) => value
                .as_str()
                .is_some_and(|s| allowed.contains(&s.trim())),
            Rule::NumberAtLeast(min) => number_value(value).is_some_and(|n| n >= *min),
            Rule::IntegerAtLeast(min) => integer_value(value).is_some_and(|n| n >= *min),
            Rule::MinItems(min) => value.as_array().is_some_and(|items| items.len() >= *min),
            Rule::EachOneOf(allowed) => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|s| allowed.contains(&s)))
            }),
            Rule::Date => timestamp_value(value).is_some(),
            Rule::Base64 => bytes_value(value).is_some(),
        }
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Calendar date written as `YYYY-MM-DD`.
pub fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

/// One violated field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violations found in one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationErrors {
    /// Human-readable summary for the whole document
    pub message: String,
    /// Violations in check declaration order
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether `field` is among the violations.
    pub fn mentions(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{} ({})", error.message, error.field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone)]
struct Check {
    field: &'static str,
    rule: Rule,
    message: &'static str,
}

/// Ordered set of field checks.
#[derive(Debug, Clone)]
pub struct Validator {
    summary: &'static str,
    checks: Vec<Check>,
}

impl Validator {
    /// Create an empty validator. `summary` becomes the error message.
    pub fn new(summary: &'static str) -> Self {
        Self {
            summary,
            checks: Vec::new(),
        }
    }

    /// Append a check for `field`.
    pub fn rule(mut self, field: &'static str, rule: Rule, message: &'static str) -> Self {
        self.checks.push(Check {
            field,
            rule,
            message,
        });
        self
    }

    /// Evaluate every check against `fields`.
    pub fn validate(&self, fields: &Map<String, Value>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new(self.summary);

        for check in &self.checks {
            if errors.mentions(check.field) {
                continue;
            }
            let value = fields.get(check.field);
            let failed = match (&check.rule, value) {
                (Rule::Required, value) => is_absent(value),
                (_, value) if is_absent(value) => false,
                (rule, Some(value)) => !rule.accepts(value),
                (_, None) => false,
            };
            if failed {
                errors.push(check.field, check.message);
            }
        }

        errors.into_result()
    }
}

/// Missing, `null`, or a string with nothing but whitespace.
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
