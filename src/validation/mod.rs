//! Field-level validation of inbound JSON payloads.
//!
//! Validation is pure: it looks at a JSON object and a list of per-field rules and either
//! passes or returns the failure messages in rule order. Handlers turn a failure into a
//! 400 response.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// A single check applied to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not null
    Required,
    /// Present, not null, and not a blank string
    NotEmpty,
    /// A string shaped like an email address
    Email,
    /// A JSON string when present
    String,
    /// A finite number, or a string holding one, when present
    Numeric,
    /// A JSON boolean when present
    Boolean,
}

impl Rule {
    /// Presence rules short-circuit the remaining rules of the field when they fail
    fn is_presence(self) -> bool {
        matches!(self, Rule::Required | Rule::NotEmpty)
    }

    fn check(self, field: &str, value: Option<&Value>) -> Result<(), String> {
        let value = value.filter(|v| !v.is_null());

        match self {
            Rule::Required => match value {
                Some(_) => Ok(()),
                None => Err(format!("{} is required", field)),
            },
            Rule::NotEmpty => match value {
                Some(Value::String(s)) if s.trim().is_empty() => Err(format!("{} must not be empty", field)),
                Some(_) => Ok(()),
                None => Err(format!("{} must not be empty", field)),
            },
            Rule::Email => match value {
                None => Ok(()),
                Some(Value::String(s)) if EMAIL_REGEX.is_match(s.trim()) => Ok(()),
                Some(_) => Err(format!("{} must be a valid email address", field)),
            },
            Rule::String => match value {
                None | Some(Value::String(_)) => Ok(()),
                Some(_) => Err(format!("{} must be of type 'string'", field)),
            },
            Rule::Numeric => match value {
                None => Ok(()),
                Some(v) if as_number(v).is_some() => Ok(()),
                Some(_) => Err(format!("{} must be numeric", field)),
            },
            Rule::Boolean => match value {
                None | Some(Value::Bool(_)) => Ok(()),
                Some(_) => Err(format!("{} must be of type 'boolean'", field)),
            },
        }
    }
}

/// Collects messages across several field checks
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `rules` to `field` in order, recording every failure
    pub fn field(&mut self, body: &Map<String, Value>, field: &str, rules: &[Rule]) -> &mut Self {
        let value = body.get(field);
        for rule in rules {
            if let Err(message) = rule.check(field, value) {
                self.errors.push(message);
                if rule.is_presence() {
                    break;
                }
            }
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validate `body` against a rule table
pub fn validate(body: &Map<String, Value>, rules: &[(&str, &[Rule])]) -> Result<(), Vec<String>> {
    let mut validator = Validator::new();
    for (field, field_rules) in rules {
        validator.field(body, field, field_rules);
    }
    validator.finish()
}

/// String value of `field`, if present and a string
pub fn string(body: &Map<String, Value>, field: &str) -> Option<String> {
    body.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Sanitized float value of `field`, if present and numeric
pub fn number(body: &Map<String, Value>, field: &str) -> Option<f64> {
    body.get(field).and_then(as_number)
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
