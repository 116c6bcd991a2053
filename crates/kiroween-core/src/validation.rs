//! Payload validation against the static schema tables.
//!
//! Validation stops at the first violated rule, walking fields in the
//! order the schema declares them. A successful check yields a
//! [`Validated`] token; it can only be built here, so holding one proves
//! the payload passed.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{KiroweenError, KiroweenResult};
use crate::models::Resource;
use crate::schema::{Constraint, FieldRule, ResourceSchema};

/// Whether a payload creates a record or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every required field must be present.
    Create,
    /// Every field is optional; present fields are still checked.
    Update,
}

/// A payload that passed validation.
#[derive(Debug, Clone)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Validate a raw creation payload for resource `R`.
pub fn validate_create<R: Resource>(payload: &Value) -> KiroweenResult<Validated<R::Create>> {
    let fields = check(R::KIND.schema(), payload, Mode::Create)?;
    decode(fields)
}

/// Validate a raw partial-update payload for resource `R`.
pub fn validate_update<R: Resource>(payload: &Value) -> KiroweenResult<Validated<R::Update>> {
    let fields = check(R::KIND.schema(), payload, Mode::Update)?;
    decode(fields)
}

/// Check `payload` against `schema`, returning only the declared fields
/// with numeric values normalized to integers. Unknown fields are dropped.
pub fn check(
    schema: &ResourceSchema,
    payload: &Value,
    mode: Mode,
) -> KiroweenResult<Map<String, Value>> {
    let object = payload
        .as_object()
        .ok_or_else(|| KiroweenError::validation("body", "Request body must be a JSON object"))?;

    let mut normalized = Map::new();
    for rule in schema.fields {
        match object.get(rule.name) {
            Some(value) => {
                normalized.insert(rule.name.to_string(), check_field(rule, value)?);
            }
            None if mode == Mode::Create && rule.required => {
                return Err(KiroweenError::validation(rule.name, rule.required_message));
            }
            None => {}
        }
    }
    Ok(normalized)
}

fn check_field(rule: &FieldRule, value: &Value) -> KiroweenResult<Value> {
    let fail = |message: String| KiroweenError::validation(rule.name, message);

    match rule.constraint {
        Constraint::Text { min_len, max_len } => {
            let text = value
                .as_str()
                .ok_or_else(|| fail(format!("{} must be a string", rule.label)))?;
            if text.trim().chars().count() < min_len {
                return Err(if min_len <= 1 {
                    fail(rule.required_message.to_string())
                } else {
                    fail(format!(
                        "{} must be at least {min_len} characters",
                        rule.label
                    ))
                });
            }
            if let Some(max_len) = max_len {
                if text.chars().count() > max_len {
                    return Err(fail(format!(
                        "{} is too long (max {max_len} characters)",
                        rule.label
                    )));
                }
            }
            Ok(value.clone())
        }
        Constraint::Integer { min, max } => {
            let number =
                as_integer(value).ok_or_else(|| fail(format!("{} must be an integer", rule.label)))?;
            if number < i128::from(min) {
                return Err(fail(format!("{} must be at least {min}", rule.label)));
            }
            if number > i128::from(max) {
                return Err(fail(format!("{} cannot exceed {max}", rule.label)));
            }
            // In bounds, so it fits the declared i64 range.
            Ok(Value::from(number as i64))
        }
        Constraint::OneOf(choices) => {
            let text = value
                .as_str()
                .ok_or_else(|| fail(format!("{} must be a string", rule.label)))?;
            if !choices.contains(&text) {
                return Err(fail(format!(
                    "{} must be one of: {}",
                    rule.label,
                    choices.join(", ")
                )));
            }
            Ok(value.clone())
        }
    }
}

/// Accepts JSON integers and floats with no fractional part (`7.0`).
///
/// Whole numbers beyond the `i64` range are widened to `i128` (saturating)
/// so they fail the range check rather than the type check.
fn as_integer(value: &Value) -> Option<i128> {
    if let Some(n) = value.as_i64() {
        return Some(i128::from(n));
    }
    if let Some(n) = value.as_u64() {
        return Some(i128::from(n));
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i128)
    } else {
        None
    }
}

fn decode<T: DeserializeOwned>(fields: Map<String, Value>) -> KiroweenResult<Validated<T>> {
    // Rules passed, so a decode failure means the schema table and the
    // payload type disagree.
    serde_json::from_value(Value::Object(fields))
        .map(Validated)
        .map_err(|e| KiroweenError::Internal(format!("validated payload failed to decode: {e}")))
}
