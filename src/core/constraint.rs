use crate::core::schema::{FieldKind, ListingField, Schema, Slot, TRUTHY_STRINGS};
use crate::models::{FieldUpdates, PrefValue, PreferenceProfile};
use thiserror::Error;

/// One compiled, typed condition over a single listing column. Ephemeral:
/// constraints are rebuilt from the stored profile on every match run.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Closed numeric range; an absent bound leaves that side unconstrained.
    Range {
        field: ListingField,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Exact, case-sensitive string match.
    Equality { field: ListingField, value: String },
    /// Membership of a string-encoded boolean column in the truthy vocabulary.
    Truthy {
        field: ListingField,
        accepted: &'static [&'static str],
    },
}

/// A supplied preference value that cannot be coerced to the field's declared
/// type. Rejected at upsert time, never silently dropped.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("preference field `{field}` expects a {expected} value")]
    ValueType {
        field: String,
        expected: &'static str,
    },
}

fn expected_type(slot: Slot) -> &'static str {
    match slot {
        Slot::Min | Slot::Max => "numeric",
        Slot::Equals => "string",
        Slot::Required => "boolean",
    }
}

/// Validate a partial update against the schema before it reaches storage.
///
/// Keys that match no descriptor are dropped, the way the original backend
/// assigned only mapped columns. Known keys with a value of the wrong type
/// are an error. Explicit clears (`None`) pass through untouched.
pub fn sanitize_updates(
    schema: &Schema,
    updates: &FieldUpdates,
) -> Result<FieldUpdates, ConstraintError> {
    let mut accepted = FieldUpdates::new();

    for (name, value) in updates {
        let Some(binding) = schema.resolve(name) else {
            tracing::debug!("ignoring unknown preference field `{}`", name);
            continue;
        };

        if let Some(value) = value {
            let matches_slot = match binding.slot {
                Slot::Min | Slot::Max => matches!(value, PrefValue::Number(_)),
                Slot::Equals => matches!(value, PrefValue::Text(_)),
                Slot::Required => matches!(value, PrefValue::Flag(_)),
            };
            if !matches_slot {
                return Err(ConstraintError::ValueType {
                    field: name.clone(),
                    expected: expected_type(binding.slot),
                });
            }
        }

        accepted.insert(name.clone(), value.clone());
    }

    Ok(accepted)
}

/// Compile a stored profile into its constraint set.
///
/// Walks the descriptor table in declaration order and emits a constraint
/// only when at least one source field is set: a `Range` with only `min` set
/// becomes a lower-bound-only range; with neither set, nothing is emitted.
/// An empty profile compiles to an empty set, which the evaluator treats as
/// "match everything".
pub fn compile(schema: &Schema, profile: &PreferenceProfile) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    for descriptor in schema.descriptors() {
        match descriptor.kind {
            FieldKind::Range => {
                let min = profile.number(&format!("min_{}", descriptor.attribute));
                let max = profile.number(&format!("max_{}", descriptor.attribute));
                if min.is_some() || max.is_some() {
                    constraints.push(Constraint::Range {
                        field: descriptor.field,
                        min,
                        max,
                    });
                }
            }
            FieldKind::Equality => {
                if let Some(value) = profile.text(&format!("preferred_{}", descriptor.attribute)) {
                    constraints.push(Constraint::Equality {
                        field: descriptor.field,
                        value: value.to_string(),
                    });
                }
            }
            FieldKind::Flag => {
                // Only an explicit `true` constrains; false means "don't care",
                // matching the original backend's treatment of the flag.
                if profile.flag(&format!("{}_required", descriptor.attribute)) == Some(true) {
                    constraints.push(Constraint::Truthy {
                        field: descriptor.field,
                        accepted: TRUTHY_STRINGS,
                    });
                }
            }
        }
    }

    constraints
}
