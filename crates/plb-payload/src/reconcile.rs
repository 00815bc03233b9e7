//! Reconciling a caller's expected type with the type stored in a payload.

use crate::error::{PayloadError, PayloadResult};
use log::{debug, trace};
use plb_types::{Column, ResolvedType, Schema};
use serde::{Deserialize, Serialize};

/// How validation treats tables and objects whose column counts differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnCountPolicy {
    /// Extra payload columns are skipped; extra expected columns read as null.
    #[default]
    Tolerate,
    /// Any difference is a [`PayloadError::ColumnCountMismatch`].
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Use the payload type as stored.
    Trust,
    /// Require the expected type tags at every ordinal and nesting level.
    Validate(ColumnCountPolicy),
    /// Merge both: payload types win, expected names are kept, extra columns from either side
    /// are appended.
    Expand,
}

/// Compute the type a payload is decoded as.
///
/// The result always agrees with `payload` on wire tags wherever the payload has data, so the
/// decoder can read it directly. Columns present only in the result read as null.
pub fn reconcile(
    expected: &ResolvedType,
    payload: &ResolvedType,
    mode: ReconcileMode,
) -> PayloadResult<ResolvedType> {
    match mode {
        ReconcileMode::Trust => Ok(payload.clone()),
        ReconcileMode::Validate(policy) => validate(expected, payload, policy, ""),
        ReconcileMode::Expand => Ok(expand(expected, payload, "")),
    }
}

fn same_wire_type(a: &ResolvedType, b: &ResolvedType) -> bool {
    a.tag().wire_tag() == b.tag().wire_tag()
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_owned()
    } else {
        path.to_owned()
    }
}

fn validate(
    expected: &ResolvedType,
    payload: &ResolvedType,
    policy: ColumnCountPolicy,
    path: &str,
) -> PayloadResult<ResolvedType> {
    match (expected, payload) {
        (ResolvedType::Any, actual) => Ok(actual.clone()),
        (ResolvedType::Array(e), ResolvedType::Array(p)) => Ok(ResolvedType::array(validate(
            e,
            p,
            policy,
            &format!("{path}[]"),
        )?)),
        (ResolvedType::Table(e), ResolvedType::Table(p)) => {
            Ok(ResolvedType::Table(validate_schema(e, p, policy, path)?))
        }
        (ResolvedType::Object(e), ResolvedType::Object(p)) => {
            Ok(ResolvedType::Object(validate_schema(e, p, policy, path)?))
        }
        (e, p) if !e.tag().is_composite() && same_wire_type(e, p) => Ok(e.clone()),
        (e, p) => Err(PayloadError::SchemaMismatch {
            column: display_path(path),
            expected: e.clone(),
            actual: p.clone(),
        }),
    }
}

fn validate_schema(
    expected: &Schema,
    payload: &Schema,
    policy: ColumnCountPolicy,
    path: &str,
) -> PayloadResult<Schema> {
    if expected.len() != payload.len() {
        if policy == ColumnCountPolicy::Strict {
            return Err(PayloadError::ColumnCountMismatch {
                column: display_path(path),
                expected: expected.len(),
                actual: payload.len(),
            });
        }
        debug!(
            "tolerating column count difference at {}: expected {}, payload {}",
            display_path(path),
            expected.len(),
            payload.len()
        );
    }
    expected
        .columns()
        .iter()
        .enumerate()
        .map(|(ordinal, column)| match payload.column(ordinal) {
            Some(stored) => Ok(Column::new(
                column.name.clone(),
                validate(
                    &column.ty,
                    &stored.ty,
                    policy,
                    &child_path(path, &column.name),
                )?,
            )),
            None => Ok(column.clone()),
        })
        .collect()
}

fn expand(expected: &ResolvedType, payload: &ResolvedType, path: &str) -> ResolvedType {
    match (expected, payload) {
        (ResolvedType::Array(e), ResolvedType::Array(p)) => {
            ResolvedType::array(expand(e, p, &format!("{path}[]")))
        }
        (ResolvedType::Table(e), ResolvedType::Table(p)) => {
            ResolvedType::Table(expand_schema(e, p, path))
        }
        (ResolvedType::Object(e), ResolvedType::Object(p)) => {
            ResolvedType::Object(expand_schema(e, p, path))
        }
        (e, p) if !e.tag().is_composite() && same_wire_type(e, p) => e.clone(),
        (e, p) => {
            debug!(
                "payload type {p} overrides expected {e} at {}",
                display_path(path)
            );
            p.clone()
        }
    }
}

fn expand_schema(expected: &Schema, payload: &Schema, path: &str) -> Schema {
    let width = expected.len().max(payload.len());
    let mut columns = Vec::with_capacity(width);
    for ordinal in 0..width {
        let column = match (expected.column(ordinal), payload.column(ordinal)) {
            (Some(e), Some(p)) => {
                Column::new(e.name.clone(), expand(&e.ty, &p.ty, &child_path(path, &e.name)))
            }
            (Some(e), None) => {
                trace!("expected column {} has no payload data", e.name);
                e.clone()
            }
            (None, Some(p)) => {
                debug!("appending payload column {} at {}", p.name, display_path(path));
                p.clone()
            }
            (None, None) => break,
        };
        trace!("column {ordinal} reconciled as {} {}", column.name, column.ty);
        columns.push(column);
    }
    Schema::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plb_types::synthesized_column_name;
    use pretty_assertions::assert_eq;

    fn payload_table(types: &[ResolvedType]) -> ResolvedType {
        ResolvedType::Table(Schema::new(
            types
                .iter()
                .enumerate()
                .map(|(i, ty)| Column::new(synthesized_column_name(ty, i), ty.clone()))
                .collect(),
        ))
    }

    #[test]
    fn trust_returns_payload_type() {
        let payload = payload_table(&[ResolvedType::Int32]);
        assert_eq!(
            reconcile(&ResolvedType::Boolean, &payload, ReconcileMode::Trust),
            Ok(payload)
        );
    }

    #[test]
    fn validate_keeps_expected_names() {
        let expected = ResolvedType::Table(Schema::of([
            ("id", ResolvedType::Int32),
            ("at", ResolvedType::DateTimeOffset),
        ]));
        let payload = payload_table(&[ResolvedType::Int32, ResolvedType::DateTime]);
        let mode = ReconcileMode::Validate(ColumnCountPolicy::Tolerate);
        assert_eq!(reconcile(&expected, &payload, mode), Ok(expected));
    }

    #[test]
    fn validate_names_the_mismatched_column() {
        let expected = ResolvedType::Table(Schema::of([
            ("id", ResolvedType::Int32),
            (
                "owner",
                ResolvedType::Object(Schema::of([("name", ResolvedType::String)])),
            ),
        ]));
        let payload = payload_table(&[
            ResolvedType::Int32,
            ResolvedType::Object(Schema::of([("x", ResolvedType::Int64)])),
        ]);
        let err = reconcile(
            &expected,
            &payload,
            ReconcileMode::Validate(ColumnCountPolicy::Tolerate),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PayloadError::SchemaMismatch {
                column: "owner.name".to_owned(),
                expected: ResolvedType::String,
                actual: ResolvedType::Int64,
            }
        );
    }

    #[test]
    fn validate_column_count_policy() {
        let expected = ResolvedType::Table(Schema::of([
            ("a", ResolvedType::Int32),
            ("b", ResolvedType::String),
        ]));
        let payload = payload_table(&[ResolvedType::Int32]);

        let tolerated = reconcile(
            &expected,
            &payload,
            ReconcileMode::Validate(ColumnCountPolicy::Tolerate),
        );
        assert_eq!(tolerated, Ok(expected.clone()));

        let strict = reconcile(
            &expected,
            &payload,
            ReconcileMode::Validate(ColumnCountPolicy::Strict),
        );
        assert_eq!(
            strict,
            Err(PayloadError::ColumnCountMismatch {
                column: "<root>".to_owned(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn expand_merges_both_sides() {
        let expected = ResolvedType::Table(Schema::of([
            ("id", ResolvedType::Int32),
            ("tags", ResolvedType::array(ResolvedType::Int32)),
        ]));
        let payload = payload_table(&[
            ResolvedType::String,
            ResolvedType::array(ResolvedType::Float64),
            ResolvedType::Boolean,
        ]);
        assert_eq!(
            reconcile(&expected, &payload, ReconcileMode::Expand),
            Ok(ResolvedType::Table(Schema::of([
                ("id", ResolvedType::String),
                ("tags", ResolvedType::array(ResolvedType::Float64)),
                ("boolean_2", ResolvedType::Boolean),
            ])))
        );
    }

    #[test]
    fn expand_keeps_trailing_expected_columns() {
        let expected = ResolvedType::Table(Schema::of([
            ("a", ResolvedType::Int32),
            ("later", ResolvedType::Decimal),
        ]));
        let payload = payload_table(&[ResolvedType::Int32]);
        assert_eq!(
            reconcile(&expected, &payload, ReconcileMode::Expand),
            Ok(expected)
        );
    }
}
