//! Synthesized per-field resolvers.
//!
//! Resolved backend records travel through the execution engine as owned
//! [`serde_json::Value`] objects. Each compiled field carries one resolver
//! closure capturing its field name and kind by value; at execution time the
//! closure downcasts the parent record, reads its own property, and converts
//! it by dispatching on the kind tag. Every invocation allocates and returns
//! fresh values.

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::Value as GqlValue;
use chrono::DateTime;
use serde_json::{Number, Value as Json};

use super::error::{internal_error, resolver_error, GqlError};
use crate::model::Kind;

pub(crate) fn make_field_resolver(
	fd_name: impl Into<String>,
	kind: Kind,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
	let fd_name = fd_name.into();
	move |ctx: ResolverContext| {
		let fd_name = fd_name.clone();
		let kind = kind.clone();
		FieldFuture::new(async move {
			let parent = ctx
				.parent_value
				.downcast_ref::<Json>()
				.ok_or_else(|| internal_error("failed to downcast resolved parent value"))?;
			let val = match parent.get(fd_name.as_str()) {
				Some(v) => v,
				None => return Ok(None),
			};
			Ok(resolve_value(val, &kind)?)
		})
	}
}

/// Convert one resolved property into a field value, dispatching on the
/// field's kind tag.
fn resolve_value(val: &Json, kind: &Kind) -> Result<Option<FieldValue<'static>>, GqlError> {
	if val.is_null() {
		return Ok(None);
	}
	let out = match kind {
		// Materialize the live map into a fresh sequence of {key, value}
		// entries, in the map's own traversal order.
		Kind::Map(_) => {
			let Some(entries) = val.as_object() else {
				return Err(resolver_error(format!("expected an object for a map field, found: {val}")));
			};
			let items = entries.iter().map(|(key, value)| {
				FieldValue::owned_any(serde_json::json!({
					"key": key,
					"value": value,
				}))
			});
			FieldValue::list(items)
		}
		// Project the temporal value as Unix epoch seconds.
		Kind::Timestamp => FieldValue::value(timestamp_to_gql(val)?),
		Kind::Struct(_) => FieldValue::owned_any(val.clone()),
		Kind::Ptr(inner) => return resolve_value(val, inner),
		Kind::List(elem) => {
			let Some(items) = val.as_array() else {
				return Err(resolver_error(format!("expected an array for a list field, found: {val}")));
			};
			match elem.as_ref() {
				Kind::Struct(_) | Kind::Ptr(_) => FieldValue::list(items.iter().map(|v| match v {
					Json::Null => FieldValue::NULL,
					v => FieldValue::owned_any(v.clone()),
				})),
				k => {
					let scalars: Result<Vec<FieldValue>, GqlError> = items
						.iter()
						.map(|v| match v {
							Json::Null => Ok(FieldValue::NULL),
							v => Ok(FieldValue::value(scalar_to_gql(v, k)?)),
						})
						.collect();
					FieldValue::list(scalars?)
				}
			}
		}
		k => FieldValue::value(scalar_to_gql(val, k)?),
	};
	Ok(Some(out))
}

fn timestamp_to_gql(val: &Json) -> Result<GqlValue, GqlError> {
	let Some(raw) = val.as_str() else {
		return Err(resolver_error(format!("expected an RFC 3339 timestamp string, found: {val}")));
	};
	match DateTime::parse_from_rfc3339(raw) {
		Ok(when) => Ok(GqlValue::Number(when.timestamp().into())),
		Err(_) => Err(resolver_error(format!("invalid RFC 3339 timestamp: {raw}"))),
	}
}

fn scalar_to_gql(val: &Json, kind: &Kind) -> Result<GqlValue, GqlError> {
	let out = match kind {
		Kind::String => match val.as_str() {
			Some(s) => GqlValue::String(s.to_owned()),
			None => return Err(type_mismatch(val, kind)),
		},
		Kind::Bool => match val.as_bool() {
			Some(b) => GqlValue::Boolean(b),
			None => return Err(type_mismatch(val, kind)),
		},
		Kind::Int
		| Kind::Int8
		| Kind::Int16
		| Kind::Int32
		| Kind::Int64
		| Kind::Uint
		| Kind::Uint8
		| Kind::Uint16
		| Kind::Uint32
		| Kind::Uint64 => match (val.as_i64(), val.as_u64()) {
			(Some(i), _) => GqlValue::Number(i.into()),
			(None, Some(u)) => GqlValue::Number(u.into()),
			_ => return Err(type_mismatch(val, kind)),
		},
		Kind::Float32 | Kind::Float64 => match val.as_f64() {
			Some(f) => GqlValue::Number(
				Number::from_f64(f)
					.ok_or_else(|| resolver_error("non-finite float (not representable in json)"))?,
			),
			None => return Err(type_mismatch(val, kind)),
		},
		k => return Err(internal_error(format!("kind {k:?} has no scalar conversion"))),
	};
	Ok(out)
}

fn type_mismatch(val: &Json, kind: &Kind) -> GqlError {
	resolver_error(format!("value {val} does not match the expected kind {kind:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn null_resolves_to_absent() {
		assert!(resolve_value(&Json::Null, &Kind::String).unwrap().is_none());
		assert!(resolve_value(&Json::Null, &Kind::ptr(Kind::Int)).unwrap().is_none());
	}

	#[test]
	fn scalar_conversions() {
		assert_eq!(
			scalar_to_gql(&json!("running"), &Kind::String).unwrap(),
			GqlValue::String("running".to_owned())
		);
		assert_eq!(scalar_to_gql(&json!(true), &Kind::Bool).unwrap(), GqlValue::Boolean(true));
		assert_eq!(scalar_to_gql(&json!(-7), &Kind::Int64).unwrap(), GqlValue::Number((-7).into()));
		assert_eq!(
			scalar_to_gql(&json!(18446744073709551615u64), &Kind::Uint64).unwrap(),
			GqlValue::Number(18446744073709551615u64.into())
		);
		assert!(scalar_to_gql(&json!("nope"), &Kind::Int).is_err());
		assert!(scalar_to_gql(&json!(1.5), &Kind::Bool).is_err());
	}

	#[test]
	fn timestamps_project_to_epoch_seconds() {
		let out = timestamp_to_gql(&json!("2015-10-21T07:28:00Z")).unwrap();
		assert_eq!(out, GqlValue::Number(1445412480.into()));
		// The backend's zero time is representable too.
		let zero = timestamp_to_gql(&json!("0001-01-01T00:00:00Z")).unwrap();
		assert_eq!(zero, GqlValue::Number((-62135596800i64).into()));
		assert!(timestamp_to_gql(&json!("not a time")).is_err());
		assert!(timestamp_to_gql(&json!(12)).is_err());
	}

	#[test]
	fn map_values_materialize_as_entries() {
		let val = json!({"a": "1", "b": "2"});
		let out = resolve_value(&val, &Kind::map(Kind::String)).unwrap();
		assert!(out.is_some());
	}

	#[test]
	fn list_of_scalars_rejects_mismatched_items() {
		let val = json!(["one", 2]);
		assert!(resolve_value(&val, &Kind::list(Kind::String)).is_err());
	}
}
