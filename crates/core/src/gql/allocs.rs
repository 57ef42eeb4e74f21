//! The two root query fields over the allocation endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, TypeRef};

use super::error::{internal_error, GqlError};
use super::ext::GqlValueUtils;
use super::schema::{compile_object, TypeRegistry};
use crate::api::Client;
use crate::model::nomad::{ALLOCATION, ALLOCATION_LIST_STUB};
use crate::model::Catalog;

/// Add the `allocations` and `allocation` fields to the root query object,
/// compiling both entry types (and everything they reach) on the way.
pub(crate) fn process_allocs(
	mut query: Object,
	catalog: &Catalog,
	registry: &mut TypeRegistry,
	client: &Arc<Client>,
) -> Result<Object, GqlError> {
	compile_object(ALLOCATION_LIST_STUB, catalog, registry)?;
	compile_object(ALLOCATION, catalog, registry)?;

	let list_client = client.clone();
	query = query.field(
		Field::new("allocations", TypeRef::named_nn_list_nn(ALLOCATION_LIST_STUB), move |ctx| {
			let client = list_client.clone();
			FieldFuture::new(async move {
				// The list endpoint omits expensive substructures unless
				// asked, so let the query shape drive the backend cost:
				// arguments are copied through verbatim, and the two
				// recognized sub-fields toggle their backend flags. Only
				// the immediate selection set is inspected.
				let mut params = BTreeMap::new();
				params.insert("task_states".to_owned(), "false".to_owned());
				for (name, value) in ctx.args.as_index_map() {
					if let Some(value) = value.as_string() {
						params.insert(name.to_string(), value);
					}
				}
				for selected in ctx.ctx.field().selection_set() {
					match selected.name() {
						"AllocatedResources" => {
							params.insert("resources".to_owned(), "true".to_owned());
						}
						"TaskStates" => {
							params.insert("task_states".to_owned(), "true".to_owned());
						}
						_ => {}
					}
				}
				trace!("listing allocations with params: {params:?}");

				let allocs = client.list_allocations(&params).await.map_err(GqlError::from)?;
				Ok(Some(FieldValue::list(allocs.into_iter().map(FieldValue::owned_any))))
			})
		})
		.description("Lists the known allocations, fetching expensive substructures only when they are selected")
		.argument(InputValue::new("prefix", TypeRef::named(TypeRef::STRING)))
		.argument(InputValue::new("namespace", TypeRef::named(TypeRef::STRING))),
	);

	let read_client = client.clone();
	query = query.field(
		Field::new("allocation", TypeRef::named(ALLOCATION), move |ctx| {
			let client = read_client.clone();
			FieldFuture::new(async move {
				let args = ctx.args.as_index_map();
				let id = match args.get("id").and_then(GqlValueUtils::as_string) {
					Some(id) => id,
					None => {
						return Err(internal_error(
							"schema validation failed: no id argument on allocation",
						)
						.into());
					}
				};
				match client.read_allocation(&id).await.map_err(GqlError::from)? {
					Some(alloc) => Ok(Some(FieldValue::owned_any(alloc))),
					None => Ok(None),
				}
			})
		})
		.description("Reads one allocation by id, resolving to null when the backend has no match")
		.argument(InputValue::new("id", TypeRef::named_nn(TypeRef::STRING))),
	);

	Ok(query)
}
