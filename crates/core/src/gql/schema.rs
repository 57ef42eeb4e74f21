//! The schema compiler.
//!
//! [`generate_schema`] runs exactly once at process startup. It walks the
//! type descriptors reachable from the two allocation entry points and
//! produces the equivalent GraphQL object types, then assembles them into
//! a single schema. The result is immutable for the life of the process.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_graphql::dynamic::{Field, Object, Schema, Type, TypeRef};

use super::allocs::process_allocs;
use super::error::{schema_error, GqlError};
use super::resolver::make_field_resolver;
use crate::api::Client;
use crate::model::{Catalog, FieldDef, Kind, TypeDef};

/// The compilation-session registry of already-compiled types.
///
/// A type name is reserved *before* its field list is walked, so a field
/// that references its own enclosing type (directly or through a cycle)
/// resolves to the same named type instead of recursing forever. Finished
/// types are held here until they are registered into the schema.
pub(crate) struct TypeRegistry {
	reserved: BTreeSet<String>,
	types: Vec<Type>,
}

impl TypeRegistry {
	pub(crate) fn new() -> Self {
		TypeRegistry {
			reserved: BTreeSet::new(),
			types: Vec::new(),
		}
	}

	pub(crate) fn contains(&self, name: &str) -> bool {
		self.reserved.contains(name)
	}

	pub(crate) fn reserve(&mut self, name: impl Into<String>) {
		let name = name.into();
		debug_assert!(!self.reserved.contains(&name), "type {name} compiled twice");
		self.reserved.insert(name);
	}

	pub(crate) fn define(&mut self, ty: Type) {
		self.types.push(ty);
	}

	pub(crate) fn into_types(self) -> Vec<Type> {
		self.types
	}

	#[cfg(test)]
	pub(crate) fn compiled(&self) -> usize {
		self.types.len()
	}
}

/// Compile the schema for the given backend client and model catalog.
pub fn generate_schema(client: &Arc<Client>, catalog: &Catalog) -> Result<Schema, GqlError> {
	let mut registry = TypeRegistry::new();
	let query = Object::new("Query");
	let query = process_allocs(query, catalog, &mut registry, client)?;

	let mut schema = Schema::build("Query", None, None).register(query);
	for ty in registry.into_types() {
		trace!("adding type: {ty:?}");
		schema = schema.register(ty);
	}

	schema
		.finish()
		.map_err(|e| schema_error(format!("there was an error generating schema: {e:?}")))
}

/// Compile one struct descriptor into an object type, memoizing by name.
///
/// On a registry hit the cached type is referenced without re-walking its
/// fields; this both deduplicates shared substructures and terminates
/// recursive models.
pub(crate) fn compile_object(
	name: &str,
	catalog: &Catalog,
	registry: &mut TypeRegistry,
) -> Result<TypeRef, GqlError> {
	if registry.contains(name) {
		return Ok(TypeRef::named(name.to_owned()));
	}
	let def = catalog
		.get(name)
		.ok_or_else(|| schema_error(format!("no type definition named `{name}` in the model catalog")))?;
	trace!("compiling type: {}", def.name);
	registry.reserve(def.name);

	let mut obj = Object::new(def.name);
	for fd in &def.fields {
		let Some(ty) = field_type(def, fd, catalog, registry)? else {
			continue;
		};
		obj = obj.field(Field::new(fd.name, ty, make_field_resolver(fd.name, fd.kind.clone())));
	}
	registry.define(Type::Object(obj));

	Ok(TypeRef::named(def.name))
}

/// Decide the query-language type for one field, or `None` to drop it.
///
/// Dropping is deliberate: the backend model is externally versioned and
/// may contain shapes with no query-language equivalent, and a usable
/// partial schema beats a failed startup.
fn field_type(
	owner: &TypeDef,
	fd: &FieldDef,
	catalog: &Catalog,
	registry: &mut TypeRegistry,
) -> Result<Option<TypeRef>, GqlError> {
	let ty = match &fd.kind {
		Kind::Map(value) => return assoc_list_type(owner, fd, value, catalog, registry),
		Kind::Timestamp => TypeRef::named_nn(TypeRef::INT),
		Kind::Struct(name) => TypeRef::NonNull(Box::new(compile_object(name, catalog, registry)?)),
		Kind::Ptr(inner) => match inner.as_ref() {
			Kind::Struct(name) => compile_object(name, catalog, registry)?,
			Kind::Timestamp => TypeRef::named(TypeRef::INT),
			k => match scalar_type_name(k) {
				Some(n) => TypeRef::named(n),
				None => return Ok(None),
			},
		},
		Kind::List(elem) => match elem.as_ref() {
			Kind::Struct(name) => {
				compile_object(name, catalog, registry)?;
				TypeRef::named_nn_list_nn(*name)
			}
			Kind::Ptr(inner) => match inner.as_ref() {
				Kind::Struct(name) => {
					compile_object(name, catalog, registry)?;
					TypeRef::named_list_nn(*name)
				}
				_ => return Ok(None),
			},
			k => match scalar_type_name(k) {
				Some(n) => TypeRef::named_list_nn(n),
				None => return Ok(None),
			},
		},
		k => match scalar_type_name(k) {
			Some(n) => TypeRef::named_nn(n),
			None => {
				warn!("skipping field `{}` on `{}`: no scalar mapping for kind {:?}", fd.name, owner.name, k);
				return Ok(None);
			}
		},
	};
	Ok(Some(ty))
}

/// Represent a map field as a non-nullable list of non-nullable
/// `{key, value}` entries, synthesizing the auxiliary entry type.
///
/// The entry type name is prefixed with the owning type so that two
/// different types may each carry a same-named map field without
/// colliding in the registry.
fn assoc_list_type(
	owner: &TypeDef,
	fd: &FieldDef,
	value_kind: &Kind,
	catalog: &Catalog,
	registry: &mut TypeRegistry,
) -> Result<Option<TypeRef>, GqlError> {
	let value_ty = match value_kind {
		Kind::Struct(name) => TypeRef::NonNull(Box::new(compile_object(name, catalog, registry)?)),
		Kind::Ptr(inner) => match inner.as_ref() {
			Kind::Struct(name) => {
				TypeRef::NonNull(Box::new(compile_object(name, catalog, registry)?))
			}
			_ => return Ok(None),
		},
		Kind::List(elem) => match scalar_type_name(elem) {
			Some(n) => TypeRef::NonNull(Box::new(TypeRef::named_nn_list(n))),
			None => return Ok(None),
		},
		k => match scalar_type_name(k) {
			Some(n) => TypeRef::named_nn(n),
			None => return Ok(None),
		},
	};

	let item_name = format!("{}{}MapItem", owner.name, fd.name);
	let item = Object::new(&item_name)
		.field(Field::new(
			"key",
			TypeRef::named_nn(TypeRef::STRING),
			make_field_resolver("key", Kind::String),
		))
		.field(Field::new("value", value_ty, make_field_resolver("value", value_kind.clone())));
	registry.define(Type::Object(item));

	Ok(Some(TypeRef::named_nn_list_nn(item_name)))
}

/// The fixed mapping from primitive kinds to query-language scalars.
pub(crate) fn scalar_type_name(kind: &Kind) -> Option<&'static str> {
	match kind {
		Kind::String => Some(TypeRef::STRING),
		Kind::Bool => Some(TypeRef::BOOLEAN),
		Kind::Int
		| Kind::Int8
		| Kind::Int16
		| Kind::Int32
		| Kind::Int64
		| Kind::Uint
		| Kind::Uint8
		| Kind::Uint16
		| Kind::Uint32
		| Kind::Uint64 => Some(TypeRef::INT),
		Kind::Float32 | Kind::Float64 => Some(TypeRef::FLOAT),
		_ => None,
	}
}
