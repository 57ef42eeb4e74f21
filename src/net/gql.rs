use std::env;

use async_graphql::dynamic::Schema;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post_service};
use axum::Router;

use crate::cnf::GRAPHIQL_VAR;

pub(super) fn router(schema: Schema) -> Router {
	let service = GraphQL::new(schema);
	match env::var(GRAPHIQL_VAR).as_deref() {
		Ok("true") => {
			warn!("IMPORTANT: The GraphiQL user interface is enabled. This is not recommended for production use.");
			Router::new().route("/graphql", get(graphiql).post_service(service))
		}
		_ => Router::new().route("/graphql", post_service(service)),
	}
}

async fn graphiql() -> impl IntoResponse {
	Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
