use nomad_gql_core::api;
use nomad_gql_core::gql::GqlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("There was a problem with the backend API client: {0}")]
	Api(#[from] api::Error),
	#[error("There was a problem with the GraphQL schema: {0}")]
	Gql(#[from] GqlError),
	#[error("Couldn't parse the server listen address: {0}")]
	Bind(#[from] std::net::AddrParseError),
	#[error("There was a system IO error: {0}")]
	Io(#[from] std::io::Error),
}
