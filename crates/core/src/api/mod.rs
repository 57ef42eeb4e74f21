//! The backend API client.
//!
//! The Nomad agent is an opaque data source to the rest of this crate. Two
//! operations are consumed: listing allocations with string-keyed query
//! parameters, and reading one allocation by id. Records come back as raw
//! JSON values; the compiled schema's resolvers know how to walk them.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value as Json;
use thiserror::Error;

/// The default address of a local Nomad agent.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4646";

#[derive(Debug, Error)]
pub enum Error {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error("backend returned status {status}: {message}")]
	Status {
		status: u16,
		message: String,
	},
	#[error("unexpected response shape: {0}")]
	Response(String),
}

/// Connection settings for the backend agent.
#[derive(Clone, Debug)]
pub struct Config {
	pub address: String,
	pub token: Option<String>,
	pub timeout: Option<Duration>,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			address: std::env::var("NOMAD_ADDR").unwrap_or_else(|_| DEFAULT_ADDRESS.to_owned()),
			token: std::env::var("NOMAD_TOKEN").ok().filter(|t| !t.is_empty()),
			timeout: Some(Duration::from_secs(60)),
		}
	}
}

/// A client for the backend agent HTTP API.
pub struct Client {
	http: reqwest::Client,
	address: String,
	token: Option<String>,
}

impl Client {
	pub fn new(config: Config) -> Result<Client, Error> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = config.timeout {
			builder = builder.timeout(timeout);
		}
		let http = builder.build()?;
		Ok(Client {
			http,
			address: config.address.trim_end_matches('/').to_owned(),
			token: config.token,
		})
	}

	fn get(&self, path: &str) -> reqwest::RequestBuilder {
		let mut request = self.http.get(format!("{}{}", self.address, path));
		if let Some(token) = &self.token {
			request = request.header("X-Nomad-Token", token);
		}
		request
	}

	/// List allocations, passing the given query parameters through to the
	/// backend unmodified.
	pub async fn list_allocations(
		&self,
		params: &BTreeMap<String, String>,
	) -> Result<Vec<Json>, Error> {
		let response = self.get("/v1/allocations").query(params).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(Error::Status {
				status: status.as_u16(),
				message: response.text().await.unwrap_or_default(),
			});
		}
		match response.json::<Json>().await? {
			Json::Array(allocs) => Ok(allocs),
			v => Err(Error::Response(format!("expected an array of allocations, found: {v}"))),
		}
	}

	/// Read one allocation by id. A backend not-found response resolves to
	/// `None` rather than an error.
	pub async fn read_allocation(&self, id: &str) -> Result<Option<Json>, Error> {
		let response = self.get(&format!("/v1/allocation/{id}")).send().await?;
		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !status.is_success() {
			return Err(Error::Status {
				status: status.as_u16(),
				message: response.text().await.unwrap_or_default(),
			});
		}
		Ok(Some(response.json::<Json>().await?))
	}
}
