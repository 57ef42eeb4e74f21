use std::collections::BTreeMap;
use std::sync::Arc;

use nomad_gql_core::api::{Client, Config};
use nomad_gql_core::gql::generate_schema;
use nomad_gql_core::model::nomad;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<Client> {
	Arc::new(
		Client::new(Config {
			address: server.uri(),
			token: None,
			timeout: None,
		})
		.unwrap(),
	)
}

async fn query_params(server: &MockServer) -> Vec<BTreeMap<String, String>> {
	server
		.received_requests()
		.await
		.unwrap()
		.iter()
		.map(|r| r.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect())
		.collect()
}

#[tokio::test]
async fn schema_exposes_both_root_fields() {
	let server = MockServer::start().await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();
	let sdl = schema.sdl();
	assert!(sdl.contains("allocations(prefix: String, namespace: String): [AllocationListStub!]!"));
	assert!(sdl.contains("allocation(id: String!): Allocation"));
}

#[tokio::test]
async fn schema_degrades_on_unsupported_shapes() {
	let server = MockServer::start().await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();
	let sdl = schema.sdl();
	// The untyped task driver configuration has no schema counterpart.
	assert!(sdl.lines().all(|l| !l.trim_start().starts_with("Config:")));
	// Everything else on the task survived.
	assert!(sdl.contains("Driver: String!"));
	// Header maps carry string-list values.
	assert!(sdl.contains("Header: [ServiceCheckHeaderMapItem!]!"));
	assert!(sdl.contains("value: [String!]!"));
}

#[tokio::test]
async fn shared_types_are_compiled_once() {
	let server = MockServer::start().await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();
	let sdl = schema.sdl();
	// TaskState is reachable from both entry points, but is defined once,
	// with one entry type per owning map field.
	assert_eq!(sdl.matches("type TaskState ").count(), 1);
	assert!(sdl.contains("type AllocationListStubTaskStatesMapItem"));
	assert!(sdl.contains("type AllocationTaskStatesMapItem"));
}

#[tokio::test]
async fn listing_defaults_to_the_cheap_backend_call() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/allocations"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([{"ID": "a1"}])))
		.mount(&server)
		.await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();

	let response = schema.execute("{ allocations { ID } }").await;
	assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
	let data = response.data.into_json().unwrap();
	assert_eq!(data["allocations"][0]["ID"], json!("a1"));

	let params = query_params(&server).await;
	assert_eq!(params.len(), 1);
	assert_eq!(params[0].get("task_states").map(String::as_str), Some("false"));
	assert!(!params[0].contains_key("resources"));
}

#[tokio::test]
async fn selecting_expensive_fields_sets_backend_flags() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/allocations"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([{
			"ID": "a1",
			"TaskStates": {
				"web": {"State": "running", "StartedAt": "2015-10-21T07:28:00Z"}
			},
			"AllocatedResources": {
				"Shared": {"DiskMB": 300}
			}
		}])))
		.mount(&server)
		.await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();

	let response = schema
		.execute(
			"{ allocations { ID TaskStates { key value { State StartedAt } } AllocatedResources { Shared { DiskMB } } } }",
		)
		.await;
	assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
	let data = response.data.into_json().unwrap();
	let states = data["allocations"][0]["TaskStates"].as_array().unwrap();
	assert_eq!(states.len(), 1);
	assert_eq!(states[0]["key"], json!("web"));
	assert_eq!(states[0]["value"]["State"], json!("running"));
	assert_eq!(states[0]["value"]["StartedAt"], json!(1445412480));
	assert_eq!(data["allocations"][0]["AllocatedResources"]["Shared"]["DiskMB"], json!(300));

	let params = query_params(&server).await;
	assert_eq!(params[0].get("task_states").map(String::as_str), Some("true"));
	assert_eq!(params[0].get("resources").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn listing_arguments_pass_through_verbatim() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/allocations"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.mount(&server)
		.await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();

	let response =
		schema.execute(r#"{ allocations(prefix: "ab12", namespace: "batch") { ID } }"#).await;
	assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);

	let params = query_params(&server).await;
	assert_eq!(params[0].get("prefix").map(String::as_str), Some("ab12"));
	assert_eq!(params[0].get("namespace").map(String::as_str), Some("batch"));
	assert_eq!(params[0].get("task_states").map(String::as_str), Some("false"));
}

#[tokio::test]
async fn missing_allocation_resolves_to_null() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/allocation/missing"))
		.respond_with(ResponseTemplate::new(404).set_body_string("alloc not found"))
		.mount(&server)
		.await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();

	let response = schema.execute(r#"{ allocation(id: "missing") { ID } }"#).await;
	assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
	let data = response.data.into_json().unwrap();
	assert_eq!(data["allocation"], json!(null));
}

#[tokio::test]
async fn reading_an_allocation_resolves_nested_detail() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/allocation/a1"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"ID": "a1",
			"Job": {"ID": "web", "Priority": 50, "Meta": {"team": "infra", "tier": "1"}},
			"TaskStates": {
				"web": {"FinishedAt": "0001-01-01T00:00:00Z"}
			}
		})))
		.mount(&server)
		.await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();

	let response = schema
		.execute(
			r#"{ allocation(id: "a1") { ID Job { ID Priority Meta { key value } } TaskStates { key value { FinishedAt } } } }"#,
		)
		.await;
	assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
	let data = response.data.into_json().unwrap();
	assert_eq!(data["allocation"]["ID"], json!("a1"));
	assert_eq!(data["allocation"]["Job"]["ID"], json!("web"));
	assert_eq!(data["allocation"]["Job"]["Priority"], json!(50));
	let mut meta: Vec<(String, String)> = data["allocation"]["Job"]["Meta"]
		.as_array()
		.unwrap()
		.iter()
		.map(|e| {
			(e["key"].as_str().unwrap().to_owned(), e["value"].as_str().unwrap().to_owned())
		})
		.collect();
	meta.sort();
	assert_eq!(
		meta,
		vec![("team".to_owned(), "infra".to_owned()), ("tier".to_owned(), "1".to_owned())]
	);
	assert_eq!(
		data["allocation"]["TaskStates"][0]["value"]["FinishedAt"],
		json!(-62135596800i64)
	);
}

#[tokio::test]
async fn backend_failures_surface_as_field_errors() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/v1/allocations"))
		.respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
		.mount(&server)
		.await;
	let schema = generate_schema(&client_for(&server), &nomad::catalog()).unwrap();

	let response = schema.execute("{ allocations { ID } }").await;
	assert!(!response.errors.is_empty());
	assert!(response.errors[0].message.contains("Backend error"));
}
