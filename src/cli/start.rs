use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use nomad_gql_core::api::{self, Client};
use nomad_gql_core::gql;
use nomad_gql_core::model::nomad;

use crate::cnf::LOGO;
use crate::err::Error;
use crate::net;
use crate::telemetry;

#[derive(Args, Debug)]
pub struct StartCommandArguments {
	#[arg(help = "The hostname or ip address to listen for connections on")]
	#[arg(env = "NOMAD_GQL_BIND", short = 'b', long = "bind")]
	#[arg(default_value = "0.0.0.0:5577")]
	pub(crate) listen_address: String,
	#[arg(help = "The address of the Nomad agent to query")]
	#[arg(env = "NOMAD_ADDR", long = "nomad-addr")]
	#[arg(default_value = api::DEFAULT_ADDRESS)]
	pub(crate) nomad_address: String,
	#[arg(help = "The secret token used to authenticate with the Nomad agent")]
	#[arg(env = "NOMAD_TOKEN", long = "nomad-token")]
	pub(crate) nomad_token: Option<String>,
	#[arg(help = "The timeout for backend requests, in seconds")]
	#[arg(env = "NOMAD_GQL_TIMEOUT", long = "timeout")]
	#[arg(default_value = "60")]
	pub(crate) timeout: u64,
	#[arg(help = "The logging level for the server")]
	#[arg(env = "NOMAD_GQL_LOG", short = 'l', long = "log")]
	#[arg(default_value = "info")]
	pub(crate) log: String,
	#[arg(help = "Whether to hide the startup banner")]
	#[arg(env = "NOMAD_GQL_NO_BANNER", long)]
	pub(crate) no_banner: bool,
}

#[tokio::main]
pub async fn init(args: StartCommandArguments) -> Result<(), Error> {
	// Initialize the logging subscriber
	telemetry::builder().with_log_level(&args.log).init();
	// Check if a banner should be outputted
	if !args.no_banner {
		println!("{LOGO}");
	}
	// Configure the backend API client
	let client = Arc::new(Client::new(api::Config {
		address: args.nomad_address,
		token: args.nomad_token,
		timeout: Some(Duration::from_secs(args.timeout)),
	})?);
	// Compile the GraphQL schema from the backend model. Failure here
	// aborts startup; there is no partial-service mode at this level.
	info!("Compiling the GraphQL schema");
	let schema = gql::generate_schema(&client, &nomad::catalog())?;
	// Start the web server
	net::init(schema, &args.listen_address).await?;
	// All ok
	Ok(())
}
