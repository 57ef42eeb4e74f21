mod gql;
mod health;
mod signals;
mod version;

use std::net::SocketAddr;

use async_graphql::dynamic::Schema;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::err::Error;

pub async fn init(schema: Schema, bind: &str) -> Result<(), Error> {
	// Parse the server listen address
	let adr: SocketAddr = bind.parse()?;
	// Build the router with all endpoints
	let net = Router::new()
		.merge(health::router())
		.merge(version::router())
		.merge(gql::router(schema));
	// Log all requests at the transport layer
	let net = net.layer(TraceLayer::new_for_http());
	// Bind and serve until a shutdown signal arrives
	let listener = TcpListener::bind(adr).await?;
	info!("Started web server on {}", adr);
	axum::serve(listener, net).with_graceful_shutdown(signals::shutdown()).await?;
	info!("Web server stopped. Bye!");
	Ok(())
}
