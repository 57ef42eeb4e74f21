use axum::routing::get;
use axum::Router;

pub(super) fn router() -> Router {
	Router::new().route("/health", get(handler))
}

async fn handler() {
	// The schema is compiled before the server binds, so accepting
	// requests is the health signal.
}
