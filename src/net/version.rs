use axum::routing::get;
use axum::Router;

use crate::cnf::{PKG_NAME, PKG_VERSION};

pub(super) fn router() -> Router {
	Router::new().route("/version", get(handler))
}

async fn handler() -> String {
	format!("{PKG_NAME}-{}", *PKG_VERSION)
}
