#[macro_use]
extern crate tracing;

pub mod api;
pub mod gql;
pub mod model;
