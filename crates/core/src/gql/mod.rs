mod allocs;
pub mod error;
mod ext;
mod resolver;
pub mod schema;

pub use error::GqlError;
pub use schema::generate_schema;
