use crate::cnf::{PKG_NAME, PKG_VERSION};
use crate::err::Error;

pub fn init() -> Result<(), Error> {
	println!("{PKG_NAME} {}", *PKG_VERSION);
	Ok(())
}
