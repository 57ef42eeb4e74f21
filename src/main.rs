#[macro_use]
extern crate tracing;

mod cli;
mod cnf;
mod err;
mod net;
mod telemetry;

use std::process::ExitCode;

fn main() -> ExitCode {
	cli::init()
}
