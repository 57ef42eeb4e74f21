mod start;
mod version;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nomad-gql", bin_name = "nomad-gql")]
#[command(about = "A GraphQL interface for the Nomad cluster scheduler")]
#[command(disable_version_flag = true, arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[command(about = "Start the GraphQL server")]
	Start(start::StartCommandArguments),
	#[command(about = "Output the command-line tool version information")]
	Version,
}

pub fn init() -> ExitCode {
	let args = Cli::parse();
	let output = match args.command {
		Commands::Start(args) => start::init(args),
		Commands::Version => version::init(),
	};
	if let Err(e) = output {
		error!("{}", e);
		return ExitCode::FAILURE;
	}
	ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn start_arguments_have_defaults() {
		let cli = Cli::try_parse_from(["nomad-gql", "start"]).unwrap();
		let Commands::Start(args) = cli.command else {
			panic!("expected the start subcommand");
		};
		assert_eq!(args.listen_address, "0.0.0.0:5577");
		assert_eq!(args.log, "info");
		assert!(!args.no_banner);
	}

	#[test]
	fn a_subcommand_is_required() {
		assert!(Cli::try_parse_from(["nomad-gql"]).is_err());
	}
}
