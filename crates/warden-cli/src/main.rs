// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Warden command-line tool.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod version;

/// Warden - check requests against an authorization policy.
#[derive(Parser, Debug)]
#[command(name = "warden", about = "Check requests against an authorization policy", version)]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Decide a single request against a policy file
	Check(commands::check::CheckArgs),
	/// Load and compile a policy file, then summarize it
	Validate(commands::validate::ValidateArgs),
	/// Show version and build information
	Version,
}

fn main() -> ExitCode {
	let args = Args::parse();

	let result = match args.command {
		Command::Check(args) => commands::check::execute(&args),
		Command::Validate(args) => commands::validate::execute(&args),
		Command::Version => {
			println!("{}", version::format_version_info());
			Ok(ExitCode::SUCCESS)
		}
	};

	result.unwrap_or_else(|e| {
		tracing::error!(error = %e, "command failed");
		eprintln!("error: {e:#}");
		ExitCode::from(commands::EXIT_ERROR)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn test_cli_definition() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_subcommand_required() {
		assert!(Args::try_parse_from(["warden"]).is_err());
		assert!(matches!(
			Args::try_parse_from(["warden", "version"]).unwrap().command,
			Command::Version
		));
	}
}
