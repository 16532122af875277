// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `warden validate`: load, compile and summarize a policy.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use warden_authz::AclCollection;
use warden_authz_config::{compile, PolicyConfig};

#[derive(Args, Debug)]
pub struct ValidateArgs {
	/// Policy file (TOML)
	#[arg(long, short = 'p', env = "WARDEN_POLICY")]
	pub policy: PathBuf,
}

pub fn execute(args: &ValidateArgs) -> anyhow::Result<ExitCode> {
	let config = super::load_policy(&args.policy)?;
	let acls = compile(&config).context("policy does not compile")?;
	print!("{}", summarize(&config, &acls));
	Ok(ExitCode::SUCCESS)
}

pub fn summarize(config: &PolicyConfig, acls: &AclCollection) -> String {
	let entries: usize = acls.acls().iter().map(|acl| acl.entries().len()).sum();

	let mut out = String::new();
	let _ = writeln!(
		out,
		"policy OK: {} ACLs, {} rules, {} entries",
		acls.acls().len(),
		config.rule_count(),
		entries
	);
	let _ = writeln!(
		out,
		"indeterminate policy: {:?}",
		config.engine.indeterminate_policy
	);
	if let Some(handler) = acls.default_denial_handler() {
		let _ = writeln!(out, "default denial handler: {handler}");
	}

	for acl in acls.acls() {
		let _ = write!(out, "  {}: {} entries", acl.base_path(), acl.entries().len());
		if let Some(decision) = acl.default_decision() {
			let _ = write!(out, ", default {}", if decision.allow() { "allow" } else { "deny" });
		}
		if let Some(handler) = acl.default_denial_handler() {
			let _ = write!(out, ", handler {handler}");
		}
		out.push('\n');
	}
	out
}
