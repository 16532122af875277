// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `warden check`: decide one request.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};
use warden_authz::{
	AccessRequest, AuthorizationDecision, Credentials, EvaluationContext, IndeterminatePolicy,
	NormalizedPath, ObjectId,
};
use warden_authz_config::{compile, PolicyConfig};

use super::{EXIT_DENIED, EXIT_NO_DECISION};

#[derive(Args, Debug)]
pub struct CheckArgs {
	/// Policy file (TOML)
	#[arg(long, short = 'p', env = "WARDEN_POLICY")]
	pub policy: PathBuf,

	/// Requested path
	#[arg(long)]
	pub path: String,

	/// Protected object the request operates on
	#[arg(long)]
	pub object: Option<String>,

	/// Authenticated user id; omit for an anonymous request
	#[arg(long)]
	pub user: Option<String>,

	/// Group membership (repeatable)
	#[arg(long = "group", value_name = "GROUP")]
	pub groups: Vec<String>,

	/// Granted permission (repeatable)
	#[arg(long = "permission", value_name = "PERMISSION")]
	pub permissions: Vec<String>,

	/// Named argument supplied with the request (repeatable)
	#[arg(long = "arg", value_name = "NAME")]
	pub named_args: Vec<String>,

	/// Number of positional arguments supplied with the request
	#[arg(long, default_value_t = 0)]
	pub positional: usize,

	/// Override the policy's handling of indeterminate decisions
	#[arg(long, value_name = "POLICY")]
	pub indeterminate_policy: Option<IndeterminatePolicy>,

	/// Print the verdict as JSON
	#[arg(long)]
	pub json: bool,
}

impl CheckArgs {
	fn credentials(&self) -> Credentials {
		let credentials = match &self.user {
			Some(user) => Credentials::for_user(user.as_str()),
			None => Credentials::anonymous(),
		};
		credentials
			.with_groups(self.groups.iter().cloned())
			.with_permissions(self.permissions.iter().cloned())
	}

	fn request(&self) -> anyhow::Result<AccessRequest> {
		let mut request = AccessRequest::new(&self.path)
			.with_named_args(self.named_args.iter().cloned())
			.with_positional_args(self.positional);
		if let Some(object) = &self.object {
			let object = ObjectId::new(object.as_str()).context("invalid --object")?;
			request = request.with_object(object);
		}
		Ok(request)
	}
}

/// Outcome of a check, as printed.
#[derive(Debug, Serialize)]
pub struct Verdict {
	pub path: NormalizedPath,
	pub allowed: bool,
	pub indeterminate_policy: IndeterminatePolicy,
	pub decision: Option<AuthorizationDecision>,
}

impl Verdict {
	pub fn exit_code(&self) -> u8 {
		match &self.decision {
			None => EXIT_NO_DECISION,
			Some(_) if self.allowed => 0,
			Some(_) => EXIT_DENIED,
		}
	}

	pub fn summary(&self) -> String {
		let Some(decision) = &self.decision else {
			return format!("no decision: no rule applies to {}", self.path);
		};

		let mut out = String::from(if self.allowed { "allow" } else { "deny" });
		if decision.is_indeterminate() {
			out.push_str(" (indeterminate)");
		}
		if !self.allowed {
			if let Some(reason) = decision.reason() {
				let _ = write!(out, ": {reason}");
			}
			if let Some(handler) = decision.denial_handler() {
				let _ = write!(out, " [handler: {handler}]");
			}
		}
		out
	}
}

#[instrument(level = "debug", skip_all, fields(path = %args.path))]
pub fn evaluate(args: &CheckArgs, config: &PolicyConfig) -> anyhow::Result<Verdict> {
	let acls = compile(config).context("policy does not compile")?;
	let credentials = args.credentials();
	let request = args.request()?;
	let policy = args
		.indeterminate_policy
		.unwrap_or(config.engine.indeterminate_policy);

	let decision = acls.decide(&EvaluationContext::new(&credentials, &request));
	let allowed = decision
		.as_ref()
		.is_some_and(|decision| decision.is_allowed_under(policy));
	debug!(allowed, ?policy, "request checked");

	Ok(Verdict {
		path: request.path().clone(),
		allowed,
		indeterminate_policy: policy,
		decision,
	})
}

pub fn execute(args: &CheckArgs) -> anyhow::Result<ExitCode> {
	let config = super::load_policy(&args.policy)?;
	let verdict = evaluate(args, &config)?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&verdict)?);
	} else {
		println!("{}", verdict.summary());
	}
	Ok(ExitCode::from(verdict.exit_code()))
}
