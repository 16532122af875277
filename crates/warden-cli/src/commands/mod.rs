// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand implementations.
//!
//! Exit codes: 0 allowed (or valid), 1 denied, 2 error, 3 no rule applied.

pub mod check;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden_authz_config::PolicyConfig;

pub const EXIT_DENIED: u8 = 1;
pub const EXIT_ERROR: u8 = 2;
pub const EXIT_NO_DECISION: u8 = 3;

/// Loads the policy file and installs logging at its configured level.
/// `RUST_LOG` takes precedence over the policy's `log_level`.
pub fn load_policy(path: &Path) -> anyhow::Result<PolicyConfig> {
	let config = warden_authz_config::load_policy_with_file(path)
		.with_context(|| format!("failed to load policy from {}", path.display()))?;
	init_tracing(&config.engine.log_level);
	Ok(config)
}

fn init_tracing(level: &str) {
	// Logs go to stderr; stdout carries the command's result.
	let _ = tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| level.into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.try_init();
}
