// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information and version utilities.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"{} {}\n\
		 Platform: {}-{}",
		env!("CARGO_PKG_NAME"),
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}
