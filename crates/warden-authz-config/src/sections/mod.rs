// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod acl;
mod engine;

pub use acl::{AclConfig, Effect, RuleConfig, OBJECT_TARGET_PREFIX};
pub use engine::{EngineConfig, EngineConfigLayer, DEFAULT_LOG_LEVEL};
