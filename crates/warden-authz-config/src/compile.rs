// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turns a loaded [`PolicyConfig`] into an [`AclCollection`].

use tracing::{debug, info, instrument};
use warden_authz::{
	Acl, AclCollection, AuthorizationDecision, AuthzError, DenialHandler, RuleOptions, Target,
};

use crate::error::ConfigError;
use crate::expr::parse_predicate;
use crate::sections::{AclConfig, Effect, RuleConfig, OBJECT_TARGET_PREFIX};
use crate::PolicyConfig;

#[instrument(level = "debug", skip(config), fields(acls = config.acls.len()))]
pub fn compile(config: &PolicyConfig) -> Result<AclCollection, ConfigError> {
	let mut collection = AclCollection::new();
	if let Some(handler) = &config.engine.default_denial_handler {
		collection = collection.with_default_denial_handler(DenialHandler::new(handler.as_str()));
	}

	for (index, acl) in config.acls.iter().enumerate() {
		collection = collection.with_acl(compile_acl(index, acl)?);
	}

	info!(
		acls = collection.acls().len(),
		entries = collection.acls().iter().map(|acl| acl.entries().len()).sum::<usize>(),
		"policy compiled"
	);
	Ok(collection)
}

fn compile_acl(index: usize, config: &AclConfig) -> Result<Acl, ConfigError> {
	let mut acl = Acl::new(&config.base_path);

	if let Some(effect) = config.default {
		let mut decision = match effect {
			Effect::Allow => AuthorizationDecision::allowed(),
			Effect::Deny => AuthorizationDecision::denied(),
		};
		if let Some(reason) = &config.default_reason {
			decision = decision.with_reason(reason.as_str());
		}
		acl = acl.with_default_decision(decision);
	}
	if let Some(handler) = &config.default_denial_handler {
		acl = acl.with_default_denial_handler(DenialHandler::new(handler.as_str()));
	}

	for (rule_index, rule) in config.rules.iter().enumerate() {
		let location = format!("acls[{index}].rules[{rule_index}]");
		debug!(%location, effect = ?rule.effect, "compiling rule");
		acl = compile_rule(acl, rule, &location)?;
	}
	Ok(acl)
}

fn compile_rule(acl: Acl, rule: &RuleConfig, location: &str) -> Result<Acl, ConfigError> {
	let rule_error = |source: AuthzError| ConfigError::Rule {
		location: location.to_string(),
		source,
	};

	let targets = rule
		.targets
		.iter()
		.map(|raw| parse_target(raw))
		.collect::<Result<Vec<_>, _>>()
		.map_err(rule_error)?;

	let mut options = RuleOptions::new()
		.positional_args(rule.positional_args)
		.propagate(rule.propagate);
	if let Some(source) = &rule.predicate {
		let predicate = parse_predicate(source).map_err(|source| ConfigError::Predicate {
			location: location.to_string(),
			source,
		})?;
		options = options.predicate(predicate);
	}
	for name in &rule.named_args {
		options = options.named_arg(name.as_str());
	}
	if let Some(message) = &rule.message {
		options = options.message(message.as_str());
	}
	if rule.force_inclusion {
		options = options.force_inclusion();
	}
	if let Some(handler) = &rule.denial_handler {
		options = options.denial_handler(DenialHandler::new(handler.as_str()));
	}

	let compiled = match rule.effect {
		Effect::Allow => acl.allow(targets, options),
		Effect::Deny => acl.deny(targets, options),
	};
	compiled.map_err(rule_error)
}

/// `object:<name>` names a protected object; anything else is a path.
fn parse_target(raw: &str) -> Result<Target, AuthzError> {
	match raw.strip_prefix(OBJECT_TARGET_PREFIX) {
		Some(name) => Target::object(name.trim()),
		None => Ok(Target::path(raw)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expr::ExprError;
	use crate::sections::EngineConfig;
	use warden_authz::{AccessRequest, Credentials, EvaluationContext, ObjectId};

	fn rule(effect: Effect, targets: &[&str]) -> RuleConfig {
		RuleConfig {
			effect,
			targets: targets.iter().map(|t| t.to_string()).collect(),
			predicate: None,
			named_args: Vec::new(),
			positional_args: 0,
			message: None,
			propagate: true,
			force_inclusion: false,
			denial_handler: None,
		}
	}

	fn policy(acls: Vec<AclConfig>) -> PolicyConfig {
		PolicyConfig {
			engine: EngineConfig::default(),
			acls,
		}
	}

	#[test]
	fn test_targets_and_objects() {
		let config = policy(vec![AclConfig {
			base_path: "/blog".to_string(),
			rules: vec![rule(Effect::Deny, &["drafts", "object:blog:edit"])],
			..Default::default()
		}]);

		let collection = compile(&config).unwrap();
		let entries = collection.acls()[0].entries();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].target(), &Target::path("/blog/drafts"));
		assert_eq!(
			entries[1].target(),
			&Target::Object(ObjectId::new("blog:edit").unwrap())
		);
	}

	#[test]
	fn test_rule_options_carry_over() {
		let mut deny = rule(Effect::Deny, &["/admin"]);
		deny.predicate = Some(r#"not in_group("admins")"#.to_string());
		deny.named_args = vec!["id".to_string()];
		deny.positional_args = 2;
		deny.message = Some("Admins only".to_string());
		deny.propagate = false;
		deny.force_inclusion = true;
		deny.denial_handler = Some("login".to_string());

		let collection = compile(&policy(vec![AclConfig {
			rules: vec![deny],
			..Default::default()
		}]))
		.unwrap();

		let entry = &collection.acls()[0].entries()[0];
		assert!(!entry.allows());
		assert!(entry.named_args().contains("id"));
		assert_eq!(entry.positional_args(), 2);
		assert_eq!(entry.message(), Some("Admins only"));
		assert!(!entry.propagates());
		assert!(entry.is_forced());
		assert_eq!(entry.denial_handler().map(|h| h.as_str()), Some("login"));
		assert_eq!(
			entry.predicate().map(|p| p.to_string()).as_deref(),
			Some(r#"not not in_group("admins")"#)
		);
	}

	#[test]
	fn test_defaults_compile() {
		let mut config = policy(vec![AclConfig {
			base_path: "/private".to_string(),
			default: Some(Effect::Deny),
			default_reason: Some("Private area".to_string()),
			default_denial_handler: Some("login".to_string()),
			..Default::default()
		}]);
		config.engine.default_denial_handler = Some("forbidden".to_string());

		let collection = compile(&config).unwrap();
		assert_eq!(
			collection.default_denial_handler().map(|h| h.as_str()),
			Some("forbidden")
		);

		let credentials = Credentials::for_user("ada");
		let request = AccessRequest::new("/private/notes");
		let decision = collection
			.decide(&EvaluationContext::new(&credentials, &request))
			.unwrap();
		assert!(!decision.allow());
		assert_eq!(decision.reason(), Some("Private area"));
		assert_eq!(decision.denial_handler().map(|h| h.as_str()), Some("login"));
	}

	#[test]
	fn test_bad_predicate_names_location() {
		let mut bad = rule(Effect::Allow, &["/"]);
		bad.predicate = Some("in_team(\"x\")".to_string());
		let config = policy(vec![
			AclConfig::default(),
			AclConfig {
				rules: vec![rule(Effect::Allow, &["/"]), bad],
				..Default::default()
			},
		]);

		let err = compile(&config).unwrap_err();
		match err {
			ConfigError::Predicate { location, source } => {
				assert_eq!(location, "acls[1].rules[1]");
				assert_eq!(source, ExprError::UnknownFunction("in_team".to_string()));
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_engine_rejections_surface() {
		let mut allow = rule(Effect::Allow, &["/"]);
		allow.denial_handler = Some("login".to_string());
		let err = compile(&policy(vec![AclConfig {
			rules: vec![allow],
			..Default::default()
		}]))
		.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Rule {
				source: AuthzError::DenialHandlerOnAllow(_),
				..
			}
		));

		let err = compile(&policy(vec![AclConfig {
			rules: vec![rule(Effect::Deny, &[])],
			..Default::default()
		}]))
		.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Rule {
				source: AuthzError::NoTargets,
				..
			}
		));

		let err = compile(&policy(vec![AclConfig {
			rules: vec![rule(Effect::Deny, &["object:a/b"])],
			..Default::default()
		}]))
		.unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Rule {
				source: AuthzError::InvalidObjectName(_),
				..
			}
		));
	}
}
