// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end resolution and projection through a registry laid out the way
//! `fargo-flags new` generates it.

mod flags;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fargo_flags::{
	FlagCondition, FlagContext, FlagDefinition, FlagRegistry, FlagResolver, FlagSchema, FlagsError,
	ObjectField, Subject, TestFlags,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn signed_in(plan: Option<&'static str>) -> FlagContext {
	FlagContext::new().with_user(move || async move {
		let mut user = Subject::new("user-1");
		if let Some(plan) = plan {
			user = user.with_plan(plan);
		}
		Ok(Some(user))
	})
}

fn plan_tier() -> FlagDefinition {
	FlagDefinition::new(
		"plan-tier",
		FlagSchema::enumeration(["free", "pro"]),
		json!("free"),
	)
	.with_decide(|ctx: FlagContext| async move {
		let user = ctx.user().await?;
		Ok(user.and_then(|u| u.plan).map(Value::String))
	})
}

#[tokio::test]
async fn generated_registry_resolves_for_anonymous_and_signed_in() {
	let resolver = FlagResolver::new(flags::registry().unwrap());

	let anonymous = resolver.resolve_client_flags(None).await.unwrap();
	assert_eq!(
		anonymous.to_json(),
		json!({
			"enable-ai-assistant-in-pdf-toolbar": false,
			"pagination-ui-location": "bottom",
			"theme-mode": "light",
		})
	);

	let ctx = signed_in(None);
	let resolved = resolver.resolve_all(Some(&ctx)).await.unwrap();
	assert_eq!(resolved.len(), 4);
	assert_eq!(resolved.get_str("ai-claims-model").unwrap(), "openai-gpt-4o-mini");

	let client = resolver.pick_client_flags(&resolved).unwrap();
	assert!(client.get_bool("enable-ai-assistant-in-pdf-toolbar").unwrap());
	assert!(!client.contains("ai-claims-model"));
}

#[test]
fn generated_registry_is_consistent() {
	let registry = flags::registry().unwrap();
	assert!(registry.check_consistency().is_consistent());
	assert_eq!(
		registry.public_keys(),
		[
			flags::enable_ai_assistant_in_pdf_toolbar::KEY,
			flags::pagination_ui_location::KEY,
			flags::theme_mode::KEY,
		]
	);
}

#[tokio::test]
async fn public_flag_without_decide_uses_default() {
	let registry = FlagRegistry::from_definitions([FlagDefinition::new(
		"dark-mode",
		FlagSchema::Boolean,
		json!(false),
	)
	.public()])
	.unwrap();
	let resolver = FlagResolver::new(registry);

	let flags = resolver.resolve_all(None).await.unwrap();
	assert_eq!(flags.to_json(), json!({"dark-mode": false}));
	let client = resolver.pick_client_flags(&flags).unwrap();
	assert_eq!(client.to_json(), json!({"dark-mode": false}));
}

#[tokio::test]
async fn decide_reads_user_plan() {
	let resolver = FlagResolver::new(FlagRegistry::from_definitions([plan_tier()]).unwrap());

	let pro = resolver.resolve_all(Some(&signed_in(Some("pro")))).await.unwrap();
	assert_eq!(pro.get_str("plan-tier").unwrap(), "pro");

	// No plan means no opinion, so the default applies.
	let no_plan = resolver.resolve_all(Some(&signed_in(None))).await.unwrap();
	assert_eq!(no_plan.get_str("plan-tier").unwrap(), "free");

	let anonymous = resolver.resolve_all(None).await.unwrap();
	assert_eq!(anonymous.get_str("plan-tier").unwrap(), "free");
}

#[tokio::test]
async fn server_only_flag_stays_on_the_server() {
	let resolver = FlagResolver::new(FlagRegistry::from_definitions([plan_tier()]).unwrap());

	let flags = resolver.resolve_all(Some(&signed_in(Some("pro")))).await.unwrap();
	let client = resolver.pick_client_flags(&flags).unwrap();
	assert!(client.is_empty());
}

#[tokio::test]
async fn out_of_schema_decision_fails_resolution() {
	let registry = FlagRegistry::from_definitions([
		FlagDefinition::new("dark-mode", FlagSchema::Boolean, json!(false)).public(),
		FlagDefinition::new(
			"ai-model",
			FlagSchema::enumeration(["a", "b"]),
			json!("a"),
		)
		.with_decide(|_ctx| async { Ok(Some(json!("c"))) }),
	])
	.unwrap();

	let err = fargo_flags::resolve_all(&registry, None).await.unwrap_err();
	match err {
		FlagsError::Validation { key, violation } => {
			assert_eq!(key, "ai-model");
			assert_eq!(violation.actual, "\"c\"");
		}
		other => panic!("expected validation error, got {other:?}"),
	}
}

#[tokio::test]
async fn serializer_strips_server_detail() {
	let registry = FlagRegistry::from_definitions([FlagDefinition::new(
		"permissions",
		FlagSchema::object([
			ObjectField::required("canEdit", FlagSchema::Boolean),
			ObjectField::required("userId", FlagSchema::String),
		]),
		json!({"canEdit": false, "userId": ""}),
	)
	.public_with(|v| json!({"canEdit": v["canEdit"]}))
	.with_decide(|_ctx| async { Ok(Some(json!({"canEdit": true, "userId": "u1"}))) })])
	.unwrap();
	let resolver = FlagResolver::new(registry);

	let flags = resolver.resolve_all(None).await.unwrap();
	assert_eq!(
		flags.get("permissions"),
		Some(&json!({"canEdit": true, "userId": "u1"}))
	);
	let client = resolver.pick_client_flags(&flags).unwrap();
	assert_eq!(client.to_json(), json!({"permissions": {"canEdit": true}}));
}

#[tokio::test]
async fn empty_registry_resolves_to_empty_sets() {
	let resolver = FlagResolver::new(FlagRegistry::empty());
	let flags = resolver.resolve_all(Some(&signed_in(None))).await.unwrap();
	assert!(flags.is_empty());
	assert!(resolver.pick_client_flags(&flags).unwrap().is_empty());
}

#[tokio::test]
async fn one_failing_decision_fails_the_whole_call() {
	let registry = FlagRegistry::from_definitions([
		FlagDefinition::new("dark-mode", FlagSchema::Boolean, json!(false)).public(),
		FlagDefinition::new("flaky", FlagSchema::Boolean, json!(false))
			.public()
			.with_decide(|_ctx| async { Err("upstream timed out".into()) }),
	])
	.unwrap();
	let resolver = FlagResolver::new(registry);

	let err = resolver.resolve_all(None).await.unwrap_err();
	assert!(matches!(err, FlagsError::Decision { ref key, .. } if key == "flaky"));
	assert!(resolver.client_flags_or_empty(None).await.is_empty());
}

#[tokio::test]
async fn decisions_run_concurrently() {
	const FLAGS: usize = 8;
	const DELAY: Duration = Duration::from_millis(100);

	let in_flight = Arc::new(AtomicUsize::new(0));
	let peak = Arc::new(AtomicUsize::new(0));

	let definitions = (0..FLAGS).map(|i| {
		let in_flight = Arc::clone(&in_flight);
		let peak = Arc::clone(&peak);
		FlagDefinition::new(format!("slow-{i}"), FlagSchema::Boolean, json!(false)).with_decide(
			move |_ctx| {
				let in_flight = Arc::clone(&in_flight);
				let peak = Arc::clone(&peak);
				async move {
					let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
					peak.fetch_max(now, Ordering::SeqCst);
					tokio::time::sleep(DELAY).await;
					in_flight.fetch_sub(1, Ordering::SeqCst);
					Ok(Some(json!(true)))
				}
			},
		)
	});
	let registry = FlagRegistry::from_definitions(definitions).unwrap();

	let start = Instant::now();
	let flags = fargo_flags::resolve_all(&registry, None).await.unwrap();
	let elapsed = start.elapsed();

	assert_eq!(flags.len(), FLAGS);
	assert_eq!(peak.load(Ordering::SeqCst), FLAGS);
	assert!(elapsed < DELAY * 4, "took {elapsed:?}");
}

#[tokio::test]
async fn concurrent_requests_share_one_resolver() {
	let resolver = FlagResolver::new(flags::registry().unwrap());

	let handles: Vec<_> = (0..16)
		.map(|i| {
			let resolver = resolver.clone();
			tokio::spawn(async move {
				let ctx = if i % 2 == 0 { Some(signed_in(None)) } else { None };
				resolver.resolve_client_flags(ctx.as_ref()).await
			})
		})
		.collect();

	for (i, handle) in handles.into_iter().enumerate() {
		let client = handle.await.unwrap().unwrap();
		assert_eq!(
			client.get_bool("enable-ai-assistant-in-pdf-toolbar").unwrap(),
			i % 2 == 0
		);
	}
}

#[test]
fn test_flags_drive_conditions() {
	let registry = flags::registry().unwrap();
	let client = TestFlags::from_registry(&registry)
		.unwrap()
		.with(flags::theme_mode::KEY, "dark")
		.build();

	assert!(FlagCondition::when(flags::theme_mode::KEY).is("dark").evaluate(&client));
	assert!(!FlagCondition::when(flags::enable_ai_assistant_in_pdf_toolbar::KEY).evaluate(&client));
	assert!(!FlagCondition::when(flags::ai_claims_model::KEY).evaluate(&client));
}

fn arb_flag_set() -> impl Strategy<Value = (Vec<(bool, bool)>, Vec<bool>)> {
	// Per flag: (public definition, on the public list), plus a random
	// boolean decision per flag.
	(1usize..12).prop_flat_map(|n| {
		(
			prop::collection::vec((any::<bool>(), any::<bool>()), n),
			prop::collection::vec(any::<bool>(), n),
		)
	})
}

proptest! {
	#[test]
	fn client_keys_are_public_and_listed((shape, decisions) in arb_flag_set()) {
		let mut builder = FlagRegistry::builder();
		for (i, ((public, listed), decision)) in shape.iter().zip(&decisions).enumerate() {
			let key = format!("flag-{i}");
			let value = json!(*decision);
			let mut def = FlagDefinition::new(key.clone(), FlagSchema::Boolean, json!(false))
				.with_decide(move |_ctx| {
					let value = value.clone();
					async move { Ok(Some(value)) }
				});
			if *public {
				def = def.public();
			}
			builder = builder.register(def);
			if *listed {
				builder = builder.expose(key);
			}
		}
		let registry = builder.build().unwrap();

		let flags = tokio_test::block_on(fargo_flags::resolve_all(&registry, None)).unwrap();
		prop_assert_eq!(flags.len(), registry.len());
		for (i, decision) in decisions.iter().enumerate() {
			prop_assert_eq!(flags.get_bool(&format!("flag-{i}")).unwrap(), *decision);
		}

		let client = fargo_flags::pick_client_flags(&registry, &flags).unwrap();
		for (i, (public, listed)) in shape.iter().enumerate() {
			let key = format!("flag-{i}");
			prop_assert_eq!(client.contains(&key), *public && *listed);
			if client.contains(&key) {
				prop_assert_eq!(client.get(&key), flags.get(&key));
			}
		}
	}
}
