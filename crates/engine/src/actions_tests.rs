// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn dispatch_with(f: impl FnOnce(&mut Registry)) -> RegistryDispatch {
    let mut registry = Registry::new();
    f(&mut registry);
    RegistryDispatch::new(Arc::new(registry))
}

#[test]
fn func_action_runs_directly() {
    let dispatch = RegistryDispatch::default();
    let ctx = Context::new();
    let event = Event::new("go");
    let mut scope = ActionScope::new(&ctx, &event);

    let action = ActionRef::func(|scope| {
        scope.context().set("ran", json!(true));
        Ok(())
    });
    dispatch.run(&action, &mut scope).unwrap();
    assert_eq!(ctx.get("ran"), Some(json!(true)));
}

#[test]
fn named_action_resolves_via_registry() {
    let dispatch = dispatch_with(|r| {
        r.register_action("mark", |scope| {
            scope.context().set("mark", scope.event().event_type().as_str().into());
            Ok(())
        });
    });
    let ctx = Context::new();
    let event = Event::new("go");
    let mut scope = ActionScope::new(&ctx, &event);

    dispatch.run(&ActionRef::named("mark"), &mut scope).unwrap();
    assert_eq!(ctx.get("mark"), Some(json!("go")));
}

#[test]
fn unregistered_action_errors() {
    let dispatch = RegistryDispatch::default();
    let ctx = Context::new();
    let event = Event::new("go");
    let mut scope = ActionScope::new(&ctx, &event);

    let err = dispatch.run(&ActionRef::named("missing"), &mut scope).unwrap_err();
    assert!(err.0.contains("missing"));
}

#[test]
fn unregistered_guard_fails_closed() {
    let dispatch = RegistryDispatch::default();
    let ctx = Context::new();
    assert!(!dispatch.evaluate(&GuardRef::named("missing"), &ctx, &Event::new("go")));
}

#[test]
fn named_guard_resolves_via_registry() {
    let dispatch = dispatch_with(|r| {
        r.register_guard("armed", |ctx, _| ctx.get("armed") == Some(json!(true)));
    });
    let ctx = Context::new();
    let guard = GuardRef::named("armed");

    assert!(!dispatch.evaluate(&guard, &ctx, &Event::new("go")));
    ctx.set("armed", json!(true));
    assert!(dispatch.evaluate(&guard, &ctx, &Event::new("go")));
}

#[test]
fn scope_collects_posted_events() {
    let ctx = Context::new();
    let event = Event::new("go");
    let mut scope = ActionScope::new(&ctx, &event);

    scope.post(Event::new("next"));
    scope.post(Event::new("later"));
    let posted = scope.take_posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].event_type().as_str(), "next");
}

#[test]
fn refs_serialise_as_names() {
    assert_eq!(serde_json::to_string(&ActionRef::named("log")).unwrap(), "\"log\"");
    assert_eq!(serde_json::to_string(&ActionRef::func(|_| Ok(()))).unwrap(), "\"#fn\"");

    let parsed: ActionRef = serde_json::from_str("\"log\"").unwrap();
    assert_eq!(parsed, ActionRef::named("log"));
}

#[test]
fn ref_equality() {
    assert_eq!(GuardRef::named("g"), GuardRef::named("g"));
    assert_ne!(GuardRef::named("g"), GuardRef::named("h"));

    let f = GuardRef::func(|_, _| true);
    assert_eq!(f, f.clone());
    assert_ne!(f, GuardRef::func(|_, _| true));
}
