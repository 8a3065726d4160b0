// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn get_set_remove() {
    let ctx = Context::new();
    assert_eq!(ctx.get("k"), None);

    ctx.set("k", json!(1));
    assert_eq!(ctx.get("k"), Some(json!(1)));

    assert_eq!(ctx.remove("k"), Some(json!(1)));
    assert_eq!(ctx.get("k"), None);
}

#[test]
fn clones_share_state() {
    let ctx = Context::new();
    let other = ctx.clone();
    other.set("shared", json!(true));
    assert_eq!(ctx.get("shared"), Some(json!(true)));
}

#[test]
fn snapshot_is_detached() {
    let ctx = Context::new();
    ctx.set("a", json!(1));
    let snap = ctx.snapshot();

    ctx.set("a", json!(2));
    assert_eq!(snap.get("a"), Some(&json!(1)));
    assert_eq!(ctx.get("a"), Some(json!(2)));
}

#[test]
fn restore_replaces_contents() {
    let ctx = Context::new();
    ctx.set("old", json!("x"));

    let mut map = ContextMap::new();
    map.insert("new".into(), json!("y"));
    ctx.restore(map);

    assert_eq!(ctx.get("old"), None);
    assert_eq!(ctx.get("new"), Some(json!("y")));
}

#[test]
fn update_reads_and_writes_atomically() {
    let ctx = Context::new();
    ctx.set("count", json!(0));
    for _ in 0..3 {
        ctx.update("count", |v| {
            let n = v.and_then(Value::as_i64).unwrap_or(0);
            json!(n + 1)
        });
    }
    assert_eq!(ctx.get("count"), Some(json!(3)));
}

#[test]
fn concurrent_writers_do_not_lose_updates() {
    let ctx = Context::new();
    ctx.set("count", json!(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    ctx.update("count", |v| {
                        let n = v.and_then(Value::as_i64).unwrap_or(0);
                        json!(n + 1)
                    });
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(ctx.get("count"), Some(json!(800)));
}
