//! Integration tests for the mapping engine
//!
//! Exercises the public API end to end: forward and reverse mapping,
//! round-trip closure, null policy, hook invocation counting, and vetoes.

use datamorph_core::{
    map, map_reverse, render, DataAccessor, HookOutcome, HookSet, HookStage, InputFormat, Mapper,
    MappingSpec, OutputFormat, Rendered,
};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

fn user_source() -> DataAccessor {
    DataAccessor::from_value(json!({
        "users": [
            {"name": "Ada", "email": "ada@example.com"},
            {"name": "Grace", "email": "grace@example.com"}
        ]
    }))
}

fn user_spec() -> MappingSpec {
    MappingSpec::pairs([
        ("people.*.label", "users.*.name"),
        ("people.*.contact", "users.*.email"),
    ])
}

#[test]
fn forward_mapping_expands_wildcards_in_order() {
    let result = map(&user_spec(), &user_source(), json!({})).unwrap();
    assert_eq!(
        result,
        json!({"people": [
            {"label": "Ada", "contact": "ada@example.com"},
            {"label": "Grace", "contact": "grace@example.com"}
        ]})
    );
}

#[test]
fn round_trip_reproduces_directive_referenced_values() {
    let spec = user_spec();
    let original = user_source();

    let forward_once = map(&spec, &original, json!({})).unwrap();
    let back = map_reverse(
        &spec,
        &DataAccessor::from_value(forward_once.clone()),
        json!({}),
    )
    .unwrap();
    let forward_twice = map(&spec, &DataAccessor::from_value(back.clone()), json!({})).unwrap();

    assert_eq!(forward_twice, forward_once);

    // Every directive-referenced source path survives the round trip.
    let restored = DataAccessor::from_value(back);
    for path in [
        "users.0.name",
        "users.0.email",
        "users.1.name",
        "users.1.email",
    ] {
        assert_eq!(
            restored.get(path).unwrap(),
            original.get(path).unwrap(),
            "value at {path} should survive the round trip"
        );
    }
}

#[test]
fn null_policy_skip_omits_key_and_explicit_null_is_preserved() {
    let source = DataAccessor::from_value(json!({"user": {"nick": null, "name": "Ada"}}));
    let spec = MappingSpec::pairs([
        ("profile.nick", "user.nick"),
        ("profile.name", "user.name"),
    ]);

    let skipped = map(&spec, &source, json!({})).unwrap();
    assert_eq!(skipped, json!({"profile": {"name": "Ada"}}));
    assert!(skipped["profile"].get("nick").is_none());

    let kept = Mapper::new()
        .skip_null(false)
        .apply(&spec, &source, json!({}))
        .unwrap();
    assert_eq!(kept, json!({"profile": {"nick": null, "name": "Ada"}}));
}

#[test]
fn unconditional_and_filtered_registrations_fire_independently() {
    let count = Rc::new(Cell::new(0));
    let unconditional = Rc::clone(&count);
    let filtered = Rc::clone(&count);
    let hooks = HookSet::builder()
        .on(HookStage::BeforePair, move |_| {
            unconditional.set(unconditional.get() + 1);
            Ok(HookOutcome::Continue)
        })
        .on_filtered(HookStage::BeforePair, &["src:user."], move |_| {
            filtered.set(filtered.get() + 1);
            Ok(HookOutcome::Continue)
        })
        .unwrap()
        .build();

    let source = DataAccessor::from_value(json!({"user": {"name": "Ada"}}));
    let spec = MappingSpec::pairs([("profile.name", "user.name")]);
    Mapper::new()
        .with_hooks(hooks)
        .apply(&spec, &source, json!({}))
        .unwrap();

    // One matching pair: the unconditional registration fires once, the
    // filtered one fires once.
    assert_eq!(count.get(), 2);
}

#[test]
fn one_registration_with_two_matching_filters_fires_once() {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let hooks = HookSet::builder()
        .on_filtered(
            HookStage::BeforePair,
            &["src:user.", "tgt:profile."],
            move |_| {
                counter.set(counter.get() + 1);
                Ok(HookOutcome::Continue)
            },
        )
        .unwrap()
        .build();

    let source = DataAccessor::from_value(json!({"user": {"name": "Ada"}}));
    let spec = MappingSpec::pairs([("profile.name", "user.name")]);
    Mapper::new()
        .with_hooks(hooks)
        .apply(&spec, &source, json!({}))
        .unwrap();

    assert_eq!(count.get(), 1);
}

#[test]
fn before_pair_veto_leaves_target_key_absent() {
    let hooks = HookSet::builder()
        .on(HookStage::BeforePair, |context| {
            if context.source_path == "user.name" {
                Ok(HookOutcome::Veto)
            } else {
                Ok(HookOutcome::Continue)
            }
        })
        .build();

    let source = DataAccessor::from_value(json!({
        "user": {"name": "Ada", "email": "ada@example.com"}
    }));
    let spec = MappingSpec::pairs([
        ("profile.name", "user.name"),
        ("profile.mail", "user.email"),
    ]);
    let result = Mapper::new()
        .with_hooks(hooks)
        .apply(&spec, &source, json!({}))
        .unwrap();

    assert_eq!(result, json!({"profile": {"mail": "ada@example.com"}}));
}

#[test]
fn before_write_can_replace_the_value() {
    let hooks = HookSet::builder()
        .on(HookStage::BeforeWrite, |context| {
            match context.value {
                Some(value) if value == &json!("Ada") => {
                    Ok(HookOutcome::Replace(json!("Countess of Lovelace")))
                }
                _ => Ok(HookOutcome::Continue),
            }
        })
        .build();

    let source = DataAccessor::from_value(json!({"user": {"name": "Ada"}}));
    let spec = MappingSpec::pairs([("profile.name", "user.name")]);
    let result = Mapper::new()
        .with_hooks(hooks)
        .apply(&spec, &source, json!({}))
        .unwrap();

    assert_eq!(result, json!({"profile": {"name": "Countess of Lovelace"}}));
}

#[test]
fn after_write_sees_target_snapshot() {
    let seen = Rc::new(Cell::new(false));
    let flag = Rc::clone(&seen);
    let hooks = HookSet::builder()
        .on(HookStage::AfterWrite, move |context| {
            let target = context.target.expect("after-write carries a snapshot");
            assert_eq!(target["profile"]["name"], json!("Ada"));
            flag.set(true);
            Ok(HookOutcome::Continue)
        })
        .build();

    let source = DataAccessor::from_value(json!({"user": {"name": "Ada"}}));
    let spec = MappingSpec::pairs([("profile.name", "user.name")]);
    Mapper::new()
        .with_hooks(hooks)
        .apply(&spec, &source, json!({}))
        .unwrap();

    assert!(seen.get());
}

#[test]
fn before_all_and_after_all_fire_once_per_mapping() {
    let count = Rc::new(Cell::new((0, 0)));
    let opening = Rc::clone(&count);
    let closing = Rc::clone(&count);
    let hooks = HookSet::builder()
        .on(HookStage::BeforeAll, move |_| {
            let (before, after) = opening.get();
            opening.set((before + 1, after));
            Ok(HookOutcome::Continue)
        })
        .on(HookStage::AfterAll, move |_| {
            let (before, after) = closing.get();
            closing.set((before, after + 1));
            Ok(HookOutcome::Continue)
        })
        .build();

    Mapper::new()
        .with_hooks(hooks)
        .apply(&user_spec(), &user_source(), json!({}))
        .unwrap();

    assert_eq!(count.get(), (1, 1));
}

#[test]
fn xml_source_maps_like_any_other_root() {
    let source = DataAccessor::from_xml(
        "<order><item><sku>A-1</sku></item><item><sku>B-2</sku></item></order>",
    )
    .unwrap();
    let spec = MappingSpec::pairs([("lines.*.code", "order.item.*.sku")]);
    let result = map(&spec, &source, json!({})).unwrap();
    assert_eq!(
        result,
        json!({"lines": [{"code": "A-1"}, {"code": "B-2"}]})
    );
}

#[test]
fn original_output_follows_detected_input_format() {
    let source = DataAccessor::from_json(r#"{"user": {"name": "Ada"}}"#).unwrap();
    let spec = MappingSpec::pairs([("profile.name", "user.name")]);
    let result = map(&spec, &source, json!({})).unwrap();

    let rendered = render(&result, OutputFormat::Original, source.input_format()).unwrap();
    assert_eq!(rendered.as_text(), Some(r#"{"profile":{"name":"Ada"}}"#));

    let native = render(&result, OutputFormat::Native, InputFormat::Json).unwrap();
    assert!(matches!(native, Rendered::Value(_)));
}

#[test]
fn mode_name_reaches_mode_filtered_hooks() {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let hooks = HookSet::builder()
        .on_filtered(HookStage::BeforePair, &["mode:audit"], move |_| {
            counter.set(counter.get() + 1);
            Ok(HookOutcome::Continue)
        })
        .unwrap()
        .build();

    let source = DataAccessor::from_value(json!({"a": 1}));
    let spec = MappingSpec::pairs([("b", "a")]);
    Mapper::new()
        .mode("audit")
        .with_hooks(hooks)
        .apply(&spec, &source, json!({}))
        .unwrap();

    assert_eq!(count.get(), 1);
}

#[test]
fn lenient_source_maps_to_empty_target() {
    let source = DataAccessor::lenient("definitely not { json");
    let result = map(&user_spec(), &source, json!({})).unwrap();
    assert_eq!(result, json!({}));
}
