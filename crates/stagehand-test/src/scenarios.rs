//! End-to-end player scenarios

use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;
use stagehand_core::{
    DeviceKind, IoData, KeyToken, Project, RawEventKind, StagehandError, SurfaceBox, Target,
    TimePoint,
};
use stagehand_input::{ElementRef, LayoutVariant, RawEvent, REMOVAL_PROMPT};
use stagehand_runtime::{HostEvent, PlayerConfig, TouchControls};

use crate::{
    run_clock_scenario, ClockSimConfig, PlayerSession, RecordingVm, SimulatedHost,
};

fn keys_program(keys: &[&str]) -> Vec<Target> {
    let mut sprite = Target::new("Sprite1");
    for (i, key) in keys.iter().enumerate() {
        sprite = sprite.with_block(
            &format!("k{i}"),
            "event_whenkeypressed",
            &[("KEY_OPTION", *key)],
        );
    }
    vec![Target::stage(), sprite]
}

fn body() -> ElementRef {
    ElementRef::Body
}

fn selector(s: &str) -> ElementRef {
    ElementRef::Selector(s.to_string())
}

// ============================================================================
// DESKTOP
// ============================================================================

#[test]
fn test_desktop_pointer_coordinates() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&["space"])).unwrap();
    session.resize(SurfaceBox::new(10.0, 20.0, 300.0, 200.0));

    let results = session.fire(&body(), &RawEvent::mouse(RawEventKind::MouseDown, 50.0, 70.0));
    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap().prevent_default);

    let ev = session.vm.pointer_events().next().copied().unwrap();
    assert_eq!((ev.x, ev.y), (40.0, 50.0));
    assert_eq!((ev.surface_width, ev.surface_height), (300.0, 200.0));
    assert_eq!(ev.is_down(), Some(true));
    assert_eq!(
        serde_json::to_value(IoData::Mouse(ev)).unwrap(),
        json!({ "x": 40.0, "y": 50.0, "canvasWidth": 300.0, "canvasHeight": 200.0, "isDown": true })
    );
}

#[test]
fn test_desktop_move_omits_is_down() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&[])).unwrap();
    session.fire(&body(), &RawEvent::mouse(RawEventKind::MouseMove, 5.0, 6.0));

    let ev = session.vm.pointer_events().next().copied().unwrap();
    let wire = serde_json::to_value(IoData::Mouse(ev)).unwrap();
    assert!(wire.get("isDown").is_none());
}

#[test]
fn test_desktop_keyboard_normalization() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&["space"])).unwrap();

    let results = session.fire(&body(), &RawEvent::key(RawEventKind::KeyDown, "Space"));
    assert!(!results[0].as_ref().unwrap().prevent_default);
    session.fire(&body(), &RawEvent::key(RawEventKind::KeyUp, "ArrowUp"));

    let keys: Vec<_> = session.vm.key_events().cloned().collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].key.as_str(), " ");
    assert!(keys[0].is_down);
    assert_eq!(keys[1].key, KeyToken::new("ArrowUp"));
    assert!(!keys[1].is_down);
    assert_eq!(
        serde_json::to_value(IoData::Keyboard(keys[0].clone())).unwrap(),
        json!({ "key": " ", "isDown": true })
    );
}

#[test]
fn test_desktop_has_no_virtual_controls() {
    let mut session = PlayerSession::desktop(1);
    let report = session.load(&keys_program(&["up arrow", "a"])).unwrap();
    assert!(report.layout.is_none());
    assert!(session.host.mounted().is_none());
    assert_eq!(session.host.listeners().len(), 5);
}

#[test]
fn test_always_policy_builds_controls_on_desktop() {
    let config = PlayerConfig {
        touch_controls: TouchControls::Always,
        ..PlayerConfig::default()
    };
    let mut session = PlayerSession::new(
        config,
        SimulatedHost::desktop(),
        SurfaceBox::new(0.0, 0.0, 480.0, 360.0),
        1,
    );
    let report = session.load(&keys_program(&["up arrow"])).unwrap();
    assert_eq!(report.layout, Some(LayoutVariant::ArrowOnly));
}

#[test]
fn test_pointer_without_coordinates_fails_fast() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&[])).unwrap();
    let raw = session.input.bare(RawEventKind::MouseUp);
    let results = session.fire(&body(), &raw);

    assert!(matches!(
        results[0],
        Err(StagehandError::MissingCoordinates { kind: RawEventKind::MouseUp })
    ));
    assert!(session.vm.posted.is_empty());
    assert_eq!(session.report().errors, 1);
}

// ============================================================================
// TOUCH
// ============================================================================

#[test]
fn test_layout_variants_on_touch_host() {
    let cases: [(&[&str], LayoutVariant); 4] = [
        (&["up arrow"], LayoutVariant::ArrowOnly),
        (&["up arrow", "a"], LayoutVariant::ArrowPlusOne),
        (&["a", "b"], LayoutVariant::ArrowPlusMany),
        (&[], LayoutVariant::ArrowPlusMany),
    ];
    for (keys, expected) in cases {
        let mut session = PlayerSession::touch(SimulatedHost::touch(), 1);
        let report = session.load(&keys_program(keys)).unwrap();
        assert_eq!(report.layout, Some(expected), "keys {keys:?}");
        assert_eq!(session.host.mounted().unwrap().variant, expected);
        assert_eq!(session.host.mounts(), 1);
    }
}

#[test]
fn test_virtual_controls_post_key_codes() {
    let mut session = PlayerSession::touch(SimulatedHost::touch(), 1);
    session.load(&keys_program(&["up arrow", "space"])).unwrap();

    session.fire_generated(&selector(".up-arrow"), RawEventKind::TouchStart);
    session.fire_generated(&selector(".up-arrow"), RawEventKind::TouchEnd);
    session.fire_generated(&selector(".space"), RawEventKind::MouseDown);

    let keys: Vec<_> = session
        .vm
        .key_events()
        .map(|k| (k.key.as_str().to_string(), k.is_down))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("ArrowUp".to_string(), true),
            ("ArrowUp".to_string(), false),
            (" ".to_string(), true),
        ]
    );
    assert_eq!(session.vm.count(DeviceKind::Mouse), 0);
}

#[test]
fn test_body_touch_is_pointer_input() {
    let mut session = PlayerSession::touch(SimulatedHost::touch(), 5);
    session.load(&keys_program(&["up arrow"])).unwrap();

    let results = session.fire_generated(&body(), RawEventKind::TouchStart);
    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap().prevent_default);
    assert_eq!(session.vm.pointer_events().next().unwrap().is_down(), Some(true));
}

#[test]
fn test_confirmed_removal_detaches_controls_once() {
    let host = SimulatedHost::touch().with_answers([true]);
    let mut session = PlayerSession::touch(host, 1);
    session.load(&keys_program(&["up arrow", "a"])).unwrap();

    // desktop keyboard listener posts, then the hardware-key listener prompts
    let results = session.fire(&body(), &RawEvent::key(RawEventKind::KeyDown, "x"));
    assert_eq!(results.len(), 2);
    assert_eq!(session.host.prompts(), [REMOVAL_PROMPT.to_string()]);
    assert!(session.host.mounted().is_none());
    assert_eq!(session.host.removals(), 1);
    assert!(session.host.listeners_for(&selector(".up-arrow"), RawEventKind::TouchStart).is_empty());
    assert!(session.host.listeners_for(&selector(".a"), RawEventKind::MouseDown).is_empty());
    // touch pointer input survives removal
    assert_eq!(session.host.listeners_for(&body(), RawEventKind::TouchStart).len(), 1);

    let results = session.fire(&body(), &RawEvent::key(RawEventKind::KeyDown, "y"));
    assert_eq!(results.len(), 1);
    assert_eq!(session.host.prompts().len(), 1);
    assert_eq!(session.vm.count(DeviceKind::Keyboard), 2);
}

#[test]
fn test_declined_removal_is_latched() {
    let host = SimulatedHost::touch().with_answers([false]).with_default_answer(true);
    let mut session = PlayerSession::touch(host, 1);
    session.load(&keys_program(&["up arrow"])).unwrap();

    for key in ["a", "b", "c"] {
        session.fire(&body(), &RawEvent::key(RawEventKind::KeyDown, key));
    }
    assert_eq!(session.host.prompts().len(), 1);
    assert!(session.host.mounted().is_some());
    assert_eq!(session.host.removals(), 0);
    assert_eq!(session.host.listeners_for(&selector(".up-arrow"), RawEventKind::TouchStart).len(), 1);
}

#[test]
fn test_reload_after_removal_rebuilds_controls() {
    let host = SimulatedHost::touch().with_answers([true]);
    let mut session = PlayerSession::touch(host, 1);
    session.load(&keys_program(&["up arrow"])).unwrap();
    session.fire(&body(), &RawEvent::key(RawEventKind::KeyDown, "x"));
    assert!(session.host.mounted().is_none());

    let report = session.load(&keys_program(&["left arrow", "a", "b"])).unwrap();
    assert_eq!(report.layout, Some(LayoutVariant::ArrowPlusMany));
    assert_eq!(session.host.mounts(), 2);
    assert_eq!(session.host.listeners().len(), report.subscriptions);
    assert_eq!(session.player.router().len(), report.subscriptions);
}

// ============================================================================
// GEOMETRY AND TIME
// ============================================================================

#[test]
fn test_resize_is_seen_by_next_dispatch() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&[])).unwrap();
    let raw = RawEvent::mouse(RawEventKind::MouseDown, 100.0, 100.0);

    session.resize(SurfaceBox::new(0.0, 0.0, 480.0, 360.0));
    session.fire(&body(), &raw);
    session.resize(SurfaceBox::new(50.0, 25.0, 240.0, 180.0));
    session.fire(&body(), &raw);

    let events: Vec<_> = session.vm.pointer_events().copied().collect();
    assert_eq!((events[0].x, events[0].y), (100.0, 100.0));
    assert_eq!((events[1].x, events[1].y), (50.0, 75.0));
    assert_eq!(events[1].surface_width, 240.0);
}

#[test]
fn test_project_timer_follows_compat_ticks_and_pause() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&[])).unwrap();

    let tick = |session: &mut PlayerSession, ms: i64| {
        session
            .player
            .handle_host_event(HostEvent::UpdateCompatMsecs(TimePoint::from_millis(ms)));
    };

    tick(&mut session, 1_000);
    tick(&mut session, 3_000);
    assert_eq!(session.player.project_timer(), 2.0);

    session.player.pause();
    session.player.pause();
    tick(&mut session, 10_000);
    assert_eq!(session.player.project_timer(), 2.0);

    session.player.resume();
    session.player.resume();
    assert_eq!(session.player.project_timer(), 2.0);
    tick(&mut session, 10_500);
    assert_eq!(session.player.project_timer(), 2.5);

    // reload zeroes the timer
    session.load(&keys_program(&[])).unwrap();
    assert_eq!(session.player.project_timer(), 0.0);
}

#[test]
fn test_epoch_stamped_compat_ticks_keep_timer_continuous() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&[])).unwrap();
    session.ambient.advance_millis(250);
    let tick = |session: &mut PlayerSession, ms: i64| {
        session
            .player
            .handle_host_event(HostEvent::UpdateCompatMsecs(TimePoint::from_millis(ms)));
    };

    tick(&mut session, 1_760_000_000_000);
    assert_eq!(session.player.project_timer(), 0.25);
    tick(&mut session, 1_760_000_000_500);
    assert_eq!(session.player.project_timer(), 0.75);
    // a late tick from the host is dropped
    tick(&mut session, 1_760_000_000_400);
    assert_eq!(session.player.project_timer(), 0.75);
    session.ambient.advance_millis(10_000);
    assert_eq!(session.player.project_timer(), 0.75);
}

#[test]
fn test_ambient_clock_drives_timer_without_compat() {
    let mut session = PlayerSession::desktop(1);
    session.load(&keys_program(&[])).unwrap();
    session.ambient.advance_millis(1_500);
    assert_eq!(session.player.project_timer(), 1.5);
}

#[tokio::test(start_paused = true)]
async fn test_launch_after_start_delay() {
    let session = PlayerSession::desktop(1);
    let mut vm = RecordingVm::new();
    let started = tokio::time::Instant::now();
    session.player.launch(&mut vm).await;

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!((vm.starts, vm.green_flags), (1, 1));
    assert_eq!(session.vm.compatibility_mode, Some(true));
}

// ============================================================================
// SCANNER
// ============================================================================

#[test]
fn test_clones_are_not_scanned() {
    let project = Project::from_json_str(
        r#"{
            "targets": [
                { "isStage": true, "name": "Stage", "blocks": {} },
                {
                    "isStage": false, "name": "Cat",
                    "blocks": {
                        "a": { "opcode": "event_whenkeypressed", "fields": { "KEY_OPTION": ["left arrow", null] } }
                    }
                },
                {
                    "isStage": false, "name": "Cat", "isOriginal": false,
                    "blocks": {
                        "b": { "opcode": "sensing_keyoptions", "fields": { "KEY_OPTION": ["z", null] } }
                    }
                }
            ]
        }"#,
    )
    .unwrap();

    let mut session = PlayerSession::touch(SimulatedHost::touch(), 1);
    let report = session.load(&project).unwrap();
    let keys: Vec<_> = report.keys.iter().map(|k| k.as_str().to_string()).collect();
    assert_eq!(keys, vec!["left arrow".to_string()]);
    assert_eq!(report.layout, Some(LayoutVariant::ArrowOnly));
}

// ============================================================================
// RANDOMIZED
// ============================================================================

#[test]
fn test_random_input_never_fails_and_stays_on_surface() {
    for seed in 0..10 {
        let host = SimulatedHost::touch().with_default_answer(seed % 2 == 0);
        let mut session = PlayerSession::touch(host, seed);
        session
            .load(&keys_program(&["up arrow", "down arrow", "space", "a"]))
            .unwrap();
        session.fire_random(300);

        let report = session.report();
        assert_eq!(report.errors, 0, "seed {seed}");
        assert_eq!(report.out_of_bounds, 0, "seed {seed}");
        assert!(session.host.prompts().len() <= 1, "seed {seed}");
        assert!(session.host.removals() <= 1, "seed {seed}");
    }
}

proptest! {
    #[test]
    fn prop_clock_matches_reference(seed in any::<u64>()) {
        let config = ClockSimConfig { seed, steps: 200, ..ClockSimConfig::mixed() };
        let result = run_clock_scenario(&config);
        prop_assert_eq!(result.max_error_us, 0);
        prop_assert!(result.monotonic);
    }

    #[test]
    fn prop_clock_survives_foreign_compat_timelines(
        seed in any::<u64>(),
        offset_us in -10_000_000_000i64..2_000_000_000_000_000,
    ) {
        let config = ClockSimConfig {
            seed,
            steps: 200,
            timeline_offset_us: offset_us,
            ..ClockSimConfig::lagging_compat()
        };
        let result = run_clock_scenario(&config);
        prop_assert_eq!(result.max_error_us, 0);
        prop_assert!(result.monotonic);
    }
}
