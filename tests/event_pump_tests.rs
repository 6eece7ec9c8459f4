// Event pump integration tests
//
// Events are scripted through the headless handle; the recording
// collaborators show what each one turned into.

mod common;

use common::{key, Call, Rig, INIT_HEIGHT, INIT_WIDTH};
use doom2d_platform::platform::{HeadlessHandle, PlatformEvent, WindowEvent, WindowId};
use doom2d_platform::{InputTracker, Key, ScreenshotConfig};
use winit::keyboard::KeyCode;

fn pump(rig: &mut Rig) -> Vec<Call> {
    rig.host.pump_events(&mut rig.subsystems).unwrap();
    rig.take_log()
}

#[test]
fn test_keys_reach_tracker_then_game_in_order() {
    let (mut rig, _) = Rig::started(false);
    rig.handle.push_key(key(KeyCode::KeyA), true);
    rig.handle.push_key(key(KeyCode::Numpad8), true);
    rig.handle.push_key(key(KeyCode::KeyA), false);

    assert_eq!(
        pump(&mut rig),
        vec![
            Call::TrackerKey(Key::A, true),
            Call::GameKey(Key::A, true),
            Call::TrackerKey(Key::Kp8, true),
            Call::GameKey(Key::Kp8, true),
            Call::TrackerKey(Key::A, false),
            Call::GameKey(Key::A, false),
        ]
    );
    assert_eq!(rig.handle.pending_events(), 0);
}

#[test]
fn test_unmapped_key_is_dropped() {
    let (mut rig, _) = Rig::started(false);
    rig.handle.push_key(key(KeyCode::F24), true);
    assert!(pump(&mut rig).is_empty());
}

#[test]
fn test_text_is_decoded_to_cp866() {
    let (mut rig, _) = Rig::started(false);
    rig.handle.push_text("z");
    rig.handle.push_text("Ж");
    rig.handle.push_text("я");

    assert_eq!(
        pump(&mut rig),
        vec![Call::GameText(b'z'), Call::GameText(0x86), Call::GameText(0xEF)]
    );
}

#[test]
fn test_unrepresentable_text_is_dropped() {
    let (mut rig, _) = Rig::started(false);
    rig.handle.push_text("€");
    rig.handle.push_text("😀");
    rig.handle.push_event(PlatformEvent::Text(vec![0xD0, 0x20]));
    assert!(pump(&mut rig).is_empty());
}

#[test]
fn test_resize_goes_through_renderer_with_fullscreen_state() {
    let (mut rig, _) = Rig::started(false);
    rig.host.display_mut().set_fullscreen(true);
    let id = rig.host.display().window_id().unwrap();
    rig.handle.push_window_event(
        id,
        WindowEvent::Resized {
            width: 800,
            height: 600,
        },
    );

    assert_eq!(
        pump(&mut rig),
        vec![Call::SetVideoMode {
            width: 800,
            height: 600,
            fullscreen: true,
        }]
    );
    assert_eq!(rig.host.display().video_mode(), (800, 600));
}

#[test]
fn test_empty_resize_is_ignored() {
    let (mut rig, _) = Rig::started(false);
    let id = rig.host.display().window_id().unwrap();
    rig.handle.push_window_event(
        id,
        WindowEvent::Resized {
            width: 0,
            height: 0,
        },
    );
    assert!(pump(&mut rig).is_empty());
    assert_eq!(rig.host.display().video_mode(), (INIT_WIDTH, INIT_HEIGHT));
}

#[test]
fn test_events_for_other_windows_are_ignored() {
    let (mut rig, _) = Rig::started(false);
    let stale = WindowId(99);
    rig.handle.push_window_event(
        stale,
        WindowEvent::Resized {
            width: 100,
            height: 100,
        },
    );
    rig.handle
        .push_window_event(stale, WindowEvent::CloseRequested);

    assert!(pump(&mut rig).is_empty());
    assert!(!rig.host.should_quit());
}

#[test]
fn test_window_close_sets_quit() {
    let (mut rig, _) = Rig::started(false);
    let id = rig.host.display().window_id().unwrap();
    rig.handle.push_window_event(id, WindowEvent::CloseRequested);
    pump(&mut rig);
    assert!(rig.host.should_quit());
}

#[test]
fn test_quit_event_sets_quit_and_pump_drains_rest() {
    let (mut rig, _) = Rig::started(false);
    rig.handle.push_event(PlatformEvent::Quit);
    rig.handle.push_key(key(KeyCode::Space), true);

    assert_eq!(
        pump(&mut rig),
        vec![
            Call::TrackerKey(Key::Space, true),
            Call::GameKey(Key::Space, true),
        ]
    );
    assert!(rig.host.should_quit());
}

/// Tracker that queues one more key the first time it sees a key
struct EchoingTracker {
    handle: HeadlessHandle,
    echoed: bool,
}

impl InputTracker for EchoingTracker {
    fn on_key(&mut self, _key: Key, _down: bool) {
        if !self.echoed {
            self.echoed = true;
            self.handle.push_key(key(KeyCode::KeyB), true);
        }
    }
}

#[test]
fn test_events_arriving_mid_drain_wait_for_next_pump() {
    let (mut rig, _) = Rig::started(false);
    rig.subsystems.input = Box::new(EchoingTracker {
        handle: rig.handle.clone(),
        echoed: false,
    });
    rig.handle.push_key(key(KeyCode::KeyA), true);

    assert_eq!(pump(&mut rig), vec![Call::GameKey(Key::A, true)]);
    assert_eq!(rig.handle.pending_events(), 1);

    assert_eq!(pump(&mut rig), vec![Call::GameKey(Key::B, true)]);
    assert_eq!(rig.handle.pending_events(), 0);
}

#[test]
fn test_print_screen_saves_when_enabled() {
    let (mut rig, _) = Rig::started(true);
    let dir = common::scratch_dir("pump-shot");
    rig.host.set_screenshot_config(ScreenshotConfig {
        enabled: true,
        directory: dir.clone(),
    });
    rig.handle.push_key(key(KeyCode::PrintScreen), true);

    assert_eq!(
        pump(&mut rig),
        vec![
            Call::TrackerKey(Key::PrintScreen, true),
            Call::GameKey(Key::PrintScreen, true),
        ]
    );
    let saved = std::fs::read_dir(&dir).unwrap().count();
    assert_eq!(saved, 1);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_print_screen_does_nothing_when_disabled() {
    let (mut rig, _) = Rig::started(true);
    let dir = common::scratch_dir("pump-noshot");
    rig.host.set_screenshot_config(ScreenshotConfig {
        enabled: false,
        directory: dir.clone(),
    });
    rig.handle.push_key(key(KeyCode::PrintScreen), true);
    pump(&mut rig);
    assert!(!dir.exists());
}
