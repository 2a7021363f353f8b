//! Integration tests for the hotkey registry over in-process doubles.
//!
//! `TestSink` delivers raw messages and runs invoked work inline on the
//! calling thread; `RecordingBinding` records every bind/unbind attempt
//! and can be told to fail. No OS interaction.

use std::sync::Arc;

use parking_lot::Mutex;

use horizon_hotkey::{
    Hotkey, HotkeyBinding, HotkeyCapture, HotkeyError, HotkeyRegistry, InvokeWork, Key,
    MessageSink, Modifiers, RawMessage, Result, Signal, SystemHotkey, WM_HOTKEY, WindowHandle,
};

struct TestSink {
    messages: Signal<RawMessage>,
    handle: Mutex<Option<WindowHandle>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            messages: Signal::new(),
            handle: Mutex::new(WindowHandle::from_raw(0x5117)),
        }
    }

    fn set_handle(&self, raw: isize) {
        *self.handle.lock() = WindowHandle::from_raw(raw);
    }

    /// Deliver a synthetic hotkey notification with a packed payload.
    fn notify(&self, id: i32, modifiers: Modifiers, key: Key) {
        self.messages.emit(&RawMessage {
            message: WM_HOTKEY,
            wparam: id as usize,
            lparam: ((key.raw() as u32) << 16 | modifiers.bits() as u32) as isize,
        });
    }
}

impl MessageSink for TestSink {
    fn raw_messages(&self) -> &Signal<RawMessage> {
        &self.messages
    }

    fn window_handle(&self) -> Option<WindowHandle> {
        *self.handle.lock()
    }

    fn invoke(&self, work: InvokeWork) -> Result<()> {
        work(self.window_handle())
    }
}

#[derive(Default)]
struct RecordingBinding {
    binds: Mutex<Vec<(i32, Hotkey)>>,
    unbinds: Mutex<Vec<i32>>,
    fail_bind: Mutex<Option<i32>>,
    fail_unbind: Mutex<Option<i32>>,
}

impl HotkeyBinding for RecordingBinding {
    fn bind(&self, _handle: WindowHandle, id: i32, hotkey: Hotkey) -> Result<()> {
        self.binds.lock().push((id, hotkey));
        match *self.fail_bind.lock() {
            Some(code) => Err(HotkeyError::Registration { code }),
            None => Ok(()),
        }
    }

    fn unbind(&self, _handle: WindowHandle, id: i32) -> Result<()> {
        self.unbinds.lock().push(id);
        match *self.fail_unbind.lock() {
            Some(code) => Err(HotkeyError::Unregistration { code }),
            None => Ok(()),
        }
    }
}

fn setup() -> (Arc<TestSink>, Arc<RecordingBinding>, HotkeyRegistry) {
    let sink = Arc::new(TestSink::new());
    let binding = Arc::new(RecordingBinding::default());
    let registry = HotkeyRegistry::new(sink.clone(), binding.clone());
    (sink, binding, registry)
}

fn captures_of(registry: &HotkeyRegistry) -> Arc<Mutex<Vec<HotkeyCapture>>> {
    let captures = Arc::new(Mutex::new(Vec::new()));
    let captures_clone = captures.clone();
    registry.on_captured().connect(move |capture| {
        captures_clone.lock().push(*capture);
    });
    captures
}

const ALT_F1: Hotkey = Hotkey::new(Modifiers::ALT, Key::F1);
const ALT_F2: Hotkey = Hotkey::new(Modifiers::ALT, Key::F2);
const CTRL_C: Hotkey = Hotkey::new(Modifiers::CONTROL, Key::C);

#[test]
fn ids_follow_lowest_free_id_policy() {
    let (_sink, _binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    registry.add(ALT_F2).unwrap();

    let registered = registry.registered();
    assert_eq!(registered[&ALT_F1], 0);
    assert_eq!(registered[&ALT_F2], 1);

    // The freed id 0 is reused before a fresh id 2 is minted.
    registry.remove(ALT_F1).unwrap();
    registry.add(CTRL_C).unwrap();

    let registered = registry.registered();
    assert_eq!(registered[&CTRL_C], 0);
    assert_eq!(registered[&ALT_F2], 1);
    assert_eq!(registered.len(), 2);
}

#[test]
fn add_is_idempotent() {
    let (_sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    registry.add(ALT_F1).unwrap();

    assert_eq!(binding.binds.lock().len(), 1);
    assert_eq!(registry.registered().len(), 1);
}

#[test]
fn remove_of_unregistered_hotkey_is_a_noop() {
    let (_sink, binding, mut registry) = setup();

    registry.remove(ALT_F1).unwrap();

    assert!(binding.unbinds.lock().is_empty());
    assert!(registry.registered().is_empty());
}

#[test]
fn remove_releases_the_os_binding() {
    let (_sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    registry.remove(ALT_F1).unwrap();

    assert_eq!(*binding.unbinds.lock(), vec![0]);
    assert!(registry.registered().is_empty());
}

#[test]
fn bind_failure_rolls_back_the_entry() {
    let (_sink, binding, mut registry) = setup();

    *binding.fail_bind.lock() = Some(1409); // ERROR_HOTKEY_ALREADY_REGISTERED
    let err = registry.add(ALT_F1).unwrap_err();
    assert_eq!(err, HotkeyError::Registration { code: 1409 });
    assert!(registry.registered().is_empty());

    // The tentative id is free again.
    *binding.fail_bind.lock() = None;
    registry.add(ALT_F2).unwrap();
    assert_eq!(registry.registered()[&ALT_F2], 0);
}

#[test]
fn bind_without_a_handle_fails_explicitly() {
    let (sink, binding, mut registry) = setup();

    sink.set_handle(0);
    let err = registry.add(ALT_F1).unwrap_err();
    assert_eq!(err, HotkeyError::HandleUnavailable);
    assert!(registry.registered().is_empty());
    assert!(binding.binds.lock().is_empty());
}

#[test]
fn remove_without_a_handle_skips_the_unbind() {
    let (sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    sink.set_handle(0);
    registry.remove(ALT_F1).unwrap();

    assert!(binding.unbinds.lock().is_empty());
    assert!(registry.registered().is_empty());
}

#[test]
fn unbind_failure_restores_the_entry() {
    let (_sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    *binding.fail_unbind.lock() = Some(6); // ERROR_INVALID_HANDLE
    let err = registry.remove(ALT_F1).unwrap_err();
    assert_eq!(err, HotkeyError::Unregistration { code: 6 });

    // The binding is still live, so the entry (and its id) must remain.
    assert_eq!(registry.registered()[&ALT_F1], 0);
}

#[test]
fn snapshot_is_independent_of_later_mutation() {
    let (_sink, _binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    let snapshot = registry.registered();
    registry.add(ALT_F2).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.registered().len(), 2);
}

#[test]
fn notification_decodes_to_a_typed_capture() {
    let (sink, _binding, registry) = setup();
    let captures = captures_of(&registry);

    sink.notify(5, Modifiers::CONTROL, Key::A);

    let captures = captures.lock();
    assert_eq!(
        *captures,
        vec![HotkeyCapture {
            id: 5,
            hotkey: Some(Hotkey::new(Modifiers::CONTROL, Key::A)),
            system: SystemHotkey::None,
        }]
    );
}

#[test]
fn registered_hotkey_scenario_round_trips() {
    let (sink, _binding, mut registry) = setup();
    let captures = captures_of(&registry);

    registry.add(ALT_F1).unwrap();
    registry.add(ALT_F2).unwrap();
    sink.notify(1, Modifiers::ALT, Key::F2);

    let captures = captures.lock();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].id, 1);
    assert_eq!(captures[0].hotkey, Some(ALT_F2));
    assert_eq!(captures[0].system, SystemHotkey::None);
}

#[test]
fn negative_id_notification_carries_no_hotkey() {
    let (sink, _binding, registry) = setup();
    let captures = captures_of(&registry);

    // Payload bits must not be decoded for reserved ids.
    sink.notify(-1, Modifiers::CONTROL | Modifiers::SHIFT, Key::Z);

    let captures = captures.lock();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].id, -1);
    assert_eq!(captures[0].hotkey, None);
    assert_eq!(captures[0].system, SystemHotkey::SnapWindow);
}

#[test]
fn non_hotkey_messages_are_ignored() {
    let (sink, _binding, registry) = setup();
    let captures = captures_of(&registry);

    sink.raw_messages().emit(&RawMessage {
        message: 0x0010, // WM_CLOSE
        wparam: 5,
        lparam: 0x0041_0002,
    });

    assert!(captures.lock().is_empty());
}

#[test]
fn dispose_releases_every_entry_once() {
    let (_sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    registry.add(ALT_F2).unwrap();

    registry.dispose();
    registry.dispose();

    let mut unbinds = binding.unbinds.lock().clone();
    unbinds.sort_unstable();
    assert_eq!(unbinds, vec![0, 1]);
}

#[test]
fn dispose_continues_past_unbind_failures() {
    let (_sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    registry.add(ALT_F2).unwrap();

    *binding.fail_unbind.lock() = Some(6);
    registry.dispose();

    // Both entries were attempted despite every unbind failing.
    assert_eq!(binding.unbinds.lock().len(), 2);
}

#[test]
fn dispose_skips_unbind_without_a_handle() {
    let (sink, binding, mut registry) = setup();

    registry.add(ALT_F1).unwrap();
    sink.set_handle(0);
    registry.dispose();

    assert!(binding.unbinds.lock().is_empty());
}

#[test]
fn disposed_registry_does_not_refire_notifications() {
    let (sink, _binding, mut registry) = setup();
    let captures = captures_of(&registry);

    sink.notify(0, Modifiers::ALT, Key::F1);
    registry.dispose();
    sink.notify(0, Modifiers::ALT, Key::F1);

    assert_eq!(captures.lock().len(), 1);
    assert_eq!(sink.raw_messages().connection_count(), 0);
}

#[test]
fn disposed_registry_rejects_mutation() {
    let (_sink, _binding, mut registry) = setup();

    registry.dispose();

    assert_eq!(registry.add(ALT_F1).unwrap_err(), HotkeyError::Disposed);
    assert_eq!(registry.remove(ALT_F1).unwrap_err(), HotkeyError::Disposed);
}

#[test]
fn dropping_the_registry_releases_entries() {
    let sink = Arc::new(TestSink::new());
    let binding = Arc::new(RecordingBinding::default());

    {
        let mut registry = HotkeyRegistry::new(sink.clone(), binding.clone());
        registry.add(ALT_F1).unwrap();
        registry.add(ALT_F2).unwrap();
    }

    let mut unbinds = binding.unbinds.lock().clone();
    unbinds.sort_unstable();
    assert_eq!(unbinds, vec![0, 1]);
    assert_eq!(sink.raw_messages().connection_count(), 0);
}
