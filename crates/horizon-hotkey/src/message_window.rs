//! Headless message-only window sink for Windows.
//!
//! [`MessageWindow`] owns a dedicated thread that creates a message-only
//! native window (`HWND_MESSAGE` parent) and runs a classic
//! `GetMessageW`/`DispatchMessageW` pump. Every message the window
//! receives is forwarded to the sink's raw-message signal; work handed to
//! [`invoke`](crate::MessageSink::invoke) is posted to the window as a
//! private message and executed inside the window procedure, which is how
//! the thread-affinity requirement of the hotkey API is satisfied without
//! a hosting UI framework.
//!
//! Dropping the window posts a close request and joins the pump thread,
//! so the native window never outlives the sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Sender, bounded};
use windows::Win32::Foundation::{
    ERROR_CLASS_ALREADY_EXISTS, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CREATESTRUCTW, CreateWindowExW, DefWindowProcW, DispatchMessageW, GWLP_USERDATA, GetMessageW,
    GetWindowLongPtrW, HWND_MESSAGE, MSG, PostMessageW, PostQuitMessage, RegisterClassW,
    SetWindowLongPtrW, TranslateMessage, WINDOW_EX_STYLE, WINDOW_STYLE, WM_APP, WM_CLOSE,
    WM_DESTROY, WM_NCCREATE, WM_NCDESTROY, WNDCLASSW,
};
use windows::core::{PCWSTR, w};

use crate::error::{HotkeyError, Result};
use crate::event::RawMessage;
use crate::signal::Signal;
use crate::sink::{InvokeWork, MessageSink, WindowHandle};

const CLASS_NAME: PCWSTR = w!("HorizonHotkeyMessageWindow");

/// Private message carrying a posted [`InvokeCell`] pointer in `wparam`.
const WM_INVOKE: u32 = WM_APP + 1;

/// State shared between the sink handle, the pump thread, and the window
/// procedure (via `GWLP_USERDATA`).
struct WindowShared {
    raw_messages: Signal<RawMessage>,
    /// The native handle, or 0 while the window does not exist.
    hwnd: AtomicIsize,
}

impl WindowShared {
    fn window_handle(&self) -> Option<WindowHandle> {
        WindowHandle::from_raw(self.hwnd.load(Ordering::Acquire))
    }
}

/// A posted unit of work plus the channel its outcome is reported on.
struct InvokeCell {
    work: InvokeWork,
    outcome: Sender<Result<()>>,
}

/// A headless message-only window implementing [`MessageSink`].
pub struct MessageWindow {
    shared: Arc<WindowShared>,
    thread: Option<JoinHandle<()>>,
    pump_thread: ThreadId,
}

impl MessageWindow {
    /// Create the message window and start its pump thread.
    ///
    /// Blocks until the native window exists (or its creation failed), so
    /// a returned sink always has a valid handle.
    pub fn new() -> Result<Self> {
        let shared = Arc::new(WindowShared {
            raw_messages: Signal::new(),
            hwnd: AtomicIsize::new(0),
        });

        let (ready_tx, ready_rx) = bounded(1);
        let pump_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("horizon-hotkey-sink".to_string())
            .spawn(move || pump_main(pump_shared, ready_tx))
            .expect("failed to spawn message pump thread");
        let pump_thread = thread.thread().id();

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                shared,
                thread: Some(thread),
                pump_thread,
            }),
            Ok(Err(error)) => {
                let _ = thread.join();
                Err(error)
            }
            Err(_) => {
                let _ = thread.join();
                Err(HotkeyError::SinkStopped)
            }
        }
    }
}

impl MessageSink for MessageWindow {
    fn raw_messages(&self) -> &Signal<RawMessage> {
        &self.shared.raw_messages
    }

    fn window_handle(&self) -> Option<WindowHandle> {
        self.shared.window_handle()
    }

    fn invoke(&self, work: InvokeWork) -> Result<()> {
        // Already on the pump thread (e.g. called from a raw-message
        // slot): run inline. Posting and blocking here would deadlock.
        if thread::current().id() == self.pump_thread {
            return work(self.window_handle());
        }

        // No window: there is no owner thread to hop to and no handle for
        // the work to use. Run it with `None` so it reports
        // HandleUnavailable or skips, per its own contract.
        let Some(handle) = self.window_handle() else {
            return work(None);
        };

        let (outcome_tx, outcome_rx) = bounded(1);
        let cell = Box::into_raw(Box::new(InvokeCell {
            work,
            outcome: outcome_tx,
        }));

        // SAFETY: `cell` is a live Box pointer; ownership passes to the
        // window procedure's WM_INVOKE handler, or back to us on a failed
        // post.
        let posted = unsafe {
            PostMessageW(
                HWND(handle.raw() as *mut core::ffi::c_void),
                WM_INVOKE,
                WPARAM(cell as usize),
                LPARAM(0),
            )
        };
        if posted.is_err() {
            // The window went away before the post; reclaim the cell.
            drop(unsafe { Box::from_raw(cell) });
            return Err(HotkeyError::SinkStopped);
        }

        match outcome_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(HotkeyError::SinkStopped),
        }
    }
}

impl Drop for MessageWindow {
    fn drop(&mut self) {
        let hwnd = self.shared.hwnd.load(Ordering::Acquire);
        if hwnd != 0 {
            // SAFETY: posting to a destroyed window fails cleanly.
            let close = unsafe {
                PostMessageW(
                    HWND(hwnd as *mut core::ffi::c_void),
                    WM_CLOSE,
                    WPARAM(0),
                    LPARAM(0),
                )
            };
            if let Err(error) = close {
                tracing::warn!(target: "horizon_hotkey::message_window", %error, "failed to post close to message window");
            }
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Pump thread entry: create the window, report readiness, run the pump
/// until `WM_QUIT`.
fn pump_main(shared: Arc<WindowShared>, ready: Sender<Result<()>>) {
    let hwnd = match create_window(&shared) {
        Ok(hwnd) => hwnd,
        Err(error) => {
            let _ = ready.send(Err(error));
            return;
        }
    };
    shared.hwnd.store(hwnd.0 as isize, Ordering::Release);
    let _ = ready.send(Ok(()));

    tracing::debug!(target: "horizon_hotkey::message_window", "message pump started");
    let mut msg = MSG::default();
    // SAFETY: msg is a valid MSG; the loop exits on WM_QUIT.
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.as_bool() {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
    tracing::debug!(target: "horizon_hotkey::message_window", "message pump exited");
}

fn create_window(shared: &Arc<WindowShared>) -> Result<HWND> {
    let instance: HINSTANCE = unsafe { GetModuleHandleW(None) }
        .map_err(|e| HotkeyError::WindowCreation(e.to_string()))?
        .into();

    let class = WNDCLASSW {
        lpfnWndProc: Some(wndproc),
        hInstance: instance,
        lpszClassName: CLASS_NAME,
        ..Default::default()
    };
    // A second sink in the same process reuses the class.
    if unsafe { RegisterClassW(&class) } == 0
        && unsafe { GetLastError() } != ERROR_CLASS_ALREADY_EXISTS
    {
        return Err(HotkeyError::WindowCreation(
            "RegisterClassW failed".to_string(),
        ));
    }

    // The window procedure receives the shared-state pointer through
    // CREATESTRUCTW and keeps it in GWLP_USERDATA; the matching
    // Arc::from_raw happens in WM_NCDESTROY.
    let state = Arc::into_raw(Arc::clone(shared));
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            CLASS_NAME,
            w!("horizon-hotkey message sink"),
            WINDOW_STYLE::default(),
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            None,
            instance,
            Some(state as *const core::ffi::c_void),
        )
    }
    .map_err(|e| {
        // SAFETY: creation failed, so WM_NCDESTROY will never release it.
        drop(unsafe { Arc::from_raw(state) });
        HotkeyError::WindowCreation(e.to_string())
    })
}

unsafe extern "system" fn wndproc(
    hwnd: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        if message == WM_NCCREATE {
            let create = lparam.0 as *const CREATESTRUCTW;
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, (*create).lpCreateParams as isize);
            return DefWindowProcW(hwnd, message, wparam, lparam);
        }

        let state = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const WindowShared;
        if state.is_null() {
            return DefWindowProcW(hwnd, message, wparam, lparam);
        }

        match message {
            WM_INVOKE => {
                let cell = Box::from_raw(wparam.0 as *mut InvokeCell);
                let result = (cell.work)((*state).window_handle());
                let _ = cell.outcome.send(result);
                LRESULT(0)
            }
            WM_DESTROY => {
                (*state).hwnd.store(0, Ordering::Release);
                PostQuitMessage(0);
                LRESULT(0)
            }
            WM_NCDESTROY => {
                SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
                drop(Arc::from_raw(state));
                DefWindowProcW(hwnd, message, wparam, lparam)
            }
            _ => {
                (*state).raw_messages.emit(&RawMessage {
                    message,
                    wparam: wparam.0,
                    lparam: lparam.0,
                });
                DefWindowProcW(hwnd, message, wparam, lparam)
            }
        }
    }
}
