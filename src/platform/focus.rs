use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    mpsc, Arc, Mutex, MutexGuard, OnceLock,
};
use std::time::Duration;

use tauri::{Runtime, Window, WindowEvent};

use crate::sync::lock;
use crate::Error;

// A share sheet that never takes focus (an in-window popover) is treated as shown and
// closed normally once this elapses.
const FOCUS_WAIT_GRACE: Duration = Duration::from_millis(250);
const FOCUS_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FocusPhase {
    WaitingForLoss,
    WaitingForRegain,
    Settled(bool),
}

#[derive(Debug)]
struct FocusState {
    phase: FocusPhase,
}

impl FocusState {
    fn new() -> Self {
        Self {
            phase: FocusPhase::WaitingForLoss,
        }
    }

    fn settle(&mut self, success: bool) -> Option<bool> {
        self.phase = FocusPhase::Settled(success);
        Some(success)
    }

    fn on_focus_change(&mut self, focused: bool) -> Option<bool> {
        match (self.phase, focused) {
            (FocusPhase::WaitingForLoss, false) => {
                self.phase = FocusPhase::WaitingForRegain;
                None
            }
            (FocusPhase::WaitingForRegain, true) => self.settle(true),
            _ => None,
        }
    }

    fn on_destroyed(&mut self) -> Option<bool> {
        match self.phase {
            FocusPhase::Settled(_) => None,
            _ => self.settle(false),
        }
    }

    fn on_grace_elapsed(&mut self) -> Option<bool> {
        match self.phase {
            FocusPhase::WaitingForLoss => self.settle(true),
            _ => None,
        }
    }
}

struct PendingWait {
    token: u64,
    state: FocusState,
    tx: mpsc::Sender<bool>,
}

/// Tracks every share sheet currently open over one window.
struct FocusWaiter {
    label: String,
    pending: Mutex<Vec<PendingWait>>,
    listener_registered: AtomicBool,
}

impl FocusWaiter {
    fn new(label: String) -> Self {
        Self {
            label,
            pending: Mutex::new(Vec::new()),
            listener_registered: AtomicBool::new(false),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<PendingWait>> {
        lock(&self.pending)
    }

    /// Applies `step` to each matching wait and sends the outcome of those that settle.
    fn settle_where(
        &self,
        matches: impl Fn(u64) -> bool,
        mut step: impl FnMut(&mut FocusState) -> Option<bool>,
    ) {
        self.pending().retain_mut(|wait| {
            if !matches(wait.token) {
                return true;
            }
            match step(&mut wait.state) {
                Some(success) => {
                    let _ = wait.tx.send(success);
                    false
                }
                None => true,
            }
        });
    }

    fn forget(&self, token: u64) {
        self.pending().retain(|wait| wait.token != token);
    }
}

/// Resolves once the share sheet opened over a window has been dismissed.
pub struct FocusWaitHandle {
    waiter: Arc<FocusWaiter>,
    token: u64,
    rx: mpsc::Receiver<bool>,
}

impl FocusWaitHandle {
    /// Blocks until the sheet closes. `false` if the window went away or the wait timed out.
    pub fn wait(self) -> bool {
        let outcome = self.rx.recv_timeout(FOCUS_WAIT_TIMEOUT).unwrap_or(false);
        self.waiter.forget(self.token);
        outcome
    }

    pub fn cancel(self) {
        self.waiter.forget(self.token);
    }
}

pub fn begin_focus_wait<R: Runtime>(window: &Window<R>) -> Result<FocusWaitHandle, Error> {
    static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

    let waiter = get_focus_waiter(window);
    ensure_focus_listener(window, waiter.clone());

    let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    let (tx, rx) = mpsc::channel();
    waiter.pending().push(PendingWait {
        token,
        state: FocusState::new(),
        tx,
    });

    spawn_focus_grace_timer(waiter.clone(), token);

    Ok(FocusWaitHandle { waiter, token, rx })
}

fn get_focus_waiter<R: Runtime>(window: &Window<R>) -> Arc<FocusWaiter> {
    lock(focus_waiters())
        .entry(window.label().to_string())
        .or_insert_with(|| Arc::new(FocusWaiter::new(window.label().to_string())))
        .clone()
}

fn ensure_focus_listener<R: Runtime>(window: &Window<R>, waiter: Arc<FocusWaiter>) {
    if waiter.listener_registered.swap(true, Ordering::SeqCst) {
        return;
    }

    window.on_window_event(move |event| match event {
        WindowEvent::Focused(focused) => {
            waiter.settle_where(|_| true, |state| state.on_focus_change(*focused));
        }
        WindowEvent::Destroyed => {
            waiter.settle_where(|_| true, FocusState::on_destroyed);
            remove_focus_waiter(&waiter.label);
        }
        _ => {}
    });
}

fn spawn_focus_grace_timer(waiter: Arc<FocusWaiter>, token: u64) {
    std::thread::spawn(move || {
        std::thread::sleep(FOCUS_WAIT_GRACE);
        waiter.settle_where(|t| t == token, FocusState::on_grace_elapsed);
    });
}

fn remove_focus_waiter(label: &str) {
    lock(focus_waiters()).remove(label);
}

fn focus_waiters() -> &'static Mutex<HashMap<String, Arc<FocusWaiter>>> {
    static WAITERS: OnceLock<Mutex<HashMap<String, Arc<FocusWaiter>>>> = OnceLock::new();
    WAITERS.get_or_init(|| Mutex::new(HashMap::new()))
}
