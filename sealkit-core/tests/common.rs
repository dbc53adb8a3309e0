//! Common test utilities shared across integration tests.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use sealkit_core::AuthCallback;

/// One recorded callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackEvent {
    /// `on_success` fired.
    Success(String),
    /// `on_failure` fired.
    Failure(String),
    /// `on_help` fired.
    Help(i32, String),
}

/// Callback that records every invocation for later assertions.
#[derive(Default)]
pub struct RecordingCallback {
    events: Mutex<Vec<CallbackEvent>>,
}

impl RecordingCallback {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<CallbackEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Polls until the first event arrives or `timeout` elapses.
    pub fn wait_for_event(&self, timeout: Duration) -> Option<CallbackEvent> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(event) = self.events.lock().unwrap().first().cloned() {
                return Some(event);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }
}

impl AuthCallback for RecordingCallback {
    fn on_success(&self, result: &str) {
        self.events
            .lock()
            .unwrap()
            .push(CallbackEvent::Success(result.to_string()));
    }

    fn on_failure(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(CallbackEvent::Failure(message.to_string()));
    }

    fn on_help(&self, code: i32, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(CallbackEvent::Help(code, message.to_string()));
    }
}
