//! One-shot background fetch with cancellation.
//!
//! # Design
//! A screen load starts one `FetchTask`. The worker thread runs
//! `QuakeClient::load_event` and hands the result to `on_done` exactly once.
//! The only state shared with the owner is the cancel flag: once set, the
//! worker skips the request if it hasn't started and never calls `on_done`.
//! A request already in flight is not interrupted; it finishes or times out
//! and its result is dropped.
//!
//! `on_done` runs on the worker thread. Hosts marshal the result to their UI
//! thread from inside the callback.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::client::QuakeClient;
use crate::transport::Transport;
use crate::types::Event;

#[derive(Debug)]
pub struct FetchTask {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FetchTask {
    pub fn spawn<T, F>(client: QuakeClient, transport: T, on_done: F) -> io::Result<Self>
    where
        T: Transport + Send + 'static,
        F: FnOnce(Option<Event>) + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = thread::Builder::new()
            .name("quake-fetch".to_string())
            .spawn(move || {
                if flag.load(Ordering::Acquire) {
                    debug!("fetch cancelled before start");
                    return;
                }
                let event = client.load_event(&transport);
                if flag.load(Ordering::Acquire) {
                    debug!("fetch cancelled, dropping result");
                    return;
                }
                on_done(event);
            })?;

        Ok(Self {
            cancelled,
            handle: Some(handle),
        })
    }

    /// Suppress delivery of the result. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the worker to exit. Returns `false` if it panicked.
    pub fn join(mut self) -> bool {
        match self.handle.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}
