//! Named threads with a start-up handshake.

use std::cell::RefCell;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::runtime::Semaphore;

const UNNAMED: &str = "UNKNOWN";

// OS thread names are capped at 15 bytes on Linux.
const OS_NAME_LIMIT: usize = 15;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    static THREAD_NAME: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Process-local id of the calling thread.
pub fn current_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// Name of the calling thread.
pub fn current_name() -> String {
    THREAD_NAME.with(|name| {
        name.borrow()
            .clone()
            .or_else(|| std::thread::current().name().map(str::to_string))
            .unwrap_or_else(|| UNNAMED.to_string())
    })
}

/// Rename the calling thread for log output.
pub fn set_current_name(name: &str) {
    THREAD_NAME.with(|slot| *slot.borrow_mut() = Some(name.to_string()));
}

/// A named OS thread.
#[derive(Debug)]
pub struct Thread {
    name: String,
    id: u64,
    handle: Option<JoinHandle<()>>,
}

impl Thread {
    /// Spawn `f` on a new thread called `name`.
    ///
    /// Returns once the thread is running, so threads start in spawn order.
    pub fn spawn<F>(name: impl Into<String>, f: F) -> io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut name = name.into();
        if name.is_empty() {
            name = UNNAMED.to_string();
        }

        let started = Arc::new(Semaphore::new(0));
        let id = Arc::new(AtomicU64::new(0));
        let os_name: String = name.chars().take(OS_NAME_LIMIT).collect();

        let handle = {
            let (started, id, name) = (started.clone(), id.clone(), name.clone());
            std::thread::Builder::new().name(os_name).spawn(move || {
                set_current_name(&name);
                id.store(current_id(), Ordering::Release);
                started.notify();
                f();
            })
        }
        .inspect_err(|e| tracing::error!(thread = %name, error = %e, "Failed to spawn thread"))?;

        started.wait();
        Ok(Self {
            name,
            id: id.load(Ordering::Acquire),
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id the thread reports through [`current_id`].
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the thread to finish. Returns the panic payload if it panicked.
    pub fn join(mut self) -> std::thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}
