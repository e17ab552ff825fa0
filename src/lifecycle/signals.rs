//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGHUP, SIGUSR1, SIGINT and SIGTERM
//! - Translate them into [`Signal`] values for the main loop
//!
//! # Design Decisions
//! - Uses Tokio's signal streams (async-safe)
//! - Off Unix only Ctrl-C is available

use std::io;

/// Actions requested from outside the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Re-read the configuration file.
    Reload,
    /// Reopen log files after rotation.
    Reopen,
    Terminate,
}

#[cfg(unix)]
pub struct SignalListener {
    hangup: tokio::signal::unix::Signal,
    user1: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    pub fn new() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            user1: signal(SignalKind::user_defined1())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next signal.
    pub async fn recv(&mut self) -> Signal {
        tokio::select! {
            _ = self.hangup.recv() => Signal::Reload,
            _ = self.user1.recv() => Signal::Reopen,
            _ = self.terminate.recv() => Signal::Terminate,
            _ = tokio::signal::ctrl_c() => Signal::Terminate,
        }
    }
}

#[cfg(not(unix))]
pub struct SignalListener;

#[cfg(not(unix))]
impl SignalListener {
    pub fn new() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) -> Signal {
        let _ = tokio::signal::ctrl_c().await;
        Signal::Terminate
    }
}
