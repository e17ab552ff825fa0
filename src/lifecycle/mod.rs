//! Process lifecycle for the `livecfg` binary.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     logging::init → load config file → apply to registry
//!
//! Signals (signals.rs):
//!     SIGHUP  → reload the config file
//!     SIGUSR1 → reopen file destinations
//!     SIGINT/SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast to every subscribed task → exit
//! ```
//!
//! # Design Decisions
//! - Reloading is explicit; nothing watches the file
//! - A failed reload keeps the previous values and the process keeps running

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::{Signal, SignalListener};
