//! Threading primitives.
//!
//! # Responsibilities
//! - Counting semaphore for start-up handshakes
//! - Named threads that are running before `spawn` returns
//! - Per-thread numeric id and name, read by the log field renderers
//!
//! # Design Decisions
//! - Thread ids are small process-local integers assigned on first use
//! - Spawned threads are detached on drop unless joined

pub mod semaphore;
pub mod thread;

pub use semaphore::Semaphore;
pub use thread::{current_id, current_name, Thread};
