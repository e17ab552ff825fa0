//! Counting semaphore.

use std::sync::{Condvar, Mutex};

/// A counting semaphore built on `Mutex` + `Condvar`.
#[derive(Debug, Default)]
pub struct Semaphore {
    count: Mutex<u32>,
    available: Condvar,
}

impl Semaphore {
    pub fn new(count: u32) -> Self {
        Self {
            count: Mutex::new(count),
            available: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    pub fn wait(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        while *count == 0 {
            count = self.available.wait(count).unwrap_or_else(|e| e.into_inner());
        }
        *count -= 1;
    }

    /// Release one permit.
    pub fn notify(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
        self.available.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_wait_consumes_initial_permits() {
        let sem = Semaphore::new(2);
        sem.wait();
        sem.wait();
        assert_eq!(*sem.count.lock().unwrap(), 0);
    }

    #[test]
    fn test_notify_wakes_waiter() {
        let sem = Arc::new(Semaphore::new(0));
        let waiter = {
            let sem = sem.clone();
            std::thread::spawn(move || sem.wait())
        };
        sem.notify();
        waiter.join().unwrap();
    }
}
