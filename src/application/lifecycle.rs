//! Cancellation primitives shared by the background services.
//!
//! A service owns an [`ActiveGate`] plus the `JoinHandle`s of everything it
//! has scheduled. Cancelling closes the gate first, then aborts the handles.
//! Every continuation that mutates the store does so inside
//! [`ActiveGate::run`], so once `close` returns no continuation can mutate
//! anything, whether or not its abort has landed yet.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Flag that gates late-firing continuations.
#[derive(Debug)]
pub(crate) struct ActiveGate {
    active: Mutex<bool>,
}

impl ActiveGate {
    pub(crate) fn new() -> Self {
        Self {
            active: Mutex::new(true),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        *self.active.lock()
    }

    /// Run `f` if the gate is still open.
    ///
    /// The gate stays locked while `f` runs, so a concurrent [`close`] waits
    /// for `f` to finish. `f` must not call back into this gate.
    ///
    /// [`close`]: Self::close
    pub(crate) fn run<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let active = self.active.lock();
        if !*active {
            return None;
        }
        Some(f())
    }

    /// Close the gate. Returns whether it was open.
    pub(crate) fn close(&self) -> bool {
        std::mem::replace(&mut *self.active.lock(), false)
    }
}

/// Unkeyed set of pending tasks.
#[derive(Debug, Default)]
pub(crate) struct TaskSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskSet {
    pub(crate) fn push(&self, handle: JoinHandle<()>) {
        let mut handles = self.handles.lock();
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
    }

    pub(crate) fn len(&self) -> usize {
        self.handles
            .lock()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub(crate) fn abort_all(&self) {
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
    }
}

/// Pending tasks keyed by what they act on; at most one per key.
#[derive(Debug)]
pub(crate) struct KeyedTasks<K> {
    handles: Mutex<HashMap<K, JoinHandle<()>>>,
}

impl<K: Eq + Hash> KeyedTasks<K> {
    pub(crate) fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Store `handle` under `key`, aborting the task it replaces.
    pub(crate) fn replace(&self, key: K, handle: JoinHandle<()>) {
        if let Some(previous) = self.handles.lock().insert(key, handle) {
            previous.abort();
        }
    }

    pub(crate) fn abort(&self, key: &K) {
        if let Some(handle) = self.handles.lock().remove(key) {
            handle.abort();
        }
    }

    pub(crate) fn abort_all(&self) {
        for (_, handle) in self.handles.lock().drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn gate_runs_until_closed() {
        let gate = ActiveGate::new();
        assert_eq!(gate.run(|| 1), Some(1));
        assert!(gate.close());
        assert!(!gate.close());
        assert!(!gate.is_active());
        assert_eq!(gate.run(|| 2), None);
    }

    #[tokio::test(start_paused = true)]
    async fn abort_all_stops_pending_tasks() {
        let tasks = TaskSet::default();
        tasks.push(tokio::spawn(tokio::time::sleep(Duration::from_secs(60))));
        tasks.push(tokio::spawn(tokio::time::sleep(Duration::from_secs(60))));
        assert_eq!(tasks.len(), 2);

        tasks.abort_all();
        tokio::task::yield_now().await;
        assert_eq!(tasks.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_a_keyed_task_aborts_the_old_one() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let fired = Arc::new(AtomicUsize::new(0));
        let timer = |fired: Arc<AtomicUsize>, value: usize| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                fired.store(value, Ordering::SeqCst);
            })
        };

        let tasks = KeyedTasks::new();
        tasks.replace("key", timer(fired.clone(), 1));
        tasks.replace("key", timer(fired.clone(), 2));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        tasks.replace("other", timer(fired.clone(), 3));
        tasks.abort(&"other");
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
