//! Execution contexts for listener delivery.
//!
//! Listeners never run on the task that received a feed event. Each
//! registration names a [`Dispatcher`] and every notification for that
//! listener is handed to it as a boxed closure. Both implementations here run
//! tasks one at a time in submission order, so a listener sees events for a
//! POI in the order the directory published them.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

/// A unit of work handed to a dispatcher.
pub type DispatchTask = Box<dyn FnOnce() + Send + 'static>;

/// An execution context that runs submitted tasks.
pub trait Dispatcher: Send + Sync {
    /// Queue `task`. Must not run it on the caller's stack.
    fn dispatch(&self, task: DispatchTask);
}

/// Runs tasks sequentially on a dedicated Tokio task.
///
/// The equivalent of a private serial queue: cheap to create, ordered, and
/// independent of whichever task produced the work.
#[derive(Clone)]
pub struct SerialDispatcher {
    tx: mpsc::UnboundedSender<DispatchTask>,
}

impl SerialDispatcher {
    /// Spawn the worker on `handle`. It exits when every clone is dropped.
    pub fn spawn(handle: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<DispatchTask>();
        handle.spawn(async move {
            while let Some(task) = rx.recv().await {
                task();
            }
        });
        Self { tx }
    }
}

impl Dispatcher for SerialDispatcher {
    fn dispatch(&self, task: DispatchTask) {
        if self.tx.send(task).is_err() {
            debug!("Serial dispatcher stopped - task dropped");
        }
    }
}

/// Sending half of a caller-driven queue.
///
/// Pair it with a [`DispatchQueue`] drained by the thread that owns the
/// presentation state (a UI loop, a terminal renderer, a test).
#[derive(Clone)]
pub struct QueueDispatcher {
    tx: mpsc::UnboundedSender<DispatchTask>,
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, task: DispatchTask) {
        if self.tx.send(task).is_err() {
            debug!("Dispatch queue closed - task dropped");
        }
    }
}

/// Receiving half of a caller-driven queue.
pub struct DispatchQueue {
    rx: mpsc::UnboundedReceiver<DispatchTask>,
}

impl DispatchQueue {
    /// Run every task queued so far without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait for one task and run it. Returns `false` once every sender is gone.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

/// Create a caller-driven dispatch queue.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use trailhistory::directory::{dispatch_queue, Dispatcher};
///
/// let (dispatcher, mut queue) = dispatch_queue();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let h = Arc::clone(&hits);
/// dispatcher.dispatch(Box::new(move || { h.fetch_add(1, Ordering::SeqCst); }));
///
/// assert_eq!(hits.load(Ordering::SeqCst), 0);
/// assert_eq!(queue.run_pending(), 1);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub fn dispatch_queue() -> (QueueDispatcher, DispatchQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueDispatcher { tx }, DispatchQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[test]
    fn test_queue_preserves_order() {
        let (dispatcher, mut queue) = dispatch_queue();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let seen = Arc::clone(&seen);
            dispatcher.dispatch(Box::new(move || seen.lock().push(i)));
        }
        assert_eq!(queue.run_pending(), 5);
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
        assert_eq!(queue.run_pending(), 0);
    }

    #[tokio::test]
    async fn test_queue_run_next_ends_when_senders_dropped() {
        let (dispatcher, mut queue) = dispatch_queue();
        dispatcher.dispatch(Box::new(|| {}));
        drop(dispatcher);
        assert!(queue.run_next().await);
        assert!(!queue.run_next().await);
    }

    #[tokio::test]
    async fn test_serial_dispatcher_runs_in_order() {
        let dispatcher = SerialDispatcher::spawn(&Handle::current());
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let seen = Arc::clone(&seen);
            dispatcher.dispatch(Box::new(move || seen.lock().push(i)));
        }
        let (tx, rx) = oneshot::channel();
        dispatcher.dispatch(Box::new(move || {
            let _ = tx.send(());
        }));
        rx.await.unwrap();
        assert_eq!(*seen.lock(), (0..10).collect::<Vec<_>>());
    }
}
