//! Deferred task queue
//!
//! Scripted callbacks must not mutate the engine from inside a callback, so
//! they enqueue zero-argument actions here instead. The owning peer's runner
//! drains the queue once per tick, before the next `iterate` call, giving
//! each task exclusive access to that peer's client capability.

use std::collections::VecDeque;

use presence_core::{EngineError, PresenceClient};

/// A unit of work queued from within a callback for execution against the
/// owning peer's client on a later loop tick. Executed at most once; tasks
/// run in FIFO insertion order.
pub type DeferredTask = Box<dyn FnOnce(&mut dyn PresenceClient) -> Result<(), EngineError> + Send>;

/// Ordered queue of deferred tasks for one peer.
///
/// Populated and drained on the same thread under the one-thread-per-peer
/// scheduling model, so no internal synchronization is needed; the type is
/// `Send` so the owning script can move onto its peer's task.
#[derive(Default)]
pub struct TaskQueue {
    tasks: VecDeque<DeferredTask>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail. Callable from within a callback handler
    /// running on the owning peer's thread.
    pub fn enqueue(&mut self, task: DeferredTask) {
        self.tasks.push_back(task);
    }

    /// Number of tasks currently queued.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Execute every task present at drain time, in FIFO order, removing
    /// each one as it completes. A failing task aborts the drain and
    /// propagates to the peer runner, which terminates the loop.
    pub fn drain_and_run(&mut self, client: &mut dyn PresenceClient) -> Result<(), EngineError> {
        // Snapshot so tasks enqueued while draining wait for the next tick.
        let batch: Vec<DeferredTask> = self.tasks.drain(..).collect();
        for task in batch {
            task(client)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use presence_core::{PresenceEvents, PresenceStatus};

    /// Client that records every status it is asked to set.
    struct RecordingClient {
        statuses: Arc<Mutex<Vec<PresenceStatus>>>,
        fail_on: Option<PresenceStatus>,
    }

    impl RecordingClient {
        fn new() -> (Self, Arc<Mutex<Vec<PresenceStatus>>>) {
            let statuses = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    statuses: statuses.clone(),
                    fail_on: None,
                },
                statuses,
            )
        }
    }

    impl PresenceClient for RecordingClient {
        fn iterate(&mut self, _events: &mut dyn PresenceEvents) -> Result<(), EngineError> {
            Ok(())
        }

        fn iteration_interval(&self) -> Duration {
            Duration::from_millis(1)
        }

        fn set_self_status(&mut self, status: PresenceStatus) -> Result<(), EngineError> {
            if self.fail_on == Some(status) {
                return Err(EngineError::StatusChangeRejected {
                    status,
                    reason: "injected fault".to_string(),
                });
            }
            self.statuses.lock().unwrap().push(status);
            Ok(())
        }
    }

    #[test]
    fn tasks_run_in_fifo_order() {
        let (mut client, statuses) = RecordingClient::new();
        let mut queue = TaskQueue::new();

        // T1 then T2, enqueued back to back as a nested callback would.
        queue.enqueue(Box::new(|c| c.set_self_status(PresenceStatus::Away)));
        queue.enqueue(Box::new(|c| c.set_self_status(PresenceStatus::Busy)));
        assert_eq!(queue.len(), 2);

        queue.drain_and_run(&mut client).unwrap();
        assert!(queue.is_empty());
        assert_eq!(
            *statuses.lock().unwrap(),
            vec![PresenceStatus::Away, PresenceStatus::Busy]
        );
    }

    #[test]
    fn failing_task_aborts_the_drain() {
        let (mut client, statuses) = RecordingClient::new();
        client.fail_on = Some(PresenceStatus::Away);
        let mut queue = TaskQueue::new();

        queue.enqueue(Box::new(|c| c.set_self_status(PresenceStatus::Away)));
        queue.enqueue(Box::new(|c| c.set_self_status(PresenceStatus::Busy)));

        let result = queue.drain_and_run(&mut client);
        assert!(matches!(
            result,
            Err(EngineError::StatusChangeRejected { .. })
        ));
        // The second task never ran.
        assert!(statuses.lock().unwrap().is_empty());
    }

    #[test]
    fn drain_on_empty_queue_is_a_no_op() {
        let (mut client, statuses) = RecordingClient::new();
        let mut queue = TaskQueue::new();
        queue.drain_and_run(&mut client).unwrap();
        assert!(statuses.lock().unwrap().is_empty());
    }
}
