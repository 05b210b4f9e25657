//! Fixed-size worker pool with explicit task handles.
//!
//! Workers pull tasks from a shared queue and report on a single completion
//! channel: a [`PoolEvent::Started`] when they pick a task up and a
//! [`PoolEvent::Finished`] when it ends. A panic inside the work function is
//! caught and reported as [`TaskOutcome::Panicked`]; the worker survives and
//! moves on to the next task.
//!
//! A worker whose task was cancelled retires once the task returns. Callers
//! that give up on a task use [`WorkerPool::abandon`], which cancels it and
//! spawns a replacement, so work that ignores its token costs one detached
//! thread instead of a pool slot.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::cancel::CancelToken;

type WorkFn<T> = dyn Fn(&str, &CancelToken) -> T + Send + Sync;

struct Task {
    id: usize,
    input: String,
    cancel: CancelToken,
}

/// Caller-side handle of a submitted task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: usize,
    cancel: CancelToken,
}

impl TaskHandle {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Asks the running work to stop. Work that never polls its token keeps
    /// its worker busy until it returns.
    fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[derive(Debug)]
pub enum TaskOutcome<T> {
    Returned(T),
    Panicked(String),
}

#[derive(Debug)]
pub enum PoolEvent<T> {
    /// A worker picked the task up at `at`.
    Started { id: usize, at: Instant },
    Finished { id: usize, outcome: TaskOutcome<T> },
}

pub struct WorkerPool<T> {
    queue: Option<Sender<Task>>,
    shared: Arc<Mutex<Receiver<Task>>>,
    events: Receiver<PoolEvent<T>>,
    event_tx: Sender<PoolEvent<T>>,
    work: Arc<WorkFn<T>>,
    size: usize,
    spawned: usize,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Spawns `size` workers (at least one) that run `work` on each task.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if a worker thread fails to spawn.
    pub fn new<F>(size: usize, work: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&str, &CancelToken) -> T + Send + Sync + 'static,
    {
        let (queue_tx, queue_rx) = mpsc::channel::<Task>();
        let (event_tx, event_rx) = mpsc::channel::<PoolEvent<T>>();
        let size = size.max(1);

        let mut pool = Self {
            queue: Some(queue_tx),
            shared: Arc::new(Mutex::new(queue_rx)),
            events: event_rx,
            event_tx,
            work: Arc::new(work),
            size,
            spawned: 0,
            workers: Vec::with_capacity(size),
        };
        for _ in 0..size {
            pool.spawn_worker()?;
        }
        Ok(pool)
    }

    fn spawn_worker(&mut self) -> Result<(), std::io::Error> {
        let queue_rx = Arc::clone(&self.shared);
        let event_tx = self.event_tx.clone();
        let work = Arc::clone(&self.work);
        let handle = thread::Builder::new()
            .name(format!("shape-worker-{}", self.spawned))
            .spawn(move || Self::worker_loop(&queue_rx, &event_tx, work.as_ref()))?;
        self.spawned += 1;
        self.workers.push(handle);
        Ok(())
    }

    /// Number of workers serving the queue.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total worker threads started, replacements included.
    #[inline]
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Queues a task and returns its handle.
    pub fn submit(&self, id: usize, input: impl Into<String>) -> TaskHandle {
        let cancel = CancelToken::new();
        if let Some(queue) = &self.queue {
            let _ = queue.send(Task {
                id,
                input: input.into(),
                cancel: cancel.clone(),
            });
        }
        TaskHandle { id, cancel }
    }

    /// Cancels a running task and starts a replacement worker; the worker
    /// holding the task retires when the task returns.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if the replacement fails to spawn.
    pub fn abandon(&mut self, handle: &TaskHandle) -> Result<(), std::io::Error> {
        handle.cancel();
        self.spawn_worker()
    }

    /// Returns an event that is already queued, without blocking.
    pub fn try_recv(&self) -> Option<PoolEvent<T>> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until the next event.
    pub fn recv(&self) -> Option<PoolEvent<T>> {
        self.events.recv().ok()
    }

    /// Blocks until the next event or until `timeout` elapses.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<PoolEvent<T>, RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    fn worker_loop(queue: &Mutex<Receiver<Task>>, events: &Sender<PoolEvent<T>>, work: &WorkFn<T>) {
        loop {
            let task = match queue.lock() {
                Ok(rx) => rx.recv(),
                Err(_) => return,
            };
            let Ok(task) = task else {
                return;
            };

            if events
                .send(PoolEvent::Started {
                    id: task.id,
                    at: Instant::now(),
                })
                .is_err()
            {
                return;
            }

            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(&task.input, &task.cancel))) {
                Ok(value) => TaskOutcome::Returned(value),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    debug!("Task {} panicked: {}", task.id, message);
                    TaskOutcome::Panicked(message)
                }
            };

            if events.send(PoolEvent::Finished { id: task.id, outcome }).is_err() {
                return;
            }
            if task.cancel.is_cancelled() {
                debug!("Worker retiring after cancelled task {}", task.id);
                return;
            }
        }
    }
}

impl<T> Drop for WorkerPool<T> {
    /// Closes the queue. Idle workers exit; busy ones exit after their
    /// current task and are not waited for.
    fn drop(&mut self) {
        self.queue.take();
        self.workers.clear();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
