//! Background task execution with exactly-once outcome delivery
//!
//! A fixed pool of worker threads drains an unbounded job queue. Each
//! spawned task owns a one-shot result channel: the worker sends exactly one
//! outcome (a value or an error, a panic becoming an error), and the caller
//! collects it through the returned [`TaskHandle`]. There is no cancellation;
//! once queued a task always runs to completion, including jobs still queued
//! when the executor is dropped.

use crate::error::{Result, TagbridgeError};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tracing::debug;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// The single outcome a task delivers: a value or a textual error
pub type TaskOutcome<T> = Result<T>;

/// Worker pool for blocking file operations
pub struct TaskExecutor {
    queue: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskExecutor {
    /// Spin up `threads` workers (at least one)
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (queue, jobs) = unbounded::<Job>();

        let workers = (0..threads)
            .map(|_| {
                let jobs = jobs.clone();
                thread::spawn(move || worker_loop(jobs))
            })
            .collect();

        debug!("started task executor with {} workers", threads);

        Self {
            queue: Some(queue),
            workers,
        }
    }

    /// Pool sized to the machine, leaving one core for the caller
    pub fn with_default_threads() -> Self {
        Self::new(num_cpus::get().saturating_sub(1).max(1))
    }

    /// Schedule a blocking operation off the calling thread.
    ///
    /// The returned handle resolves exactly once. A panicking task delivers a
    /// `TaskFailed` error rather than poisoning the pool.
    pub fn spawn<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (done, outcome) = bounded(1);

        let job: Job = Box::new(move || {
            let result = catch_unwind(AssertUnwindSafe(task))
                .unwrap_or_else(|panic| Err(TagbridgeError::TaskFailed(panic_message(&panic))));
            // The caller may have dropped the handle; that only discards the
            // outcome, it never duplicates delivery.
            let _ = done.send(result);
        });

        match &self.queue {
            Some(queue) => {
                if let Err(rejected) = queue.send(job) {
                    // Workers are gone; run inline so the outcome is still
                    // delivered exactly once.
                    (rejected.0)();
                }
            }
            None => job(),
        }

        TaskHandle { outcome }
    }
}

impl Drop for TaskExecutor {
    fn drop(&mut self) {
        // Closing the queue lets workers finish whatever is still queued and
        // then exit.
        drop(self.queue.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// One-shot receiver for a scheduled task's outcome
pub struct TaskHandle<T> {
    outcome: Receiver<TaskOutcome<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task delivers its outcome
    pub fn wait(self) -> TaskOutcome<T> {
        self.outcome.recv().unwrap_or_else(|_| {
            Err(TagbridgeError::TaskFailed(
                "result channel closed before delivery".to_string(),
            ))
        })
    }

    /// Collect the outcome if the task has already finished
    pub fn try_wait(&self) -> Option<TaskOutcome<T>> {
        self.outcome.try_recv().ok()
    }
}

fn worker_loop(jobs: Receiver<Job>) {
    for job in jobs {
        job();
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
