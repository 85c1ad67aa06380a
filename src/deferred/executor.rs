//! Delivery queues for deferred consumer callbacks.

use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{trace, warn};

/// A unit of callback work handed to an executor.
pub type Job = Box<dyn FnOnce() + Send>;

/// A borrowed capability that runs consumer callbacks off the resolving
/// thread. The deferred holds a handle to it but never manages its
/// lifecycle.
pub trait Executor: Send + Sync {
    fn execute(&self, job: Job);
}

/// Where a deferred dispatches its consumer callback. Evaluated at send
/// time, not at registration time.
#[derive(Clone, Default)]
pub enum Delivery {
    /// Run the callback synchronously on the resolving thread.
    #[default]
    Inline,
    /// Hand the callback to an executor.
    Queue(Arc<dyn Executor>),
}

impl Delivery {
    pub(crate) fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        match self {
            Delivery::Inline => job(),
            Delivery::Queue(executor) => executor.execute(Box::new(job)),
        }
    }
}

/// A single background worker thread draining a job channel in order.
///
/// Jobs submitted after [`stop`](ThreadExecutor::stop) run inline on the
/// submitting thread, so no callback is ever silently dropped.
pub struct ThreadExecutor {
    name: String,
    jobs: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadExecutor {
    pub fn new() -> Self {
        Self::named("deferred-worker")
    }

    /// Spawn a worker with a name used in log output.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let (jobs, queue) = channel::<Job>();

        let worker_name = name.clone();
        let worker = thread::spawn(move || {
            trace!("executor `{}` started", worker_name);
            while let Ok(job) = queue.recv() {
                job();
            }
            trace!("executor `{}` drained and stopped", worker_name);
        });

        ThreadExecutor {
            name,
            jobs: Mutex::new(Some(jobs)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Stop accepting new jobs, drain what was already queued, and join
    /// the worker thread.
    pub fn stop(&self) {
        drop(self.lock_jobs().take());
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            let _ = worker.join();
        }
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, Option<Sender<Job>>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        // Never run a job while holding the sender lock; inline jobs may
        // re-enter execute().
        let rejected = {
            let guard = self.lock_jobs();
            match guard.as_ref() {
                Some(sender) => match sender.send(job) {
                    Ok(()) => None,
                    Err(send_back) => Some(send_back.0),
                },
                None => Some(job),
            }
        };

        if let Some(job) = rejected {
            warn!("executor `{}` is stopped, running job inline", self.name);
            job();
        }
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish naturally; don't join
        // on drop.
        drop(self.lock_jobs().take());
    }
}
