use crate::core::installer::{InstallTask, TaskState};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Sequential executor for installer tasks. One background worker
/// drains the queue in strict FIFO submission order, so at most one
/// task reconciles any pack directory at a time; that single-flight
/// guarantee is the only concurrency control the pack directories need.
pub struct TaskService {
    tx: Option<Sender<Arc<InstallTask>>>,
    worker: Option<JoinHandle<()>>,
}

impl TaskService {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Arc<InstallTask>>();
        let worker = thread::spawn(move || {
            for task in rx {
                task.run();
                match task.state() {
                    TaskState::Failed => {
                        let cause = task
                            .error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "unknown".to_string());
                        error!("task {} ('{}') failed: {cause}", task.id(), task.pack_name());
                    }
                    state => info!("task {} ('{}'): {state:?}", task.id(), task.pack_name()),
                }
            }
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Enqueues a task and returns immediately. Lifecycle events are
    /// observed on the task object itself, not on the service.
    pub fn submit(&self, task: Arc<InstallTask>) {
        match &self.tx {
            Some(tx) => {
                if tx.send(task).is_err() {
                    error!("task service worker is gone; dropping task");
                }
            }
            None => error!("task service already shut down; dropping task"),
        }
    }

    /// Closes the queue and waits for the worker to drain it. Queued
    /// tasks still run; the in-flight task finishes normally. Called
    /// automatically on drop.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
