// src/play/schedule.rs

use std::future::Future;

use tokio::task::JoinHandle;

/// A spawned task that is aborted on `cancel()` or drop.
///
/// Sessions keep their ticker and their pending answer chain in these so a
/// restart or teardown stops every outstanding callback.
#[derive(Debug, Default)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True while the task has been spawned, not cancelled, and not finished.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_runs() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let mut task = ScheduledTask::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert!(task.is_active());

        task.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(!task.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        drop(ScheduledTask::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        }));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
