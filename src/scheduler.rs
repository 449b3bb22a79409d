use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Shared pause switch for a scheduled job.
///
/// Pauses nest: the job stays paused until every [`PauseGuard`] is dropped.
#[derive(Clone, Debug)]
pub struct JobHandle {
    pauses: Arc<watch::Sender<usize>>,
}

impl JobHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            pauses: Arc::new(tx),
        }
    }

    pub fn pause(&self) -> PauseGuard {
        self.pauses.send_modify(|n| *n += 1);
        PauseGuard {
            handle: self.clone(),
        }
    }

    pub fn is_paused(&self) -> bool {
        *self.pauses.borrow() > 0
    }

    pub fn pause_depth(&self) -> usize {
        *self.pauses.borrow()
    }

    fn resume(&self) {
        self.pauses.send_modify(|n| *n = n.saturating_sub(1));
    }

    async fn until_resumed(&self) {
        let mut rx = self.pauses.subscribe();
        // The sender lives in `self`, so this only returns once unpaused.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for JobHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Resumes the job when dropped.
#[must_use = "the job resumes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PauseGuard {
    handle: JobHandle,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.handle.resume();
    }
}

/// Runs a job on a fixed interval plus a random delay of up to `jitter`.
pub struct Scheduler {
    interval: Duration,
    jitter: Duration,
    handle: JobHandle,
}

impl Scheduler {
    pub fn new(interval: Duration, jitter: Duration) -> Self {
        Self {
            interval,
            jitter,
            handle: JobHandle::new(),
        }
    }

    pub fn handle(&self) -> JobHandle {
        self.handle.clone()
    }

    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.interval;
        }
        self.interval + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }

    /// Never returns. A tick that falls inside a pause is skipped and the
    /// interval restarts once the job resumes.
    pub async fn start<F, Fut>(&self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            tokio::time::sleep(self.next_delay()).await;
            if self.handle.is_paused() {
                debug!("Scheduler tick skipped, job is paused");
                self.handle.until_resumed().await;
                continue;
            }
            job().await;
        }
    }
}
