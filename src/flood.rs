use chrono::Local;
use std::time::Duration;
use tracing::error;

use crate::scheduler::JobHandle;

/// Sits out a rate limit: the rotation job and the calling path wait, other paths keep going.
#[derive(Clone, Debug)]
pub struct FloodControl {
    job: JobHandle,
}

impl FloodControl {
    pub fn new(job: JobHandle) -> Self {
        Self { job }
    }

    pub fn job(&self) -> &JobHandle {
        &self.job
    }

    pub async fn wait_out(&self, wait: Duration, provoked_by: &str) {
        let _paused = self.job.pause();
        let resume_at = Local::now()
            + chrono::Duration::from_std(wait).unwrap_or_else(|_| chrono::Duration::zero());
        error!(
            "FloodWait is provoked by {}|{} s to wait. Resuming at {}",
            provoked_by,
            wait.as_secs(),
            resume_at.format("%Y-%m-%d %H:%M:%S")
        );
        tokio::time::sleep(wait).await;
    }
}
