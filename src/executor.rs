// src/executor.rs
use async_trait::async_trait;
use tracing::info;

use crate::job::Job;

/// Payload that makes [`SentinelExecutor`] report a failure.
pub const FAIL_SENTINEL: &str = "fail";

/// The pluggable "run this job" step.
///
/// `Err` means the job failed and goes through the retry budget; it is not
/// treated as a fault of the worker itself. Implementations are expected to
/// return quickly and hand long-running work off elsewhere.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, job: &Job) -> anyhow::Result<()>;
}

/// Logs the payload and fails when it equals [`FAIL_SENTINEL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SentinelExecutor;

#[async_trait]
impl Executor for SentinelExecutor {
    async fn execute(&self, job: &Job) -> anyhow::Result<()> {
        if job.payload == FAIL_SENTINEL {
            anyhow::bail!("payload requested failure");
        }
        info!(id = %job.id, payload = %job.payload, "executed job");
        Ok(())
    }
}

/// Adapts a plain closure into an [`Executor`].
pub struct FnExecutor<F>(pub F);

#[async_trait]
impl<F> Executor for FnExecutor<F>
where
    F: Fn(&Job) -> anyhow::Result<()> + Send + Sync,
{
    async fn execute(&self, job: &Job) -> anyhow::Result<()> {
        (self.0)(job)
    }
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    async fn execute(&self, job: &Job) -> anyhow::Result<()> {
        (**self).execute(job).await
    }
}
