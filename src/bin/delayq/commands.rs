// src/bin/delayq/commands.rs
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use delayq::utils::constants::SHUTDOWN_GRACE;
use delayq::{Config, Job, RedisStore, Scheduler, SentinelExecutor, Shutdown, Worker};
use tracing::{info, warn};

async fn connect(config: &Config) -> Result<RedisStore> {
    RedisStore::connect(&config.redis_url())
        .await
        .with_context(|| format!("failed to connect to redis at {}", config.redis_addr))
}

// Enqueue one job
pub async fn enqueue_command(config: &Config, matches: &ArgMatches) -> Result<()> {
    let payload = matches
        .get_one::<String>("payload")
        .cloned()
        .unwrap_or_default();
    let delay = matches
        .get_one::<u64>("delay")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or(config.job_delay);
    let max_retry = matches
        .get_one::<u32>("max_retry")
        .copied()
        .unwrap_or(config.job_max_retry);

    let mut job = Job::new(payload)
        .with_delay(delay)
        .with_max_retry(max_retry);
    if let Some(id) = matches.get_one::<String>("id") {
        job = job.with_id(id.clone());
    }

    let scheduler = Scheduler::new(connect(config).await?, config.queue_key.clone());
    let id = scheduler
        .enqueue(job.clone())
        .await
        .context("failed to enqueue job")?;

    println!(
        "✅ Job enqueued! (id={}, payload={:?}, delay={:?}, maxRetry={})",
        id, job.payload, job.delay, job.retries_remaining
    );
    Ok(())
}

// Run the worker until a stop signal arrives
pub async fn work_command(config: &Config) -> Result<()> {
    let store = connect(config).await?;
    store.ping().await.context("redis did not answer PING")?;

    let worker = Worker::new(store, SentinelExecutor, config.worker_config());
    let (shutdown, signal) = Shutdown::new();
    let handle = tokio::spawn(async move { worker.run(signal).await });

    wait_for_termination().await?;
    info!("stop signal received, shutting down worker");
    shutdown.trigger();

    match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "worker task ended abnormally"),
        Err(_) => warn!(grace = ?SHUTDOWN_GRACE, "worker did not stop within grace period"),
    }
    Ok(())
}

// Show queue counts
pub async fn status_command(config: &Config) -> Result<()> {
    let scheduler = Scheduler::new(connect(config).await?, config.queue_key.clone());
    let pending = scheduler.pending().await?;
    let ready = scheduler.ready().await?;

    println!("📊 Queue '{}'", scheduler.key());
    println!("  Pending Jobs: {}", pending);
    println!("  Ready Jobs:   {}", ready);
    println!("  Delayed Jobs: {}", pending.saturating_sub(ready));
    Ok(())
}

#[cfg(unix)]
async fn wait_for_termination() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_termination() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
