use std::time::Duration;

use delayq::{
    DelayStore, FetchMode, Job, RedisStore, Scheduler, ScoreBound, SentinelExecutor, Step, Worker,
    WorkerConfig,
};

/// Helper: connect to a local Redis.
/// Uses REDIS_URL when set.
async fn test_store() -> RedisStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    RedisStore::connect(&url).await.unwrap()
}

fn test_key() -> String {
    format!("delayq:test:{}", nanoid::nanoid!(8))
}

#[tokio::test]
#[ignore] // Requires running Redis
async fn sorted_set_operations() {
    let store = test_store().await;
    store.ping().await.unwrap();
    let key = test_key();

    store.insert(&key, "b", 20).await.unwrap();
    store.insert(&key, "a", 10).await.unwrap();
    store.insert(&key, "c", 30).await.unwrap();

    let due = store
        .range_by_score(&key, ScoreBound::NegInf, ScoreBound::Value(20), 0, 1)
        .await
        .unwrap();
    assert_eq!(due, vec!["a"]);
    assert_eq!(
        store
            .count_by_score(&key, ScoreBound::NegInf, ScoreBound::Value(20))
            .await
            .unwrap(),
        2
    );

    assert_eq!(store.remove_by_value(&key, "a").await.unwrap(), 1);
    assert_eq!(store.remove_by_value(&key, "a").await.unwrap(), 0);

    assert_eq!(
        store.pop_due(&key, ScoreBound::Value(25)).await.unwrap(),
        Some("b".to_string())
    );
    assert_eq!(store.pop_due(&key, ScoreBound::Value(25)).await.unwrap(), None);
    assert_eq!(store.len(&key).await.unwrap(), 1);

    store.remove_by_value(&key, "c").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires running Redis
async fn failing_job_round_trip() {
    let store = test_store().await;
    let key = test_key();
    let scheduler = Scheduler::new(store.clone(), key.clone());

    for mode in [FetchMode::TwoStep, FetchMode::AtomicPop] {
        let worker = Worker::new(
            store.clone(),
            SentinelExecutor,
            WorkerConfig {
                key: key.clone(),
                poll_interval: Duration::from_millis(10),
                fallback_delay: Duration::ZERO,
                fetch_mode: mode,
            },
        );

        scheduler
            .enqueue(Job::new("fail").with_max_retry(1))
            .await
            .unwrap();

        assert_eq!(
            worker.poll_once().await,
            Step::Retried { retries_remaining: 0 }
        );
        assert_eq!(worker.poll_once().await, Step::Exhausted);
        assert_eq!(worker.poll_once().await, Step::Idle);
        assert_eq!(store.len(&key).await.unwrap(), 0);
    }
}
