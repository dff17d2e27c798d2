use delayq::{DelayStore, MemoryStore, ScoreBound};

const KEY: &str = "jobs";

async fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(KEY, "c", 30).await.unwrap();
    store.insert(KEY, "a", 10).await.unwrap();
    store.insert(KEY, "b", 20).await.unwrap();
    store
}

#[tokio::test]
async fn range_is_inclusive_and_ordered() {
    let store = seeded().await;

    let all = store
        .range_by_score(KEY, ScoreBound::NegInf, ScoreBound::PosInf, 0, 10)
        .await
        .unwrap();
    assert_eq!(all, vec!["a", "b", "c"]);

    let bounded = store
        .range_by_score(KEY, ScoreBound::Value(10), ScoreBound::Value(20), 0, 10)
        .await
        .unwrap();
    assert_eq!(bounded, vec!["a", "b"]);

    let paged = store
        .range_by_score(KEY, ScoreBound::NegInf, ScoreBound::PosInf, 1, 1)
        .await
        .unwrap();
    assert_eq!(paged, vec!["b"]);
}

#[tokio::test]
async fn equal_scores_order_by_member() {
    let store = MemoryStore::new();
    store.insert(KEY, "zeta", 5).await.unwrap();
    store.insert(KEY, "alpha", 5).await.unwrap();

    let first = store
        .range_by_score(KEY, ScoreBound::NegInf, ScoreBound::Value(5), 0, 1)
        .await
        .unwrap();
    assert_eq!(first, vec!["alpha"]);
}

#[tokio::test]
async fn reinserting_a_member_moves_it() {
    let store = seeded().await;
    store.insert(KEY, "a", 40).await.unwrap();

    assert_eq!(store.len(KEY).await.unwrap(), 3);
    assert_eq!(store.score(KEY, "a"), Some(40));
    let all = store
        .range_by_score(KEY, ScoreBound::NegInf, ScoreBound::PosInf, 0, 10)
        .await
        .unwrap();
    assert_eq!(all, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn remove_reports_count() {
    let store = seeded().await;

    assert_eq!(store.remove_by_value(KEY, "b").await.unwrap(), 1);
    assert_eq!(store.remove_by_value(KEY, "b").await.unwrap(), 0);
    assert_eq!(store.remove_by_value("other", "b").await.unwrap(), 0);
    assert_eq!(store.len(KEY).await.unwrap(), 2);
}

#[tokio::test]
async fn pop_due_takes_lowest_within_bound() {
    let store = seeded().await;

    assert_eq!(store.pop_due(KEY, ScoreBound::Value(5)).await.unwrap(), None);
    assert_eq!(
        store.pop_due(KEY, ScoreBound::Value(25)).await.unwrap(),
        Some("a".to_string())
    );
    assert_eq!(
        store.pop_due(KEY, ScoreBound::Value(25)).await.unwrap(),
        Some("b".to_string())
    );
    assert_eq!(store.pop_due(KEY, ScoreBound::Value(25)).await.unwrap(), None);
    assert_eq!(store.len(KEY).await.unwrap(), 1);
}

#[tokio::test]
async fn count_by_score_matches_range() {
    let store = seeded().await;

    assert_eq!(
        store
            .count_by_score(KEY, ScoreBound::NegInf, ScoreBound::Value(20))
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        store
            .count_by_score("missing", ScoreBound::NegInf, ScoreBound::PosInf)
            .await
            .unwrap(),
        0
    );
}
