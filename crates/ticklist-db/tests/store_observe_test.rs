//! Integration tests for the SQLite store's live query.

use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;

use ticklist_db::models::Task;
use ticklist_db::store::{SqliteTaskStore, TaskStore};
use ticklist_test_utils::create_test_db;

async fn next_snapshot(stream: &mut BoxStream<'static, Vec<Task>>) -> Vec<Task> {
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for snapshot")
        .expect("live query stream ended")
}

#[tokio::test]
async fn observe_emits_the_current_snapshot_immediately() {
    let db = create_test_db().await;
    let store = SqliteTaskStore::new(db.pool.clone());

    let mut stream = store.observe_all();
    assert_eq!(next_snapshot(&mut stream).await, vec![]);
}

#[tokio::test]
async fn every_mutation_triggers_a_fresh_snapshot() {
    let db = create_test_db().await;
    let store = SqliteTaskStore::new(db.pool.clone());

    let mut stream = store.observe_all();
    assert!(next_snapshot(&mut stream).await.is_empty());

    store
        .insert(Task::new("Buy milk"))
        .await
        .expect("insert should succeed");
    let snapshot = next_snapshot(&mut stream).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "Buy milk");
    assert!(snapshot[0].id > 0);

    let toggled = snapshot[0].with_done(true);
    store.update(toggled.clone()).await.expect("update");
    let snapshot = next_snapshot(&mut stream).await;
    assert_eq!(snapshot, vec![toggled.clone()]);

    store.delete(toggled).await.expect("delete");
    assert!(next_snapshot(&mut stream).await.is_empty());
}

#[tokio::test]
async fn delete_all_triggers_an_empty_snapshot() {
    let db = create_test_db().await;
    let store = SqliteTaskStore::new(db.pool.clone());

    store.insert(Task::new("A")).await.expect("insert");
    store.insert(Task::new("B")).await.expect("insert");

    let mut stream = store.observe_all();
    assert_eq!(next_snapshot(&mut stream).await.len(), 2);

    store.delete_all().await.expect("delete all");
    assert!(next_snapshot(&mut stream).await.is_empty());
}

#[tokio::test]
async fn streams_are_independent_and_restartable() {
    let db = create_test_db().await;
    let store = SqliteTaskStore::new(db.pool.clone());

    store.insert(Task::new("Shared")).await.expect("insert");

    let mut first = store.observe_all();
    let mut second = store.observe_all();
    assert_eq!(next_snapshot(&mut first).await.len(), 1);
    assert_eq!(next_snapshot(&mut second).await.len(), 1);
    drop(first);

    // A stream opened after others were dropped still sees the data and
    // still receives changes.
    let mut third = store.observe_all();
    assert_eq!(next_snapshot(&mut third).await.len(), 1);

    store.insert(Task::new("Later")).await.expect("insert");
    assert_eq!(next_snapshot(&mut second).await.len(), 2);
    assert_eq!(next_snapshot(&mut third).await.len(), 2);
}

#[tokio::test]
async fn unpersisted_insert_is_assigned_an_id() {
    let db = create_test_db().await;
    let store = SqliteTaskStore::new(db.pool.clone());

    store.insert(Task::new("Unassigned")).await.expect("insert");

    let mut stream = store.observe_all();
    let snapshot = next_snapshot(&mut stream).await;
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot[0].id > 0);
    assert!(!snapshot[0].is_done);
}
