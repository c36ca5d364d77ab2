use super::*;
use crate::llm::types::Role;

fn store_with(ttl_secs: u64, max_sessions: usize) -> SessionStore {
    SessionStore::new(SessionConfig {
        ttl: Duration::from_secs(ttl_secs),
        max_sessions,
        max_input_chars: 100,
    })
}

#[tokio::test]
async fn create_returns_greeting_snapshot() {
    let store = SessionStore::default();
    let snap = store.create("Welcome!").await.unwrap();
    assert!(!snap.pending);
    assert_eq!(snap.messages.len(), 1);
    assert_eq!(snap.messages[0].role, Role::Model);
    assert_eq!(snap.messages[0].text, "Welcome!");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let store = SessionStore::default();
    let id = Uuid::new_v4();
    assert_eq!(store.snapshot(id).await.unwrap_err(), SessionError::NotFound(id));
    assert!(!store.remove(id).await);
}

#[tokio::test]
async fn with_conversation_mutates_in_place() {
    let store = SessionStore::default();
    let id = store.create("hi").await.unwrap().id;
    let now = Instant::now();
    store
        .with_conversation(id, now, |c| c.begin_turn("question", 100, now).map(|_| ()))
        .await
        .unwrap()
        .unwrap();

    let snap = store.snapshot(id).await.unwrap();
    assert!(snap.pending);
    assert_eq!(snap.messages.len(), 2);
}

#[tokio::test]
async fn idle_conversation_expires() {
    let store = store_with(60, 10);
    let start = Instant::now();
    let id = store.create_at("hi", start).await.unwrap().id;

    let later = start + Duration::from_secs(61);
    assert!(matches!(store.snapshot_at(id, later).await, Err(SessionError::NotFound(_))));
    assert_eq!(store.prune_expired(later).await, vec![id]);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn pending_conversation_never_expires() {
    let store = store_with(60, 10);
    let start = Instant::now();
    let id = store.create_at("hi", start).await.unwrap().id;
    store
        .with_conversation(id, start, |c| c.begin_turn("slow question", 100, start).is_ok())
        .await
        .unwrap();

    let later = start + Duration::from_secs(600);
    assert!(store.prune_expired(later).await.is_empty());
    assert!(store.snapshot_at(id, later).await.is_ok());
}

#[tokio::test]
async fn full_store_sweeps_before_refusing() {
    let store = store_with(60, 2);
    let start = Instant::now();
    store.create_at("a", start).await.unwrap();
    store.create_at("b", start).await.unwrap();
    assert_eq!(store.create_at("c", start).await.unwrap_err(), SessionError::Full { max: 2 });

    // Once the first two have expired, a new one fits.
    let later = start + Duration::from_secs(120);
    assert!(store.create_at("c", later).await.is_ok());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn remove_deletes_conversation() {
    let store = SessionStore::default();
    let id = store.create("hi").await.unwrap().id;
    assert!(store.remove(id).await);
    assert!(store.snapshot(id).await.is_err());
}
