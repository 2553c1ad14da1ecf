//! Online sessions against the in-memory store.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tictac_engine::{Player, Position};
use tictac_online::{
    DocumentStore, GameDocument, MemoryStore, OnlineSession, SessionError, StoreError,
    Subscription, Winner, WriteMode, game_key,
};

/// Store wrapper that records every write.
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, Value, WriteMode)>>,
}

impl RecordingStore {
    fn writes(&self) -> Vec<(String, Value, WriteMode)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn write(&self, key: &str, value: Value, mode: WriteMode) -> Result<(), StoreError> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.clone(), mode));
        self.inner.write(key, value, mode).await
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner.read(key).await
    }

    async fn subscribe(&self, key: &str) -> Result<Subscription, StoreError> {
        self.inner.subscribe(key).await
    }
}

fn key() -> String {
    game_key("test_game")
}

async fn connected(store: Arc<dyn DocumentStore>) -> OnlineSession {
    let mut session = OnlineSession::new(store, key());
    session.connect().await.unwrap();
    session.next_snapshot().await.unwrap();
    session
}

#[tokio::test]
async fn test_missing_document_is_initialized() {
    let store = Arc::new(MemoryStore::new());
    let mut session = OnlineSession::new(store.clone(), key());
    assert_eq!(session.status(), "Loading game...");

    session.connect().await.unwrap();
    let doc = session.next_snapshot().await.unwrap().clone();
    assert_eq!(doc, GameDocument::initial());
    assert!(store.read(&key()).await.unwrap().is_some());
    assert_eq!(session.status(), "Choose your side to play (X or O).");
}

#[tokio::test]
async fn test_snapshot_before_connect_fails() {
    let mut session = OnlineSession::new(Arc::new(MemoryStore::new()), key());
    assert!(matches!(
        session.next_snapshot().await,
        Err(SessionError::NotConnected)
    ));
}

#[tokio::test]
async fn test_move_writes_full_patch_as_merge() {
    let store = Arc::new(RecordingStore::default());
    let mut session = connected(store.clone()).await;
    assert!(session.join(Player::X).await.unwrap());
    session.next_snapshot().await.unwrap();

    let patch = session.propose_move(4).await.unwrap().expect("legal move");
    assert_eq!(patch.current_player, Player::O);

    let (written_key, value, mode) = store.writes().last().cloned().unwrap();
    assert_eq!(written_key, key());
    assert_eq!(mode, WriteMode::Merge);
    assert_eq!(
        value,
        json!({
            "board": [null, null, null, null, "X", null, null, null, null],
            "currentPlayer": "O",
            "winner": null,
            "winningLine": null,
        })
    );
}

#[tokio::test]
async fn test_local_state_waits_for_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut session = connected(store).await;
    session.join(Player::X).await.unwrap();
    // The seat write has not been observed yet.
    assert!(!session.snapshot().unwrap().player_x_taken);

    session.next_snapshot().await.unwrap();
    assert!(session.snapshot().unwrap().player_x_taken);
    assert_eq!(session.status(), "Your turn (X)");

    session.propose_move(0).await.unwrap();
    assert!(session.snapshot().unwrap().board.is_empty(Position::TopLeft));
    session.next_snapshot().await.unwrap();
    assert!(!session.snapshot().unwrap().board.is_empty(Position::TopLeft));
    assert_eq!(session.status(), "Waiting for Player O...");
}

#[tokio::test]
async fn test_two_clients_play_to_a_win() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let mut x = connected(store.clone()).await;
    let mut o = connected(store.clone()).await;

    x.join(Player::X).await.unwrap();
    x.next_snapshot().await.unwrap();
    o.next_snapshot().await.unwrap();
    o.join(Player::O).await.unwrap();
    x.next_snapshot().await.unwrap();
    o.next_snapshot().await.unwrap();

    // X takes the top row.
    for (index, mover) in [(0, Player::X), (3, Player::O), (1, Player::X), (4, Player::O), (2, Player::X)] {
        let session = if mover == Player::X { &mut x } else { &mut o };
        assert!(session.propose_move(index).await.unwrap().is_some(), "move {index}");
        x.next_snapshot().await.unwrap();
        o.next_snapshot().await.unwrap();
    }

    let doc = o.snapshot().unwrap();
    assert_eq!(doc.winner, Some(Winner::X));
    assert_eq!(doc.winning_line.unwrap().indices(), [0, 1, 2]);
    assert_eq!(o.status(), "Player X wins!");
    assert_eq!(o.propose_move(8).await.unwrap(), None);
}

#[tokio::test]
async fn test_illegal_proposals_write_nothing() {
    let store = Arc::new(RecordingStore::default());
    let mut session = connected(store.clone()).await;

    // No seat yet.
    assert_eq!(session.propose_move(0).await.unwrap(), None);

    session.join(Player::O).await.unwrap();
    session.next_snapshot().await.unwrap();
    let writes = store.writes().len();

    assert_eq!(session.propose_move(0).await.unwrap(), None, "not O's turn");
    assert_eq!(session.propose_move(9).await.unwrap(), None, "out of bounds");
    assert_eq!(store.writes().len(), writes);
}

#[tokio::test]
async fn test_taken_seat_is_refused_off_turn() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let mut first = connected(store.clone()).await;
    let mut second = connected(store.clone()).await;

    first.join(Player::O).await.unwrap();
    second.next_snapshot().await.unwrap();

    let err = second.join(Player::O).await.unwrap_err();
    assert!(matches!(err, SessionError::SeatTaken(Player::O)));
    assert_eq!(err.to_string(), "Player O is already taken.");
    assert_eq!(second.seat(), None);
}

#[tokio::test]
async fn test_stale_snapshots_lose_updates() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let mut a = connected(store.clone()).await;
    let mut b = connected(store.clone()).await;

    // X is taken, but it is X's turn, so the second client may claim it too.
    a.join(Player::X).await.unwrap();
    a.next_snapshot().await.unwrap();
    b.next_snapshot().await.unwrap();
    b.join(Player::X).await.unwrap();
    a.next_snapshot().await.unwrap();
    b.next_snapshot().await.unwrap();

    // Both move from the same snapshot; the second write wins.
    a.propose_move(0).await.unwrap().unwrap();
    b.propose_move(8).await.unwrap().unwrap();
    a.next_snapshot().await.unwrap();

    let board = &a.snapshot().unwrap().board;
    assert!(board.is_empty(Position::TopLeft));
    assert!(!board.is_empty(Position::BottomRight));
}

#[tokio::test]
async fn test_store_failure_leaves_state_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let mut session = connected(store.clone()).await;
    let before = session.snapshot().cloned();

    store.set_offline(true);
    let err = session.join(Player::X).await.unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert_eq!(session.seat(), None);
    assert_eq!(session.snapshot().cloned(), before);

    // The user retries once the store is back.
    store.set_offline(false);
    assert!(session.join(Player::X).await.unwrap());
}

#[tokio::test]
async fn test_retry_resets_and_leave_releases() {
    let store = Arc::new(MemoryStore::new());
    let mut session = connected(store.clone()).await;
    session.join(Player::X).await.unwrap();
    session.next_snapshot().await.unwrap();
    session.propose_move(4).await.unwrap();

    session.retry().await.unwrap();
    assert_eq!(session.seat(), None);
    assert_eq!(session.status(), "Game reset. Choose your side (X or O).");
    let doc: GameDocument =
        serde_json::from_value(store.read(&key()).await.unwrap().unwrap()).unwrap();
    assert_eq!(doc, GameDocument::initial());

    session.next_snapshot().await.unwrap();
    assert_eq!(session.status(), "Game reset. Choose your side (X or O).");
    assert!(session.join(Player::O).await.unwrap());
    session.next_snapshot().await.unwrap();
    assert_eq!(session.status(), "Waiting for Player X...");

    assert_eq!(store.subscriber_count(&key()), 1);
    session.leave().await.unwrap();
    assert_eq!(store.subscriber_count(&key()), 0);
}

#[tokio::test]
async fn test_malformed_document_is_reported() {
    let store = Arc::new(MemoryStore::new());
    store
        .write(&key(), json!({ "currentPlayer": "Z" }), WriteMode::Replace)
        .await
        .unwrap();
    let mut session = OnlineSession::new(store, key());
    session.connect().await.unwrap();
    assert!(matches!(
        session.next_snapshot().await,
        Err(SessionError::Document(_))
    ));
    assert!(session.snapshot().is_none());
}
