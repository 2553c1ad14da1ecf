//! Two online seats driven from one scripted terminal.

use tictac::{HumanPlayer, OnlineTable};
use tictac_online::{DocumentStore, GameDocument, MemoryStore, game_key};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream};

async fn run(script: &str, store: MemoryStore) -> String {
    let input = std::io::Cursor::new(script.as_bytes().to_vec());
    let human = HumanPlayer::new("Player", input, Vec::new());
    let human = OnlineTable::new(human, store, "table_test").run().await.unwrap();
    String::from_utf8(human.into_output()).unwrap()
}

#[tokio::test]
async fn test_game_plays_through_the_store() {
    let store = MemoryStore::new();
    let output = run("1\n4\n2\n5\n3\nq\n", store.clone()).await;

    assert!(output.contains("Your turn (X)"));
    assert!(output.contains("Your turn (O)"));
    assert!(output.contains("Player X wins!"));
    assert!(output.ends_with("Bye!\n"));
}

#[tokio::test]
async fn test_leaving_resets_and_releases() {
    let store = MemoryStore::new();
    let key = game_key("table_test");
    run("5\nq\n", store.clone()).await;

    assert_eq!(store.subscriber_count(&key), 0);
    let doc: GameDocument =
        serde_json::from_value(store.read(&key).await.unwrap().unwrap()).unwrap();
    assert_eq!(doc, GameDocument::initial());
}

#[tokio::test]
async fn test_retry_reseats_both_players() {
    let output = run("1\n4\n2\n5\n3\nr\n5\nq\n", MemoryStore::new()).await;
    // Three X turns in the first game, one after the reset.
    assert_eq!(output.matches("Your turn (X)").count(), 4);
    assert_eq!(output.matches("Player X wins!").count(), 1);
}

/// Terminal driven step by step, so the store can change between lines.
struct Terminal {
    keys: DuplexStream,
    screen: DuplexStream,
    seen: String,
    cursor: usize,
}

impl Terminal {
    async fn type_line(&mut self, line: &str) {
        self.keys.write_all(line.as_bytes()).await.unwrap();
        self.keys.write_all(b"\n").await.unwrap();
    }

    /// Reads output until `needle` shows up after the previous match.
    async fn wait_for(&mut self, needle: &str) {
        let mut buf = [0u8; 1024];
        loop {
            if let Some(found) = self.seen[self.cursor..].find(needle) {
                self.cursor += found + needle.len();
                return;
            }
            let n = self.screen.read(&mut buf).await.unwrap();
            assert!(n > 0, "output ended before {needle:?}");
            self.seen.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    }
}

fn table(store: MemoryStore) -> (OnlineTable<BufReader<DuplexStream>, DuplexStream>, Terminal) {
    let (keys, table_keys) = tokio::io::duplex(1 << 16);
    let (table_screen, screen) = tokio::io::duplex(1 << 16);
    let human = HumanPlayer::new("Player", BufReader::new(table_keys), table_screen);
    let terminal = Terminal {
        keys,
        screen,
        seen: String::new(),
        cursor: 0,
    };
    (OnlineTable::new(human, store, "table_test"), terminal)
}

#[tokio::test]
async fn test_failed_reset_is_offered_again() {
    let store = MemoryStore::new();
    let (table, mut terminal) = table(store.clone());

    let script = async {
        for cell in ["1", "4", "2", "5", "3"] {
            terminal.type_line(cell).await;
        }
        terminal.wait_for("Player X wins!").await;
        terminal.wait_for("[r]etry, [q]uit: ").await;

        store.set_offline(true);
        terminal.type_line("r").await;
        terminal.wait_for("Could not reach the game store").await;
        terminal.wait_for("Player X wins!").await;
        terminal.wait_for("[r]etry, [q]uit: ").await;

        store.set_offline(false);
        terminal.type_line("r").await;
        terminal.wait_for("Your turn (X)").await;
        terminal.type_line("q").await;
        terminal.wait_for("Bye!").await;
    };

    let (finished, ()) = tokio::join!(table.run(), script);
    assert!(finished.is_ok());
}

#[tokio::test]
async fn test_failed_move_can_be_repeated() {
    let store = MemoryStore::new();
    let (table, mut terminal) = table(store.clone());

    let script = async {
        terminal.wait_for("Your turn (X)").await;
        store.set_offline(true);
        terminal.type_line("5").await;
        terminal.wait_for("Could not reach the game store").await;
        terminal.wait_for("Your turn (X)").await;

        store.set_offline(false);
        terminal.type_line("5").await;
        terminal.wait_for("Your turn (O)").await;
        terminal.type_line("q").await;
        terminal.wait_for("Bye!").await;
    };

    let (finished, ()) = tokio::join!(table.run(), script);
    assert!(finished.is_ok());
    assert_eq!(store.subscriber_count(&game_key("table_test")), 0);
}

#[tokio::test]
async fn test_offline_start_waits_for_the_store() {
    let store = MemoryStore::new();
    store.set_offline(true);
    let (table, mut terminal) = table(store.clone());

    let script = async {
        terminal.wait_for("Could not reach the game store").await;
        terminal.wait_for("[enter] try again, [q]uit: ").await;
        store.set_offline(false);
        terminal.type_line("").await;
        terminal.wait_for("Your turn (X)").await;
        terminal.type_line("q").await;
        terminal.wait_for("Bye!").await;
    };

    let (finished, ()) = tokio::join!(table.run(), script);
    assert!(finished.is_ok());
}
