//! Integration tests for the pong server and participant crates
//!
//! These tests run a real server on a loopback port and talk to it over TCP.

use pong_client::network::{ClientError, Participant};
use pong_server::network::{Server, ServerConfig};
use pong_server::session::SharedSession;
use pong_shared::protocol::{decode_snapshot, encode_snapshot};
use pong_shared::{Command, Side, Snapshot};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const PATIENCE: Duration = Duration::from_secs(5);

async fn start_server() -> (SocketAddr, SharedSession) {
    let config = ServerConfig {
        addr: "127.0.0.1:0".to_string(),
        tick_interval: Duration::from_millis(10),
        read_timeout: Duration::from_millis(20),
    };
    let server = Server::bind(config).await.expect("bind loopback");
    let addr = server.local_addr().unwrap();
    let session = server.session();
    tokio::spawn(server.run());
    (addr, session)
}

/// Reads snapshots until one satisfies `predicate`
async fn wait_for<F>(participant: &mut Participant, predicate: F) -> Snapshot
where
    F: Fn(&Snapshot) -> bool,
{
    timeout(PATIENCE, async {
        loop {
            let snapshot = participant.next_snapshot().await.unwrap();
            if predicate(&snapshot) {
                return snapshot;
            }
        }
    })
    .await
    .expect("condition not reached in time")
}

/// Polls the session until `predicate` holds
async fn eventually<F, Fut>(mut predicate: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    timeout(PATIENCE, async {
        while !predicate().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time")
}

/// END-TO-END LIFECYCLE TESTS
mod lifecycle_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn two_player_session_lifecycle() {
        let (addr, session) = start_server().await;
        let addr = addr.to_string();

        // Participant 1
        let mut first = Participant::connect(&addr).await.unwrap();
        assert_eq!(first.side(), Side::A);
        assert_eq!(session.participant_count().await, 1);
        assert!(!session.is_active().await);
        let waiting = wait_for(&mut first, |_| true).await;
        assert!(!waiting.running);

        // Participant 2 starts the game
        let mut second = Participant::connect(&addr).await.unwrap();
        assert_eq!(second.side(), Side::B);
        assert_eq!(session.participant_count().await, 2);
        assert!(session.is_active().await);
        wait_for(&mut first, |s| s.running).await;
        let started = wait_for(&mut second, |s| s.running).await;

        // The ball moves while both are connected
        wait_for(&mut second, |s| (s.ball_x, s.ball_y) != (started.ball_x, started.ball_y))
            .await;

        // A third participant is turned away without a slot number
        let mut third = TcpStream::connect(&addr).await.unwrap();
        let mut buffer = [0u8; 64];
        match timeout(PATIENCE, third.read(&mut buffer)).await.unwrap() {
            Ok(len) => assert_eq!(len, 0, "rejected connection received data"),
            Err(e) => assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset),
        }
        assert_eq!(session.participant_count().await, 2);

        // Participant 1 leaves; participant 2 sees the game stop
        drop(first);
        let stopped = wait_for(&mut second, |s| !s.running).await;
        assert!(!stopped.running);
        eventually(|| {
            let session = session.clone();
            async move { session.participant_count().await == 1 }
        })
        .await;
        assert!(!session.is_active().await);

        // The freed slot is handed out again
        let rejoined = Participant::connect(&addr).await.unwrap();
        assert_eq!(rejoined.side(), Side::A);
        wait_for(&mut second, |s| s.running).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn renumbering_after_everyone_leaves() {
        let (addr, session) = start_server().await;
        let addr = addr.to_string();

        let first = Participant::connect(&addr).await.unwrap();
        let second = Participant::connect(&addr).await.unwrap();
        assert_eq!((first.side(), second.side()), (Side::A, Side::B));

        drop(second);
        drop(first);
        eventually(|| {
            let session = session.clone();
            async move { session.participant_count().await == 0 }
        })
        .await;

        let again = Participant::connect(&addr).await.unwrap();
        assert_eq!(again.side(), Side::A);
    }

    #[tokio::test]
    async fn connecting_to_closed_port_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = Participant::connect(&addr.to_string()).await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}

/// INPUT HANDLING TESTS
mod input_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn paddle_commands_move_own_paddle_only() {
        let (addr, _session) = start_server().await;
        let addr = addr.to_string();

        let mut first = Participant::connect(&addr).await.unwrap();
        let mut second = Participant::connect(&addr).await.unwrap();
        let start = wait_for(&mut first, |s| s.running).await;

        first.send_command(Command::Up).await.unwrap();
        let moved = wait_for(&mut first, |s| s.paddle1 != start.paddle1).await;
        assert_eq!(moved.paddle1, start.paddle1 - 10);
        assert_eq!(moved.paddle2, start.paddle2);

        second.send_command(Command::Down).await.unwrap();
        let moved = wait_for(&mut second, |s| s.paddle2 != start.paddle2).await;
        assert_eq!(moved.paddle2, start.paddle2 + 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn rejected_connections_do_not_disturb_players() {
        let (addr, session) = start_server().await;
        let addr = addr.to_string();

        let mut first = Participant::connect(&addr).await.unwrap();
        let _second = Participant::connect(&addr).await.unwrap();
        let start = wait_for(&mut first, |s| s.running).await;

        for _ in 0..2 {
            let rejected = Participant::connect(&addr).await;
            assert!(rejected.is_err());
        }

        // Back-to-back commands may share one read; each is still applied
        for _ in 0..3 {
            first.send_command(Command::Down).await.unwrap();
        }
        let moved = wait_for(&mut first, |s| s.paddle1 == start.paddle1 + 30).await;
        assert!(moved.running);
        assert_eq!(session.participant_count().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unknown_tokens_are_ignored_over_tcp() {
        let (addr, _session) = start_server().await;

        let mut raw = TcpStream::connect(addr).await.unwrap();
        let mut slot = [0u8; 1];
        raw.read_exact(&mut slot).await.unwrap();
        assert_eq!(&slot, b"1");

        raw.write_all(b"fire").await.unwrap();
        raw.write_all(&[0xff, 0x00, 0x13]).await.unwrap();

        // Still served: snapshots keep arriving after the junk
        let mut buffer = vec![0u8; 4096];
        let mut received = Vec::new();
        timeout(PATIENCE, async {
            while received.iter().filter(|&&b| b == b'\n').count() < 4 {
                let len = raw.read(&mut buffer).await.unwrap();
                assert!(len > 0, "server closed after malformed input");
                received.extend_from_slice(&buffer[..len]);
            }
        })
        .await
        .unwrap();
    }
}

/// PROTOCOL TESTS
mod protocol_tests {
    use super::*;

    /// Every field survives the trip through the wire format unchanged
    #[test]
    fn snapshot_fields_survive_wire() {
        let snapshot = Snapshot {
            paddle1: 50,
            paddle2: 550,
            ball_x: -4,
            ball_y: 1_000_000,
            score1: u32::MAX,
            score2: 0,
            running: false,
        };
        let decoded = decode_snapshot(&encode_snapshot(&snapshot).unwrap()).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn live_snapshots_match_session() {
        let (addr, session) = start_server().await;
        let mut lone = Participant::connect(&addr.to_string()).await.unwrap();

        // With one participant nothing moves, so the stream must equal the session
        let received = wait_for(&mut lone, |_| true).await;
        assert_eq!(received, session.snapshot().await);
    }
}
