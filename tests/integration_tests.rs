//! Integration tests for the trivia session components
//!
//! These tests validate cross-crate interactions and real network behavior
//! over loopback sockets.

use server::beacon::Beacon;
use server::game::{AnswerOutcome, GameConfig, SessionOutcome, TriviaGame};
use server::lobby::Lobby;
use server::questions::Question;
use server::stats::Statistics;
use shared::{
    decode_offer, encode_offer, CLIENT_ACK, CLOSING_NOTICE, QUESTION_PREFIX, UDP_BROADCAST_PORT,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{sleep, Duration};

/// Remote end of a joined participant, as a real client would hold it.
struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connects to the lobby and registers under `name`.
    async fn join(port: u16, name: &str) -> Self {
        let stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut client = TestClient {
            lines: BufReader::new(read_half).lines(),
            writer: write_half,
        };
        client.send(name).await;
        client
    }

    async fn send(&mut self, text: &str) {
        self.writer.write_all(text.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    async fn next_line(&mut self) -> String {
        self.lines.next_line().await.unwrap().expect("stream closed")
    }

    /// Reads lines until one matching `predicate` arrives.
    async fn wait_for(&mut self, predicate: impl Fn(&str) -> bool) -> String {
        loop {
            let line = self.next_line().await;
            if predicate(&line) {
                return line;
            }
        }
    }
}

/// DISCOVERY PROTOCOL TESTS
mod discovery_tests {
    use super::*;

    /// Offer datagrams must round-trip the advertised port.
    #[test]
    fn offer_packet_roundtrip() {
        let packet = encode_offer(50000);
        assert_eq!(decode_offer(&packet), Some(50000));
    }

    /// A tampered cookie is discarded, not surfaced as an error.
    #[test]
    fn tampered_offer_is_discarded() {
        let mut packet = encode_offer(50000);
        packet[0] = 0x00;
        assert_eq!(decode_offer(&packet), None);
    }

    /// The advertised constant stays on the well-known discovery port.
    #[test]
    fn discovery_port_constant() {
        assert_eq!(UDP_BROADCAST_PORT, 13117);
    }

    /// A beacon's datagrams must be decodable by the client listener.
    #[tokio::test]
    async fn beacon_to_listener_flow() {
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let listen_addr = listener.local_addr().unwrap();

        let beacon = Beacon::spawn_to(49500, listen_addr).await.unwrap();
        let (host, port) = client::discovery::listen_for_offers(&listener)
            .await
            .unwrap();
        beacon.stop().await;

        assert_eq!(host, listen_addr.ip());
        assert_eq!(port, 49500);
    }
}

/// JOIN WINDOW TESTS
mod lobby_tests {
    use super::*;

    /// Joins arriving after the original window must still register as long
    /// as each join resets the remaining time.
    #[tokio::test]
    async fn join_window_extends_on_each_join() {
        let mut lobby = Lobby::bind("127.0.0.1", None).await.unwrap();
        let port = lobby.port();
        let window = Duration::from_millis(300);

        let joiners = tokio::spawn(async move {
            let a = TestClient::join(port, "A").await;
            sleep(Duration::from_millis(200)).await;
            let b = TestClient::join(port, "B").await;
            sleep(Duration::from_millis(200)).await;
            // Past the original 300 ms window; only the resets admit C.
            let c = TestClient::join(port, "C").await;
            (a, b, c)
        });

        let participants = lobby.collect_participants(window).await;
        let names: Vec<_> = participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);

        let _clients = joiners.await.unwrap();
    }

    /// A quiet lobby closes after one full window.
    #[tokio::test]
    async fn empty_window_closes_with_no_participants() {
        let mut lobby = Lobby::bind("127.0.0.1", None).await.unwrap();
        let participants = lobby
            .collect_participants(Duration::from_millis(200))
            .await;
        assert!(participants.is_empty());
    }
}

/// WINNER ARBITRATION TESTS
mod arbitration_tests {
    use super::*;

    /// However many participants answer correctly at once, exactly one wins
    /// and the rest are told they were too late.
    #[tokio::test]
    async fn concurrent_correct_answers_yield_one_winner() {
        let mut lobby = Lobby::bind("127.0.0.1", None).await.unwrap();
        let port = lobby.port();

        let joiners = tokio::spawn(async move {
            let mut clients = Vec::new();
            for i in 0..6 {
                clients.push(TestClient::join(port, &format!("P{}", i)).await);
            }
            clients
        });
        let participants = lobby
            .collect_participants(Duration::from_millis(300))
            .await;
        assert_eq!(participants.len(), 6);
        let clients = joiners.await.unwrap();

        let mut game = TriviaGame::new(
            participants,
            GameConfig {
                answer_timeout: Duration::from_millis(500),
            },
        );

        let mut verdicts = Vec::new();
        for mut c in clients {
            verdicts.push(tokio::spawn(async move {
                c.wait_for(|l| l.starts_with(QUESTION_PREFIX)).await;
                c.send("1").await;
                c.wait_for(|l| l.contains("Correct")).await
            }));
        }

        let pool = vec![Question {
            text: "One plus one equals two.".to_string(),
            is_true: true,
        }];
        let outcome = game.play(pool).await;

        let winner = match outcome {
            SessionOutcome::Winner(name) => name,
            SessionOutcome::NoWinner => panic!("expected a winner"),
        };

        let mut wins = 0;
        for handle in verdicts {
            let verdict = handle.await.unwrap();
            if verdict == "Correct! You win!" {
                wins += 1;
            } else {
                assert!(verdict.contains(&format!("{} has already won", winner)));
            }
        }
        assert_eq!(wins, 1);
    }

    /// With no correct answer and an exhausted pool, everyone hears that
    /// nobody won.
    #[tokio::test]
    async fn exhausted_pool_means_no_winner() {
        let mut lobby = Lobby::bind("127.0.0.1", None).await.unwrap();
        let port = lobby.port();

        let joiner = tokio::spawn(async move { TestClient::join(port, "A").await });
        let participants = lobby
            .collect_participants(Duration::from_millis(300))
            .await;
        let mut client = joiner.await.unwrap();

        let mut game = TriviaGame::new(
            participants,
            GameConfig {
                answer_timeout: Duration::from_millis(300),
            },
        );

        let watcher = tokio::spawn(async move {
            client.wait_for(|l| l.starts_with(QUESTION_PREFIX)).await;
            client.send("N").await;
            client.wait_for(|l| l.contains("No one answered")).await;
            client.wait_for(|l| l.contains("No winners")).await;
            client.wait_for(|l| l.contains(CLOSING_NOTICE)).await;
            client.send(CLIENT_ACK).await;
            client
        });

        let pool = vec![Question {
            text: "The Moon is larger than the Sun.".to_string(),
            is_true: true,
        }];
        let outcome = game.play(pool).await;
        assert_eq!(outcome, SessionOutcome::NoWinner);

        let _rounds = game.close(&outcome).await;
        let _client = watcher.await.unwrap();
    }
}

/// END-TO-END SESSION TESTS
mod end_to_end_tests {
    use super::*;

    /// Full host lifecycle over loopback: discovery, join, one round with a
    /// single correct answer, statistics, close handshake.
    #[tokio::test]
    async fn full_session_flow() {
        // Discovery: the beacon advertises the lobby port to the listener.
        let mut lobby = Lobby::bind("127.0.0.1", None).await.unwrap();
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let listen_addr = listener.local_addr().unwrap();
        let beacon = Beacon::spawn_to(lobby.port(), listen_addr).await.unwrap();

        let (_, advertised_port) = client::discovery::listen_for_offers(&listener)
            .await
            .unwrap();
        assert_eq!(advertised_port, lobby.port());

        // Join: three participants register within the extending window.
        let joiners = tokio::spawn(async move {
            let a = TestClient::join(advertised_port, "A").await;
            let b = TestClient::join(advertised_port, "B").await;
            let c = TestClient::join(advertised_port, "C").await;
            (a, b, c)
        });
        let participants = lobby
            .collect_participants(Duration::from_millis(300))
            .await;
        beacon.stop().await;
        assert_eq!(participants.len(), 3);

        let (mut a, b, c) = joiners.await.unwrap();

        // Play: A answers correctly within the timeout; B and C stay silent.
        let mut game = TriviaGame::new(
            participants,
            GameConfig {
                answer_timeout: Duration::from_millis(400),
            },
        );
        let roster = game.roster();
        assert_eq!(roster, ["A", "B", "C"]);

        let answering = tokio::spawn(async move {
            a.wait_for(|l| l.starts_with(QUESTION_PREFIX)).await;
            a.send("Y").await;
            a.wait_for(|l| l.contains("win")).await;
            a
        });

        let pool = vec![Question {
            text: "Sound travels faster in water than in air.".to_string(),
            is_true: true,
        }];
        let outcome = game.play(pool).await;
        assert_eq!(outcome, SessionOutcome::Winner("A".to_string()));

        let round = &game.rounds()[0];
        for (name, answer) in &round.answers {
            match name.as_str() {
                "A" => assert_eq!(*answer, AnswerOutcome::Correct),
                _ => assert_eq!(*answer, AnswerOutcome::NoResponse),
            }
        }

        // Close: the outcome is recorded, announced, and acknowledged.
        // Each remote acknowledges from its own task, since the host walks
        // its registry in an order the test does not control.
        let a = answering.await.unwrap();
        let mut closers = Vec::new();
        for mut remote in [a, b, c] {
            closers.push(tokio::spawn(async move {
                remote.wait_for(|l| l.contains(CLOSING_NOTICE)).await;
                remote.send(CLIENT_ACK).await;
                remote
            }));
        }

        let rounds = game.close(&outcome).await;
        let mut stats = Statistics::default();
        stats.record_session(&roster, &rounds, &outcome);

        assert_eq!(stats.player_stats["A"].wins, 1);
        assert_eq!(stats.player_stats["A"].correct_answers, 1);
        assert_eq!(stats.player_stats["B"].games_played, 1);
        assert_eq!(stats.player_stats["B"].correct_answers, 0);
        assert_eq!(
            stats.question_stats["Sound travels faster in water than in air."].correct,
            1
        );

        for handle in closers {
            let _remote = handle.await.unwrap();
        }
    }
}
