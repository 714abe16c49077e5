//! Round orchestration: question broadcast, concurrent answer collection,
//! first-correct-wins arbitration, and the closing handshake.
//!
//! Each round fans out one task per participant; the task owns that
//! participant's socket for the duration of the round and returns it with
//! the recorded outcome. The round closes only once every task has
//! returned, by answer or by timeout, so a slow or silent participant can
//! delay a round by at most the answer timeout and never blocks it
//! indefinitely.

use crate::lobby::Participant;
use crate::questions::Question;
use colored::Colorize;
use log::{error, info, warn};
use rand::Rng;
use shared::{
    parse_answer, ANSWER_INSTRUCTIONS, CLIENT_ACK, CLOSING_NOTICE, QUESTION_PREFIX, SERVER_NAME,
};
use std::io;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::Duration;

/// Bounded wait for the closing acknowledgment.
const ACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one participant's answer within a round.
///
/// `NoResponse` covers timeout, disconnection, and unrecognized tokens —
/// distinct from an incorrect answer in the statistics tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    NoResponse,
}

/// Terminal result of a session, set at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Winner(String),
    NoWinner,
}

/// Closed record of one round, fed to the statistics sink.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub question: String,
    pub answers: Vec<(String, AnswerOutcome)>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Per-participant answer deadline, measured from the question send.
    pub answer_timeout: Duration,
}

/// One session's round orchestrator and participant registry.
pub struct TriviaGame {
    participants: Vec<Participant>,
    winner: Arc<Mutex<Option<String>>>,
    rounds: Vec<RoundRecord>,
    config: GameConfig,
}

impl TriviaGame {
    pub fn new(participants: Vec<Participant>, config: GameConfig) -> Self {
        TriviaGame {
            participants,
            winner: Arc::new(Mutex::new(None)),
            rounds: Vec::new(),
            config,
        }
    }

    /// Display names of everyone registered, in join order.
    pub fn roster(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    /// Records of the rounds played so far.
    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Runs rounds until someone wins or the pool is exhausted.
    pub async fn play(&mut self, mut pool: Vec<Question>) -> SessionOutcome {
        self.send_welcome().await;

        while !pool.is_empty() {
            let drawn = pool.swap_remove(rand::thread_rng().gen_range(0..pool.len()));
            println!("{}", format!("Asking: {}", drawn.text).bright_blue());

            let record = self.play_round(&drawn).await;
            self.rounds.push(record);

            if let Some(name) = self.winner.lock().await.clone() {
                return SessionOutcome::Winner(name);
            }

            println!(
                "{}",
                "No correct answer. Drawing a new question...".bright_yellow()
            );
            self.broadcast_line("No one answered correctly within the time limit.")
                .await;
        }

        SessionOutcome::NoWinner
    }

    /// Announces the outcome, runs the close handshake, and tears down.
    ///
    /// The handshake is best effort: an unresponsive participant gets its
    /// socket closed after the acknowledgment deadline either way.
    pub async fn close(mut self, outcome: &SessionOutcome) -> Vec<RoundRecord> {
        let announcement = match outcome {
            SessionOutcome::Winner(name) => {
                let text = format!("Game over! Congratulations to the winner: {}!", name);
                println!("{}", text.bright_green());
                text
            }
            SessionOutcome::NoWinner => {
                let text = "Game over! No winners this time.".to_string();
                println!("{}", text.bright_red());
                text
            }
        };
        self.broadcast_line(&announcement).await;

        for mut participant in self.participants.drain(..) {
            if let Err(e) = participant.send_line(CLOSING_NOTICE).await {
                warn!(
                    "Failed to send closing notice to {}: {}",
                    participant.name, e
                );
                continue;
            }
            match participant.recv_line(ACK_TIMEOUT).await {
                Some(ack) if ack == CLIENT_ACK => info!(
                    "Acknowledgment received from {}. Closing connection.",
                    participant.name
                ),
                _ => warn!("No acknowledgment from {}, closing anyway", participant.name),
            }
        }

        self.rounds
    }

    async fn send_welcome(&mut self) {
        let mut lines = vec![format!(
            "Welcome to the {} server, where we answer trivia questions.",
            SERVER_NAME
        )];
        for (i, participant) in self.participants.iter().enumerate() {
            lines.push(format!("Player {}: {}", i + 1, participant.name));
        }
        for line in &lines {
            self.broadcast_line(line).await;
        }
    }

    async fn broadcast_line(&mut self, text: &str) {
        for participant in &mut self.participants {
            if let Err(e) = participant.send_line(text).await {
                warn!("Failed to send to {}: {}", participant.name, e);
            }
        }
    }

    /// Plays one question: fan out, collect every outcome, take the
    /// participants back.
    async fn play_round(&mut self, question: &Question) -> RoundRecord {
        let prompt = format!("{} {}", QUESTION_PREFIX, question.text);

        let mut tasks = JoinSet::new();
        for mut participant in self.participants.drain(..) {
            let winner = Arc::clone(&self.winner);
            let truth = question.is_true;
            let wait = self.config.answer_timeout;
            let prompt = prompt.clone();

            tasks.spawn(async move {
                let outcome = match send_question(&mut participant, &prompt).await {
                    Ok(()) => collect_answer(&mut participant, truth, wait, &winner).await,
                    Err(e) => {
                        // A dead socket sits out the rest of the round.
                        warn!("Failed to send question to {}: {}", participant.name, e);
                        AnswerOutcome::NoResponse
                    }
                };
                (participant, outcome)
            });
        }

        let mut record = RoundRecord {
            question: question.text.clone(),
            answers: Vec::new(),
        };
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((participant, outcome)) => {
                    record.answers.push((participant.name.clone(), outcome));
                    self.participants.push(participant);
                }
                Err(e) => error!("Answer task failed: {}", e),
            }
        }
        record
    }
}

async fn send_question(participant: &mut Participant, prompt: &str) -> io::Result<()> {
    participant.send_line(prompt).await?;
    participant.send_line(ANSWER_INSTRUCTIONS).await
}

/// Reads and judges one participant's answer.
///
/// The winner check-and-set happens in a single lock scope so exactly one
/// task can claim the win; the verdict line is sent after the guard is
/// dropped so the lock never spans socket I/O.
async fn collect_answer(
    participant: &mut Participant,
    truth: bool,
    wait: Duration,
    winner: &Mutex<Option<String>>,
) -> AnswerOutcome {
    let line = match participant.recv_line(wait).await {
        Some(line) => line,
        None => {
            info!("No answer from {} within the time limit", participant.name);
            return AnswerOutcome::NoResponse;
        }
    };

    let answer = match parse_answer(&line) {
        Some(answer) => answer,
        None => {
            warn!("Invalid answer {:?} received from {}", line, participant.name);
            let notice = format!("Invalid answer '{}'. {}", line, ANSWER_INSTRUCTIONS);
            if let Err(e) = participant.send_line(&notice).await {
                warn!("Failed to notify {}: {}", participant.name, e);
            }
            return AnswerOutcome::NoResponse;
        }
    };

    if answer != truth {
        if let Err(e) = participant.send_line("Incorrect. You lose.").await {
            warn!("Failed to notify {}: {}", participant.name, e);
        }
        return AnswerOutcome::Incorrect;
    }

    let already_won = {
        let mut winner = winner.lock().await;
        match winner.as_ref() {
            None => {
                *winner = Some(participant.name.clone());
                None
            }
            Some(existing) => Some(existing.clone()),
        }
    };

    let verdict = match already_won {
        None => {
            println!(
                "{}",
                format!("{} answered correctly and won the game!", participant.name)
                    .bright_green()
            );
            "Correct! You win!".to_string()
        }
        Some(existing) => format!(
            "Correct, but too late! {} has already won the game.",
            existing
        ),
    };
    if let Err(e) = participant.send_line(&verdict).await {
        warn!("Failed to notify {}: {}", participant.name, e);
    }

    AnswerOutcome::Correct
}
