//! Aggregate statistics persisted between sessions.
//!
//! Tallies are keyed by display name and question text. Persistence is
//! best effort: a missing or unreadable file yields a fresh slate, and a
//! failed save is logged without failing the session.

use crate::game::{AnswerOutcome, RoundRecord, SessionOutcome};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub wins: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTally {
    pub correct: u32,
    pub wrong: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub player_stats: HashMap<String, PlayerStats>,
    pub question_stats: HashMap<String, QuestionTally>,
}

impl Statistics {
    /// Loads persisted statistics; missing or corrupt data yields defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(stats) => stats,
                Err(e) => {
                    warn!("Ignoring corrupt statistics file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("Could not read statistics file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }

    /// Folds one finished session into the aggregates.
    pub fn record_session(
        &mut self,
        roster: &[String],
        rounds: &[RoundRecord],
        outcome: &SessionOutcome,
    ) {
        for name in roster {
            self.player_stats.entry(name.clone()).or_default().games_played += 1;
        }
        if let SessionOutcome::Winner(name) = outcome {
            self.player_stats.entry(name.clone()).or_default().wins += 1;
        }

        for round in rounds {
            let tally = self.question_stats.entry(round.question.clone()).or_default();
            for (name, answer) in &round.answers {
                let player = self.player_stats.entry(name.clone()).or_default();
                match answer {
                    AnswerOutcome::Correct => {
                        player.correct_answers += 1;
                        tally.correct += 1;
                    }
                    AnswerOutcome::Incorrect => {
                        player.wrong_answers += 1;
                        tally.wrong += 1;
                    }
                    // Silence is neither right nor wrong.
                    AnswerOutcome::NoResponse => {}
                }
            }
        }
    }
}
