//! # Trivia Host Library
//!
//! This library implements the host side of the LAN trivia game: it
//! advertises a session over UDP broadcast, gathers participants during a
//! self-extending join window, runs first-correct-answer-wins rounds, and
//! tears the session down with a close handshake.
//!
//! ## Session Lifecycle
//!
//! A session moves through a fixed sequence of phases driven by the host
//! binary's supervising loop:
//!
//! 1. **Discovering** — a join listener is bound (retrying ephemeral ports
//!    as needed) and the beacon starts broadcasting offer datagrams.
//! 2. **Joining** — connections are accepted for a window that resets on
//!    every successful registration; the first line of each connection is
//!    the participant's display name.
//! 3. **Playing** — questions are drawn without replacement and broadcast;
//!    answers are collected concurrently under a per-participant timeout,
//!    and the first correct answer claims the session under a mutex.
//! 4. **Closing** — the outcome is announced, statistics are folded in and
//!    persisted, and each connection is closed after a bounded wait for the
//!    acknowledgment token.
//!
//! Any fault sends the supervisor back to discovering; the host process
//! never exits over a single bad session.
//!
//! ## Module Organization
//!
//! ### Beacon Module (`beacon`)
//! The background task broadcasting offer datagrams at a fixed cadence,
//! with an await-able stop handle.
//!
//! ### Lobby Module (`lobby`)
//! The join listener, the extending-window accept loop, and the
//! [`lobby::Participant`] type that owns a registered connection.
//!
//! ### Game Module (`game`)
//! The round orchestrator: per-round task fan-out, answer judging,
//! single-winner arbitration, and the closing handshake.
//!
//! ### Questions Module (`questions`)
//! The built-in read-only question bank sessions draw from.
//!
//! ### Stats Module (`stats`)
//! Aggregate per-player and per-question tallies persisted as JSON across
//! host restarts.
//!
//! ## Concurrency Notes
//!
//! Answer collection is the only fan-out: one task per participant per
//! round, each owning its participant's socket exclusively. The round
//! closes when every task has returned. The winner cell is the only state
//! shared across those tasks, and its check-and-set is a single guarded
//! step so concurrent correct answers can never produce two winners.

pub mod beacon;
pub mod game;
pub mod lobby;
pub mod questions;
pub mod stats;
