//! # Trivia Participant Library
//!
//! Client-side implementation of the LAN trivia game. A participant has a
//! deliberately small job: hear a session being advertised, join it under a
//! display name, relay questions to the person at the terminal, and submit
//! their answers before the host's deadline.
//!
//! ## Module Organization
//!
//! ### Discovery Module (`discovery`)
//! Waits on the UDP broadcast port for a well-formed offer datagram and
//! extracts the host's address and advertised TCP port. Anything malformed
//! is discarded silently; the wait is unbounded.
//!
//! ### Session Module (`session`)
//! Owns the TCP connection for one session: registers the display name,
//! prints server lines, prompts on stdin (with local token validation and a
//! deadline matching the host's answer timeout), and answers the closing
//! notice with the acknowledgment token.
//!
//! The binary wraps these in an endless loop — after a session ends, for
//! whatever reason, the participant goes back to listening for offers.

pub mod discovery;
pub mod session;
