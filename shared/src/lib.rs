//! Wire protocol shared by the trivia host and participant.
//!
//! The protocol has two layers: a connectionless discovery layer (a fixed
//! 7-byte offer datagram broadcast by the host) and a session layer of
//! newline-terminated text lines over TCP. Everything both sides must agree
//! on lives here: the offer codec, the answer-token mapping, and the fixed
//! phrases the participant matches against.

/// Magic cookie opening every offer datagram, big-endian on the wire.
pub const MAGIC_COOKIE: u32 = 0xABCD_DCBA;
/// Message type tag for an offer announcement.
pub const OFFER_MESSAGE_TYPE: u8 = 0x02;
/// UDP port participants listen on for offer broadcasts.
pub const UDP_BROADCAST_PORT: u16 = 13117;
/// Total size of an offer datagram: cookie (4) + type (1) + port (2).
pub const OFFER_PACKET_LEN: usize = 7;

/// Display name of the host, used in the welcome message.
pub const SERVER_NAME: &str = "TriviaKing";

/// Prefix of every question line; participants key their answer prompt on it.
pub const QUESTION_PREFIX: &str = "True or false:";
/// Instruction line sent alongside each question.
pub const ANSWER_INSTRUCTIONS: &str =
    "Answer with 'Y', 'T', '1' for True or 'N', 'F', '0' for False.";
/// Closing notice sent before teardown; participants acknowledge it.
pub const CLOSING_NOTICE: &str = "Server is closing the connection. Please acknowledge.";
/// Literal acknowledgment token a participant returns for the closing notice.
pub const CLIENT_ACK: &str = "CLIENT_ACK";

/// Encodes an offer datagram advertising the host's TCP port.
pub fn encode_offer(tcp_port: u16) -> [u8; OFFER_PACKET_LEN] {
    let mut packet = [0u8; OFFER_PACKET_LEN];
    packet[..4].copy_from_slice(&MAGIC_COOKIE.to_be_bytes());
    packet[4] = OFFER_MESSAGE_TYPE;
    packet[5..7].copy_from_slice(&tcp_port.to_be_bytes());
    packet
}

/// Decodes an offer datagram, returning the advertised TCP port.
///
/// Returns `None` for anything that is not a well-formed offer: short
/// packets, a wrong cookie, or a wrong message type. Foreign datagrams on
/// the discovery port are expected and must be discarded, not treated as
/// errors.
pub fn decode_offer(data: &[u8]) -> Option<u16> {
    if data.len() < OFFER_PACKET_LEN {
        return None;
    }
    if data[..4] != MAGIC_COOKIE.to_be_bytes() {
        return None;
    }
    if data[4] != OFFER_MESSAGE_TYPE {
        return None;
    }
    Some(u16::from_be_bytes([data[5], data[6]]))
}

/// Maps an answer token to its boolean value.
///
/// Accepted tokens, case-insensitive: `Y`/`T`/`1` for true, `N`/`F`/`0`
/// for false. Everything else is `None` and counts as no-response for
/// arbitration purposes.
pub fn parse_answer(token: &str) -> Option<bool> {
    match token.trim().to_ascii_uppercase().as_str() {
        "Y" | "T" | "1" => Some(true),
        "N" | "F" | "0" => Some(false),
        _ => None,
    }
}
