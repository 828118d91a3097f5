use std::time::Duration;

use crate::domain::state::Color;

/// Seats per match; exactly one of them is the impostor.
pub const ROSTER_SIZE: usize = 5;

/// Chat text length bounds, in characters.
pub const MIN_CHAT_LEN: usize = 1;
pub const MAX_CHAT_LEN: usize = 200;

pub const PALETTE: [Color; 8] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
    Color::Orange,
    Color::Pink,
    Color::Cyan,
];

pub const ROAMING_DURATION: Duration = Duration::from_secs(30);
pub const DISCUSSION_DURATION: Duration = Duration::from_secs(45);
pub const VOTING_DURATION: Duration = Duration::from_secs(20);
pub const LOBBY_COUNTDOWN: Duration = Duration::from_secs(60);

/// Length of `text` as counted against the chat limits.
#[inline]
pub fn chat_len(text: &str) -> usize {
    text.chars().count()
}
