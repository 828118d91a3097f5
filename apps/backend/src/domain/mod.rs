//! Domain layer: pure match logic types and helpers.

pub mod actions;
pub mod phases;
pub mod rooms;
pub mod roster;
pub mod rules;
pub mod snapshot;
pub mod state;
pub mod voting;
pub mod win;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_actions;
#[cfg(test)]
mod tests_props_actions;
#[cfg(test)]
mod tests_roster;

// Re-exports for ergonomics
pub use rooms::Room;
pub use snapshot::{MatchSnapshot, ParticipantView, PlayerView};
pub use state::{
    Body, ChatEntry, Color, Match, MatchId, MatchMode, MatchState, MatchStatus, Participant,
    ParticipantId, Phase, Role, Winner,
};
pub use voting::{TallyEntry, VoteResult};
