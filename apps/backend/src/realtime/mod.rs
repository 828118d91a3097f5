//! Realtime fan-out of match events.

pub mod gateway;
pub mod hub;
pub mod protocol;

pub use gateway::{BroadcastGateway, Fanout};
pub use hub::MatchSessionRegistry;
pub use protocol::{Envelope, MatchEvent, Topic};
