//! AI participants: decision providers and their fallback.
//!
//! This module provides:
//! - `DecisionProvider`, the seam to whatever produces AI intents
//! - `Heuristic`, the local provider every failure falls back to
//! - `RandomProvider`, uniform choice among legal intents
//! - chat text cleanup applied to provider output

mod heuristic;
mod random;
pub mod registry;
mod sanitize;
mod trait_def;

pub use heuristic::Heuristic;
pub use random::RandomProvider;
pub use sanitize::clean_chat;
pub use trait_def::{AiError, DecisionProvider, MovementIntent};
