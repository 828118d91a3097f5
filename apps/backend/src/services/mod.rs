pub mod arena;
pub mod game_flow;
pub mod registry;
pub mod tasks;

pub use arena::ArenaLoop;
pub use game_flow::GameFlowService;
pub use registry::{LobbySummary, MatchRegistry};
