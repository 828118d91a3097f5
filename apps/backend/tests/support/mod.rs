#![allow(dead_code)]

pub mod engine;
pub mod providers;
pub mod recorder;
pub mod stores;

pub use engine::{advance, engine, engine_with, settle, Engine};
pub use providers::ScriptedProvider;
pub use recorder::RecordingBroadcaster;
pub use stores::FailingStore;
