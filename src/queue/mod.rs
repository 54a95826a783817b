// src/queue/mod.rs

pub mod manager;

pub use manager::{ResearchQueue, QUEUE_SLOT_GAP, QUEUE_SLOT_WIDTH};
