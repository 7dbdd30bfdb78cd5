// Adapters layer: concrete implementations for external systems.

pub mod openai;
pub mod storage;
