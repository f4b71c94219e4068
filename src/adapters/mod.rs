// Adapters layer: concrete implementations for the outside world (files, terminal).

pub mod prompt;
pub mod storage;
