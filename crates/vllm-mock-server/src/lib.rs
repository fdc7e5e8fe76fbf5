//! vllm-mock server library entry.
//!
//! Wires config, shared state, the periodic simulation task, and the axum
//! router into one process. Consumed by `main.rs` and by integration tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
pub mod simulation;
