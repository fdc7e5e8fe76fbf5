//! vllm-mock core: metric registry, exposition renderer, and the simulation
//! rules of a synthetic LLM serving engine.
//!
//! This crate carries no HTTP or async runtime dependencies; the server crate
//! drives [`simulation::SimulationEngine::tick`] on a timer and renders
//! [`metric::MetricRegistry::snapshot`] for scrapes.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as [`MockError`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod error;
pub mod exposition;
pub mod metric;
pub mod simulation;

pub use error::{ErrorCode, MockError, Result};
pub use metric::{LabelSet, MetricDescriptor, MetricKind, MetricRegistry, Snapshot};
pub use simulation::{SimulationEngine, TickReport};
