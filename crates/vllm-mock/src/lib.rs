//! Top-level facade crate for vllm-mock.
//!
//! Re-exports the core simulation library and the server library so users can
//! depend on a single crate.

pub mod core {
    pub use vllm_mock_core::*;
}

pub mod server {
    pub use vllm_mock_server::*;
}
