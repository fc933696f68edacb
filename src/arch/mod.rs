//! # Architecture Abstraction Layer
//!
//! Implementations of [`Port`](crate::port::Port) for real hardware.
//! Currently implements the Cortex-M port; other cores plug in as sibling
//! modules.

#[cfg(target_arch = "arm")]
pub mod cortex_m4;
