//! Command handlers.
//!
//! Each handler receives a validated [`GatewayConfig`](sagegate_core::GatewayConfig)
//! from the composition root in `main.rs`.

pub mod probe;
pub mod serve;
