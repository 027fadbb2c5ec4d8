//! Inter-node HTTP Clients
//!
//! Thin reqwest wrappers around the gateway and barrel RPC surfaces. All
//! short calls go through retry helpers with exponential backoff and jitter;
//! the frontier long-poll is the one call issued without a client timeout.

pub mod barrel;
pub mod gateway;
mod retry;

pub use barrel::BarrelClient;
pub use gateway::GatewayClient;
