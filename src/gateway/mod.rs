//! Gateway Module
//!
//! The coordinator and single rendezvous point of the cluster: every barrel,
//! downloader and external collaborator talks to the gateway. It owns the
//! authoritative barrel registry, the frontier handle and the aggregate
//! statistics.
//!
//! ## Core Concepts
//! - **Registry**: barrels register with an identifier minted beforehand by a
//!   monotonic counter; liveness is checked by probing, not heartbeats: the
//!   `barrels` endpoint drops unresponsive entries as a side effect.
//! - **Fan-out / fan-in**: queries are broadcast to every registered barrel
//!   and merged (intersection for search, union for backlinks, sum for
//!   counts). One failing barrel never aborts the batch.
//! - **Statistics**: a search histogram and latency samples feed the
//!   human-readable statistics report.

pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod search;
pub mod stats;

pub use registry::BarrelRegistry;
pub use stats::GatewayStats;

#[cfg(test)]
mod tests;
