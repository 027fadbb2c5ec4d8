//! URL Frontier Module
//!
//! The shared queue of URLs awaiting crawl. Lives inside the gateway process
//! and is reached remotely only through the gateway's `next_url` endpoint.
//!
//! Contents are held in memory only; losing them on restart is an accepted
//! non-goal of the design, not a bug.

pub mod queue;

pub use queue::Frontier;
