//! Storage Barrel Module
//!
//! A barrel is a storage replica holding one full (not sharded) copy of the
//! crawl index. Every crawl event is written identically to every live barrel
//! by the downloaders, so any single barrel can answer any query.
//!
//! ## Core Concepts
//! - **State**: three maps: word index (word → URL set), page infos
//!   (URL → title/description) and reverse links (target URL → source set).
//! - **Queries**: multi-word AND search, backlink lookups and a top-10
//!   ranking by backlink count.
//! - **Durability**: the whole state serializes to a per-barrel flat snapshot
//!   file, re-read at startup and rewritten wholesale on flush.

pub mod handlers;
pub mod protocol;
pub mod snapshot;
pub mod store;

pub use store::BarrelStore;

#[cfg(test)]
mod tests;
