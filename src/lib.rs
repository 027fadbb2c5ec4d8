//! Distributed Web Crawler & Search Backend Library
//!
//! This library crate defines the core modules that make up the distributed system.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of independently deployed node roles that coordinate
//! through HTTP remote calls:
//!
//! - **`gateway`**: The coordinator and single rendezvous point. Maintains the live
//!   barrel registry, assigns barrel and downloader identifiers, routes frontier
//!   inserts, fans queries out to barrels and merges the results, and tracks
//!   search statistics.
//! - **`barrel`**: A storage replica holding one full copy of the crawl index
//!   (word index, page metadata, backlink map) with a durable flat-file snapshot.
//! - **`downloader`**: A crawl worker. Pulls URLs from the frontier, fetches and
//!   parses pages, and fans the extracted words, metadata and links out to every
//!   live barrel.
//! - **`frontier`**: The shared blocking FIFO queue of URLs awaiting crawl,
//!   owned by the gateway process.
//! - **`client`**: HTTP clients used for all inter-node calls.

pub mod barrel;
pub mod client;
pub mod downloader;
pub mod frontier;
pub mod gateway;
