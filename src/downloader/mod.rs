//! Downloader Module
//!
//! The crawl worker. Each downloader process long-polls the gateway for the
//! next frontier URL, fetches and parses the page, and fans the extracted
//! words, metadata and links out to every live barrel. Newly discovered
//! links are pushed back into the frontier through the gateway.
//!
//! Deduplication is process-local only: a URL may be fetched again by a
//! different downloader instance, and re-enqueueing an already-visited URL
//! is expected behavior, not an error.

pub mod parse;
pub mod worker;

pub use worker::Downloader;

#[cfg(test)]
mod tests;
