//! Search engine implementations.
//!
//! Only DuckDuckGo's HTML endpoint is scraped; it is the one engine that
//! tolerates keyless automated requests.

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoEngine;
