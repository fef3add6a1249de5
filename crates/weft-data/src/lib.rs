//! Upstream data access for weft components.
//!
//! One GET request, one JSON decode, nothing else: no retry, no caching.
//! Transport failures and decode failures are distinct error variants so
//! components can tell "upstream unreachable" from "upstream returned
//! garbage".

mod client;

pub use client::*;
