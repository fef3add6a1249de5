//! Latest-block status page - reference workload.
//!
//! One page, one component: the `block` component fetches the latest
//! block header from the upstream node's REST endpoint, and a
//! `reload-block` action refreshes it in place without a full page load.

pub mod block;
pub mod pages;
