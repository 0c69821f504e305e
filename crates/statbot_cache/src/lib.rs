//! Cache-aside memoization with TTL support.
//!
//! This crate provides the in-process cache that sits in front of every
//! expensive external call: guild configuration lookups, stats API queries,
//! and anything else a command handler wants to memoize.
//!
//! Entries are keyed by string so that a whole family of lookups about one
//! resource can be invalidated with a single prefix.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheAside, CacheConfig, CacheConfigBuilder, CacheEntry};
