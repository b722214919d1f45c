//! vsx: a small content-addressed version control engine
//!
//! The engine stores blobs, trees and commits in a flat object store keyed by
//! their SHA-1 digest, keeps named references and a staging index next to it,
//! and offers commit-graph queries, tree diffs and three-way merges on top.
//!
//! [`areas::repository::Repository`] is the entry point; every operation is a
//! method on it returning plain data.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
