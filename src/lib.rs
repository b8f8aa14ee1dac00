//! Dirsync: Periodic One-Way Directory Synchronization
//!
//! Keeps a destination directory tree matching a source tree by copying new
//! or content-changed files and deleting files absent from the source.
//! Change detection uses streamed BLAKE3 content digests, never file
//! metadata, so clock skew between machines cannot cause spurious copies.

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod executor;
pub mod hash;
pub mod index;
pub mod logging;
pub mod observe;
pub mod types;
