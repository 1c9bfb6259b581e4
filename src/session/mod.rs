//! # Session Module
//!
//! Key/value storage scoped to one shopper session.
//!
//! ## Key Components
//!
//! - [`storage`] - The [`SessionStore`] contract and the in-memory store
//! - [`file`] - File-backed sessions shared across processes by session id
//! - [`constants`] - Storage keys, limits and directory names

pub mod constants;
pub mod file;
pub mod storage;

pub use file::FileSessionStore;
pub use storage::{MemorySessionStore, SessionStore};
