//! # Repository Module
//!
//! Storage behind the terminal's persisted state.
//!
//! - [`device_storage`] - Key-value contract with SQLite and in-memory backends

pub mod device_storage;
