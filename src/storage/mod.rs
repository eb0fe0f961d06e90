// src/storage/mod.rs
//! Read-only in-memory data.

pub mod fixtures;
