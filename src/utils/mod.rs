// src/utils/mod.rs
pub mod random;
