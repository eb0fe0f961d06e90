// src/models/mod.rs
//! Data structures shared by the workflow, the services and the API.

pub mod registry;
pub mod upload;
pub mod verification;
pub mod workflow;
