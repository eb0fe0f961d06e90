// src/scheduler/mod.rs
//! Timer scheduling for the workflow.
//!
//! `task_queue` is a deterministic virtual-time queue; `driver` maps it onto
//! wall-clock time with tokio.

pub mod driver;
pub mod task_queue;
