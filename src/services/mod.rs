// src/services/mod.rs
//! Workflow components and the HTTP adapter.

pub mod api_server;
pub mod outcome;
pub mod progress;
pub mod upload_gate;
pub mod workflow_controller;
