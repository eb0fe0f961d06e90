// src/lib.rs

//! # Certificate Verification Simulator
//!
//! A simulation harness for a certificate verification product. A user
//! uploads a certificate, a fake OCR scan "reads" it, a staged checklist
//! pretends to consult institutional records and a ledger, and a randomly
//! drawn verdict closes the session. Nothing is actually verified.
//!
//! ## Architecture Overview
//! 1. **Models**: uploads, workflow state, extracted fields, verdicts, registry records
//! 2. **Services**: upload gate, progress simulator, outcome generator,
//!    workflow controller, HTTP API
//! 3. **Scheduler**: virtual-time task queue and its tokio driver
//! 4. **Storage**: fixed fixture registries

pub mod config;
pub mod errors;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod utils;
