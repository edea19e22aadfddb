//! rubricate-core: canonical model, source adaptation, scoring and session state.
//!
//! This crate turns heterogeneous question datasets into one canonical model,
//! scores reviewer judgments against a configurable rubric, and keeps a
//! resumable evaluation session in a durable key/value store.

pub mod adapter;
pub mod criteria;
pub mod discipline;
pub mod error;
pub mod model;
pub mod present;
pub mod record;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod store;
pub mod traits;
