//! # Portfolio Assistant Core
//!
//! Domain types shared by every crate in the workspace: time slots and
//! meeting requests, chat sessions, retrieved knowledge documents, the
//! error taxonomy, and the typed scheduling configuration.
//!
//! This crate performs no I/O. External boundaries (calendar, language
//! model, similarity index) are defined as traits in their own crates and
//! exchange these types.

/// Error taxonomy for the whole assistant
pub mod errors;
/// Typed scheduling configuration (timezone, business hours, granularity)
pub mod config;
/// Domain models
pub mod models;
