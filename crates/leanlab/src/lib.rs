//! # leanlab
//!
//! Startup-idea evaluation: bounded insight scores, a lean canvas draft and
//! versioned revisions with metric deltas and a prose explanation of what
//! changed. Scoring, drafting and explaining either run deterministically or
//! through an external text-generation service, chosen by configuration.
//!
//! - [`analysis`]: scoring, canvas drafting and delta explanation
//! - [`generation`]: client for the text-generation service
//! - [`store`]: durable and in-memory idea stores
//! - [`service`]: the submit / revise / compare lifecycle
//! - [`server`]: axum REST API
//! - [`cli`]: command implementations for the `leanlab` binary

pub mod analysis;
pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod generation;
pub mod model;
pub mod output;
pub mod server;
pub mod service;
pub mod store;

pub use error::{Error, Result};
