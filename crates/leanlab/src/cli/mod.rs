//! Command-line interface
//!
//! `assess`, `export` and `schema` work against the local configuration;
//! every other command is a thin client of a running `leanlab_server`.

pub mod client;
pub mod commands;
pub mod display;
