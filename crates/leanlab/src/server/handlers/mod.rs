//! HTTP request handlers

pub mod admin;
pub mod ideas;
pub mod status;
