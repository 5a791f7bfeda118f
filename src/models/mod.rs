//! Configuration and wire models for the hosted backend.

pub mod config;
pub mod supplier;
