//! xpr CLI library.
//!
//! This crate provides the command-line interface for the xpr expression engine.
//! The public modules are primarily exposed for testing purposes.

pub mod cli;
pub mod commands;
pub mod common;
