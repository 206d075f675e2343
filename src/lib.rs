//! queryscope - an AI-assisted SQL query tool.
//!
//! This library exposes the core modules for use in integration tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod query;
