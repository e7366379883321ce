//! Test utilities and fixtures for luainclude
//!
//! This crate provides shared test helpers that can be used by the
//! integration tests (tests/ directory) of every workspace crate.

pub mod fixtures;
pub mod tree;

pub use tree::ScriptTree;
