//! Integration tests for the debug archive
//!
//! These tests drive the recorder, hooks, and activation surface together and
//! read the resulting archives back.

#[path = "../common/mod.rs"]
pub mod common;

pub mod activation;
pub mod crash_recovery;
pub mod hooks;
