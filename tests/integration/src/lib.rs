//! Integration test utilities for the hrlink gateway
//!
//! This crate provides in-memory collaborator doubles and a wired-up gateway
//! state, so scenario tests can drive the router and delivery engine without
//! a network stack.

pub mod helpers;

pub use helpers::*;
