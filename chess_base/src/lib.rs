//! # Base types for tapchess
//!
//! This is an auxiliary crate for `tapchess`, which contains squares, colors and piece kinds. It was
//! split from the main crate so that frontends can depend on the plain value types alone.
//!
//! Normally you don't want to use this crate directly. Use `tapchess` instead.

pub mod geometry;
pub mod types;
