//! Core domain types shared by the marquee crates.
//!
//! This crate provides the strongly-typed identifiers used to refer to
//! triggers and display surfaces across crate boundaries.

pub mod id;

pub use id::{SurfaceId, TriggerId};
