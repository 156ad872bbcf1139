//! # Workflows Module
//!
//! High-level entry points that tie the command model and an engine session
//! together.
//!
//! - **Sweep** ([`sweep`]) - load the input script once, then for every
//!   steps-per-rotation value attach the dump and log outputs, define the drum
//!   angle, advance the simulation and detach the dump again.

pub mod sweep;
